//! Driver repository over a document store.
//!
//! Implements [`DriverRepository`] on top of any [`DocumentStore`], so the same
//! code runs against DynamoDB in production and the in-memory store in tests.

use async_trait::async_trait;
use drivercatalog_core::driver::{Driver, Name};
use drivercatalog_core::storage::{
    DriverRepository, RepositoryError, Result, SaveMode, SortField, SortOrder,
};

use super::document::conversions::{
    self, driver_key, driver_to_item, item_to_driver, name_sort_key,
};
use super::document::{DocumentStore, ScanFilter};
use super::table::{self, driver_table_config, PollSettings, TableConfig};

/// Document-store-backed driver repository.
pub struct DocumentRepository<S> {
    store: S,
    table_config: TableConfig,
    poll: PollSettings,
}

impl<S: DocumentStore> DocumentRepository<S> {
    /// Creates a repository over `store` using the driver table named
    /// `table_name`.
    pub fn new(store: S, table_name: impl AsRef<str>) -> Self {
        Self {
            store,
            table_config: driver_table_config().with_table_name(table_name.as_ref()),
            poll: PollSettings::default(),
        }
    }

    /// Overrides how table setup and drop poll for completion.
    pub fn with_poll_settings(mut self, poll: PollSettings) -> Self {
        self.poll = poll;
        self
    }

    /// Get the table name.
    pub fn table_name(&self) -> &str {
        &self.table_config.table_name
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Saves a driver with an explicit write mode.
    ///
    /// `Create` writes the whole document. `Update` sets every non-key
    /// attribute on the stored record and leaves the rest untouched.
    pub async fn save_with_mode(&self, driver: &Driver, mode: SaveMode) -> Result<()> {
        require_id(&driver.id)?;

        let table_name = self.table_name();
        let item = driver_to_item(driver);

        tracing::debug!(table = %table_name, id = %driver.id, ?mode, "Saving driver");
        match mode {
            SaveMode::Create => self.store.put_item(table_name, item).await,
            SaveMode::Update => {
                self.store
                    .update_item(table_name, driver_key(&driver.id), item)
                    .await
            }
        }
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RepositoryError::InvalidArgument(
            "Driver id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Conditions matching drivers with exactly this first and last name.
fn name_filter(name: &Name) -> ScanFilter {
    ScanFilter::new()
        .eq([conversions::NAME, conversions::FIRST_NAME], &name.first_name)
        .eq([conversions::NAME, conversions::LAST_NAME], &name.last_name)
}

#[async_trait]
impl<S: DocumentStore> DriverRepository for DocumentRepository<S> {
    async fn setup_table(&self) -> Result<()> {
        table::setup_table(&self.store, &self.table_config, &self.poll).await
    }

    async fn drop_table(&self) -> Result<()> {
        table::drop_table(&self.store, self.table_name(), &self.poll).await
    }

    async fn save(&self, driver: &Driver) -> Result<()> {
        self.save_with_mode(driver, SaveMode::for_driver(driver)).await
    }

    async fn load(&self, id: &str) -> Result<Option<Driver>> {
        require_id(id)?;

        tracing::debug!(table = %self.table_name(), %id, "Loading driver");
        match self.store.get_item(self.table_name(), driver_key(id)).await? {
            Some(item) => Ok(Some(item_to_driver(&item)?)),
            None => Ok(None),
        }
    }

    async fn exists(&self, name: &Name) -> Result<bool> {
        let filter = name_filter(name);
        let matches = self
            .store
            .scan(self.table_name(), Some(&filter), Some(1))
            .await?;

        Ok(!matches.is_empty())
    }

    async fn contains_another(&self, id: &str, name: &Name) -> Result<bool> {
        let filter = name_filter(name).ne([conversions::ID], id);
        let matches = self
            .store
            .scan(self.table_name(), Some(&filter), None)
            .await?;

        Ok(!matches.is_empty())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        require_id(id)?;

        tracing::debug!(table = %self.table_name(), %id, "Deleting driver");
        self.store
            .delete_item(self.table_name(), driver_key(id))
            .await
    }

    async fn list(&self, sort_by: SortField, order: SortOrder) -> Result<Vec<Driver>> {
        let items = self.store.scan(self.table_name(), None, None).await?;

        let mut keyed = items
            .iter()
            .map(|item| name_sort_key(item, sort_by).map(|key| (key, item)))
            .collect::<Result<Vec<_>>>()?;

        // sort_by is stable, so equal keys keep scan order in both directions.
        keyed.sort_by(|(a, _), (b, _)| match order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        });

        tracing::debug!(
            table = %self.table_name(),
            %sort_by,
            %order,
            count = keyed.len(),
            "Listing drivers"
        );
        keyed
            .into_iter()
            .map(|(_, item)| item_to_driver(item))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use drivercatalog_core::driver::{Address, Car};

    use super::*;
    use crate::storage::inmemory::InMemoryStore;

    async fn setup_repo() -> DocumentRepository<InMemoryStore> {
        let repo = DocumentRepository::new(InMemoryStore::new(), "Drivers").with_poll_settings(
            PollSettings {
                poll_interval: Duration::from_millis(1),
                max_attempts: 5,
            },
        );
        repo.setup_table().await.unwrap();
        repo
    }

    fn driver(id: &str, first_name: &str, last_name: &str) -> Driver {
        Driver::new(
            Name::new(first_name, last_name),
            Address::new("1 Main St"),
            Car::new("Toyota", "Corolla", "ABC-123"),
        )
        .with_id(id)
        .with_created_at(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
    }

    fn first_names(drivers: &[Driver]) -> Vec<&str> {
        drivers
            .iter()
            .map(|d| d.name.as_ref().unwrap().first_name.as_str())
            .collect()
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let repo = setup_repo().await;
        let ann = driver("driver-1", "Ann", "Lee");

        repo.save(&ann).await.unwrap();

        let loaded = repo.load("driver-1").await.unwrap().unwrap();
        assert_eq!(loaded, ann);
        assert_eq!(loaded.modified_at, None);
    }

    #[tokio::test]
    async fn test_second_save_updates_modified_at() {
        let repo = setup_repo().await;
        let mut ann = driver("driver-1", "Ann", "Lee");
        repo.save(&ann).await.unwrap();

        let modified = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        ann.touch(modified);
        ann.car = Some(Car::new("Honda", "Civic", "XYZ-987"));
        repo.save(&ann).await.unwrap();

        let loaded = repo.load("driver-1").await.unwrap().unwrap();
        assert_eq!(loaded.modified_at, Some(modified));
        assert_eq!(loaded.created_at, ann.created_at);
        assert_eq!(loaded.car.unwrap().maker, "Honda");
        assert_eq!(repo.store().item_count("Drivers").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_leaves_absent_attributes_untouched() {
        let repo = setup_repo().await;
        let ann = driver("driver-1", "Ann", "Lee");
        repo.save(&ann).await.unwrap();

        let mut partial = ann.clone();
        partial.car = None;
        partial.touch(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        repo.save(&partial).await.unwrap();

        let loaded = repo.load("driver-1").await.unwrap().unwrap();
        assert_eq!(loaded.car, ann.car);
    }

    #[tokio::test]
    async fn test_save_rejects_empty_id() {
        let repo = setup_repo().await;
        let anonymous = driver("", "Ann", "Lee");

        let result = repo.save(&anonymous).await;

        assert!(matches!(result, Err(RepositoryError::InvalidArgument(_))));
        assert_eq!(repo.store().item_count("Drivers").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let repo = setup_repo().await;
        assert_eq!(repo.load("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_then_load_returns_none() {
        let repo = setup_repo().await;
        repo.save(&driver("driver-1", "Ann", "Lee")).await.unwrap();

        repo.delete("driver-1").await.unwrap();

        assert_eq!(repo.load("driver-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_succeeds() {
        let repo = setup_repo().await;
        assert!(repo.delete("nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_exists() {
        let repo = setup_repo().await;
        let name = Name::new("Ann", "Lee");

        assert!(!repo.exists(&name).await.unwrap());

        repo.save(&driver("driver-1", "Ann", "Lee")).await.unwrap();

        assert!(repo.exists(&name).await.unwrap());
        assert!(!repo.exists(&Name::new("Ann", "Smith")).await.unwrap());
    }

    #[tokio::test]
    async fn test_contains_another() {
        let repo = setup_repo().await;
        let name = Name::new("Ann", "Lee");
        repo.save(&driver("A", "Ann", "Lee")).await.unwrap();

        assert!(!repo.contains_another("A", &name).await.unwrap());
        assert!(repo.contains_another("B", &name).await.unwrap());

        repo.save(&driver("B", "Ann", "Lee")).await.unwrap();

        assert!(repo.contains_another("A", &name).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_sorted_by_first_name() {
        let repo = setup_repo().await;
        repo.save(&driver("1", "Zoe", "Adams")).await.unwrap();
        repo.save(&driver("2", "Amy", "Brown")).await.unwrap();
        repo.save(&driver("3", "Mia", "Clark")).await.unwrap();

        let ascending = repo
            .list(SortField::FirstName, SortOrder::parse("asc"))
            .await
            .unwrap();
        assert_eq!(first_names(&ascending), vec!["Amy", "Mia", "Zoe"]);

        let descending = repo
            .list(SortField::FirstName, SortOrder::parse("desc"))
            .await
            .unwrap();
        assert_eq!(first_names(&descending), vec!["Zoe", "Mia", "Amy"]);
    }

    #[tokio::test]
    async fn test_list_sorted_by_last_name() {
        let repo = setup_repo().await;
        repo.save(&driver("1", "Zoe", "Clark")).await.unwrap();
        repo.save(&driver("2", "Amy", "Adams")).await.unwrap();
        repo.save(&driver("3", "Mia", "Brown")).await.unwrap();

        let drivers = repo
            .list(SortField::LastName, SortOrder::Ascending)
            .await
            .unwrap();

        assert_eq!(first_names(&drivers), vec!["Amy", "Mia", "Zoe"]);
    }

    #[tokio::test]
    async fn test_list_is_stable_for_equal_keys() {
        let repo = setup_repo().await;
        repo.save(&driver("1", "Ann", "Lee")).await.unwrap();
        repo.save(&driver("2", "Ann", "Kim")).await.unwrap();

        let ascending = repo
            .list(SortField::FirstName, SortOrder::Ascending)
            .await
            .unwrap();
        let descending = repo
            .list(SortField::FirstName, SortOrder::Descending)
            .await
            .unwrap();

        let ids = |drivers: &[Driver]| drivers.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&ascending), vec!["1", "2"]);
        assert_eq!(ids(&descending), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_list_empty_table() {
        let repo = setup_repo().await;
        let drivers = repo
            .list(SortField::LastName, SortOrder::Descending)
            .await
            .unwrap();
        assert!(drivers.is_empty());
    }

    #[tokio::test]
    async fn test_list_fails_on_record_without_name() {
        let repo = setup_repo().await;
        repo.save(&driver("1", "Ann", "Lee")).await.unwrap();

        let mut nameless = driver("2", "x", "y");
        nameless.name = None;
        repo.save(&nameless).await.unwrap();

        let result = repo.list(SortField::FirstName, SortOrder::Ascending).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_optional_coordinates_stay_absent() {
        let repo = setup_repo().await;
        let mut ann = driver("driver-1", "Ann", "Lee");
        ann.address = Some(Address::new("2 Side St"));
        repo.save(&ann).await.unwrap();

        let loaded = repo.load("driver-1").await.unwrap().unwrap();
        let address = loaded.address.unwrap();

        assert_eq!(address.full_address, "2 Side St");
        assert_eq!(address.longitude, None);
        assert_eq!(address.latitude, None);
    }

    #[tokio::test]
    async fn test_operations_fail_without_table() {
        let repo = DocumentRepository::new(InMemoryStore::new(), "Drivers");

        let result = repo.load("driver-1").await;

        assert_eq!(
            result,
            Err(RepositoryError::TableNotFound {
                table_name: "Drivers".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_drop_table() {
        let repo = setup_repo().await;
        repo.save(&driver("driver-1", "Ann", "Lee")).await.unwrap();

        repo.drop_table().await.unwrap();

        assert!(repo.store().describe_table("Drivers").await.unwrap().is_none());
    }
}
