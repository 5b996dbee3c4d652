use async_trait::async_trait;

use crate::driver::{Driver, Name};

use super::{Result, SortField, SortOrder};

/// Repository for driver records.
///
/// `exists` and `contains_another` are answered by scanning the whole
/// collection because the backing store has no index on name fields. An
/// implementation backed by a store with secondary indexes can swap in an
/// index lookup without changing this contract.
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Creates the backing table and waits until it is ready.
    async fn setup_table(&self) -> Result<()>;

    /// Deletes the backing table and waits until it is gone.
    async fn drop_table(&self) -> Result<()>;

    /// Saves a driver. Drivers without `modified_at` are written as new
    /// records; the rest are updated in place.
    async fn save(&self, driver: &Driver) -> Result<()>;

    /// Gets a driver by its ID.
    async fn load(&self, id: &str) -> Result<Option<Driver>>;

    /// Returns true if any driver has exactly this name.
    async fn exists(&self, name: &Name) -> Result<bool>;

    /// Returns true if a driver other than `id` has exactly this name.
    async fn contains_another(&self, id: &str, name: &Name) -> Result<bool>;

    /// Deletes a driver by its ID. Deleting a missing driver succeeds.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Lists every driver sorted by a name field.
    async fn list(&self, sort_by: SortField, order: SortOrder) -> Result<Vec<Driver>>;
}
