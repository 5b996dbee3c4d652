//! In-memory document store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use drivercatalog_core::storage::{RepositoryError, Result};
use tokio::sync::RwLock;

use crate::storage::document::{DocumentStore, Item, ScanFilter};
use crate::storage::table::{TableConfig, TableStatus};

/// A table held in memory. Items are keyed by their hash key value, so scans
/// return them in key order.
#[derive(Debug, Clone)]
struct MemoryTable {
    key_attribute: String,
    pending_polls: u32,
    /// Remaining `Deleting` polls once a delete has been requested.
    deleting: Option<u32>,
    items: BTreeMap<String, Item>,
}

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    activation_polls: u32,
    deletion_polls: u32,
}

impl InMemoryStore {
    /// Creates a new store with no tables. New tables are active immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes newly created tables report `Creating` for the first `polls`
    /// calls to `describe_table`.
    pub fn with_activation_polls(mut self, polls: u32) -> Self {
        self.activation_polls = polls;
        self
    }

    /// Makes deleted tables report `Deleting` for the first `polls` calls to
    /// `describe_table` before they disappear.
    pub fn with_deletion_polls(mut self, polls: u32) -> Self {
        self.deletion_polls = polls;
        self
    }

    /// Number of items currently stored in `table_name`.
    pub async fn item_count(&self, table_name: &str) -> Result<usize> {
        let tables = self.tables.read().await;
        Ok(table(&tables, table_name)?.items.len())
    }
}

fn table<'a>(tables: &'a HashMap<String, MemoryTable>, name: &str) -> Result<&'a MemoryTable> {
    tables
        .get(name)
        .ok_or_else(|| RepositoryError::TableNotFound {
            table_name: name.to_string(),
        })
}

fn table_mut<'a>(
    tables: &'a mut HashMap<String, MemoryTable>,
    name: &str,
) -> Result<&'a mut MemoryTable> {
    tables
        .get_mut(name)
        .ok_or_else(|| RepositoryError::TableNotFound {
            table_name: name.to_string(),
        })
}

/// Extract the hash key value of an item or key map.
fn key_value(key_attribute: &str, item: &Item) -> Result<String> {
    item.get(key_attribute)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| {
            RepositoryError::QueryFailed(format!(
                "Missing or invalid key attribute: {}",
                key_attribute
            ))
        })
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_table(&self, config: &TableConfig) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&config.table_name) {
            return Err(RepositoryError::QueryFailed(format!(
                "Table already exists: {}",
                config.table_name
            )));
        }
        tables.insert(
            config.table_name.clone(),
            MemoryTable {
                key_attribute: config.partition_key.name.clone(),
                pending_polls: self.activation_polls,
                deleting: None,
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn describe_table(&self, table_name: &str) -> Result<Option<TableStatus>> {
        let mut tables = self.tables.write().await;
        let status = match tables.get_mut(table_name) {
            None => return Ok(None),
            Some(table) => match table.deleting {
                Some(0) => None,
                Some(remaining) => {
                    table.deleting = Some(remaining - 1);
                    Some(TableStatus::Deleting)
                }
                None if table.pending_polls > 0 => {
                    table.pending_polls -= 1;
                    Some(TableStatus::Creating)
                }
                None => Some(TableStatus::Active),
            },
        };

        if status.is_none() {
            tables.remove(table_name);
        }
        Ok(status)
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = table_mut(&mut tables, table_name)?;
        if table.deleting.is_some() {
            return Err(RepositoryError::QueryFailed(format!(
                "Table is in use: {}",
                table_name
            )));
        }

        if self.deletion_polls == 0 {
            tables.remove(table_name);
        } else {
            table.deleting = Some(self.deletion_polls);
        }
        Ok(())
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = table_mut(&mut tables, table_name)?;
        let key = key_value(&table.key_attribute, &item)?;
        table.items.insert(key, item);
        Ok(())
    }

    async fn update_item(&self, table_name: &str, key: Item, item: Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = table_mut(&mut tables, table_name)?;
        let key_str = key_value(&table.key_attribute, &key)?;

        let stored = table
            .items
            .entry(key_str)
            .or_insert_with(|| key.clone());
        for (name, value) in item {
            if !key.contains_key(&name) {
                stored.insert(name, value);
            }
        }
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        let table = table(&tables, table_name)?;
        let key_str = key_value(&table.key_attribute, &key)?;
        Ok(table.items.get(&key_str).cloned())
    }

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = table_mut(&mut tables, table_name)?;
        let key_str = key_value(&table.key_attribute, &key)?;
        table.items.remove(&key_str);
        Ok(())
    }

    async fn scan(
        &self,
        table_name: &str,
        filter: Option<&ScanFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        let table = table(&tables, table_name)?;

        let matching = table
            .items
            .values()
            .filter(|item| filter.is_none_or(|f| f.matches(item)));

        Ok(match limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::driver_table_config;
    use aws_sdk_dynamodb::types::AttributeValue;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn key(id: &str) -> Item {
        HashMap::from([("Id".to_string(), s(id))])
    }

    fn item(id: &str, color: &str) -> Item {
        HashMap::from([
            ("Id".to_string(), s(id)),
            ("Color".to_string(), s(color)),
        ])
    }

    async fn store_with_table() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.create_table(&driver_table_config()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = store_with_table().await;

        store.put_item("Drivers", item("a", "red")).await.unwrap();

        let retrieved = store.get_item("Drivers", key("a")).await.unwrap();
        assert_eq!(retrieved, Some(item("a", "red")));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = store_with_table().await;
        let result = store.get_item("Drivers", key("missing")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_item() {
        let store = store_with_table().await;
        let mut first = item("a", "red");
        first.insert("Size".to_string(), s("large"));

        store.put_item("Drivers", first).await.unwrap();
        store.put_item("Drivers", item("a", "blue")).await.unwrap();

        let retrieved = store.get_item("Drivers", key("a")).await.unwrap().unwrap();
        assert_eq!(retrieved, item("a", "blue"));
    }

    #[tokio::test]
    async fn test_update_merges_attributes() {
        let store = store_with_table().await;
        let mut first = item("a", "red");
        first.insert("Size".to_string(), s("large"));
        store.put_item("Drivers", first).await.unwrap();

        store
            .update_item("Drivers", key("a"), item("a", "blue"))
            .await
            .unwrap();

        let retrieved = store.get_item("Drivers", key("a")).await.unwrap().unwrap();
        assert_eq!(retrieved.get("Color"), Some(&s("blue")));
        assert_eq!(retrieved.get("Size"), Some(&s("large")));
    }

    #[tokio::test]
    async fn test_update_missing_item_creates_it() {
        let store = store_with_table().await;

        store
            .update_item("Drivers", key("a"), item("a", "green"))
            .await
            .unwrap();

        let retrieved = store.get_item("Drivers", key("a")).await.unwrap();
        assert_eq!(retrieved, Some(item("a", "green")));
    }

    #[tokio::test]
    async fn test_delete_item() {
        let store = store_with_table().await;
        store.put_item("Drivers", item("a", "red")).await.unwrap();

        store.delete_item("Drivers", key("a")).await.unwrap();
        store.delete_item("Drivers", key("a")).await.unwrap();

        assert_eq!(store.item_count("Drivers").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_put_without_key_fails() {
        let store = store_with_table().await;
        let keyless = HashMap::from([("Color".to_string(), s("red"))]);

        let result = store.put_item("Drivers", keyless).await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_operations_on_missing_table() {
        let store = InMemoryStore::new();

        let result = store.get_item("Nope", key("a")).await;
        assert_eq!(
            result,
            Err(RepositoryError::TableNotFound {
                table_name: "Nope".to_string()
            })
        );
        assert!(store.delete_table("Nope").await.is_err());
    }

    #[tokio::test]
    async fn test_create_existing_table_fails() {
        let store = store_with_table().await;
        let result = store.create_table(&driver_table_config()).await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_scan_with_filter_and_limit() {
        let store = store_with_table().await;
        store.put_item("Drivers", item("a", "red")).await.unwrap();
        store.put_item("Drivers", item("b", "blue")).await.unwrap();
        store.put_item("Drivers", item("c", "red")).await.unwrap();

        let all = store.scan("Drivers", None, None).await.unwrap();
        assert_eq!(all.len(), 3);

        let red = ScanFilter::new().eq(["Color"], "red");
        let matches = store.scan("Drivers", Some(&red), None).await.unwrap();
        assert_eq!(matches, vec![item("a", "red"), item("c", "red")]);

        let first = store.scan("Drivers", Some(&red), Some(1)).await.unwrap();
        assert_eq!(first, vec![item("a", "red")]);
    }

    #[tokio::test]
    async fn test_activation_polls() {
        let store = InMemoryStore::new().with_activation_polls(2);
        store.create_table(&driver_table_config()).await.unwrap();

        assert_eq!(
            store.describe_table("Drivers").await.unwrap(),
            Some(TableStatus::Creating)
        );
        assert_eq!(
            store.describe_table("Drivers").await.unwrap(),
            Some(TableStatus::Creating)
        );
        assert_eq!(
            store.describe_table("Drivers").await.unwrap(),
            Some(TableStatus::Active)
        );
    }

    #[tokio::test]
    async fn test_deletion_polls() {
        let store = InMemoryStore::new().with_deletion_polls(2);
        store.create_table(&driver_table_config()).await.unwrap();
        store.delete_table("Drivers").await.unwrap();

        assert_eq!(
            store.describe_table("Drivers").await.unwrap(),
            Some(TableStatus::Deleting)
        );
        assert!(store.delete_table("Drivers").await.is_err());
        assert_eq!(
            store.describe_table("Drivers").await.unwrap(),
            Some(TableStatus::Deleting)
        );
        assert_eq!(store.describe_table("Drivers").await.unwrap(), None);
        assert!(store.create_table(&driver_table_config()).await.is_ok());
    }
}
