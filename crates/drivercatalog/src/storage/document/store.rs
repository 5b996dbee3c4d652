use async_trait::async_trait;
use drivercatalog_core::storage::Result;

use super::{Item, ScanFilter};
use crate::storage::table::{TableConfig, TableStatus};

/// The document store operations the driver repository consumes.
///
/// Implementations are responsible for transport, retries and pagination;
/// each call is atomic from the caller's point of view.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Issues a create-table request. Does not wait for readiness.
    async fn create_table(&self, config: &TableConfig) -> Result<()>;

    /// Returns the table status, or `None` if the table does not exist.
    async fn describe_table(&self, table_name: &str) -> Result<Option<TableStatus>>;

    /// Issues a delete-table request.
    async fn delete_table(&self, table_name: &str) -> Result<()>;

    /// Writes a whole item, replacing any item with the same key.
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()>;

    /// Sets every non-key attribute of `item` on the item addressed by `key`.
    /// Attributes not present in `item` are left untouched.
    async fn update_item(&self, table_name: &str, key: Item, item: Item) -> Result<()>;

    /// Reads an item by key.
    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>>;

    /// Deletes an item by key. Deleting a missing item succeeds.
    async fn delete_item(&self, table_name: &str, key: Item) -> Result<()>;

    /// Reads every item matching `filter`, stopping once `limit` matches have
    /// been collected. Without a limit the whole table is examined.
    async fn scan(
        &self,
        table_name: &str,
        filter: Option<&ScanFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Item>>;
}
