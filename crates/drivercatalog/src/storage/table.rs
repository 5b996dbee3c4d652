//! Driver table provisioning.
//!
//! Table creation and deletion are administrative operations, run once at
//! provisioning time and never on a request-serving path. Both wait for the
//! store to settle by polling `describe_table`, bounded by [`PollSettings`].

use std::time::Duration;

use drivercatalog_core::storage::{RepositoryError, Result};

use super::document::conversions;
use super::document::DocumentStore;

/// Default table name for the driver catalog.
pub const DEFAULT_TABLE_NAME: &str = "Drivers";

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub throughput: ProvisionedThroughput,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

/// Provisioned read/write capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: i64,
    pub write_capacity_units: i64,
}

/// Table status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Active,
    Creating,
    Updating,
    Deleting,
    Unknown,
}

impl TableConfig {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }
}

/// Returns the canonical table configuration for the driver catalog: a single
/// string hash key on `Id` and 2/2 provisioned capacity.
pub fn driver_table_config() -> TableConfig {
    TableConfig {
        table_name: DEFAULT_TABLE_NAME.to_string(),
        partition_key: KeyAttribute {
            name: conversions::ID.to_string(),
            attribute_type: AttributeType::String,
        },
        throughput: ProvisionedThroughput {
            read_capacity_units: 2,
            write_capacity_units: 2,
        },
    }
}

/// How often and how long to poll the store while waiting on a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub poll_interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_attempts: 60,
        }
    }
}

/// Creates the table unless it already exists, then waits until it is active.
pub async fn setup_table<S>(store: &S, config: &TableConfig, poll: &PollSettings) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    match store.describe_table(&config.table_name).await? {
        None => {
            tracing::info!(table = %config.table_name, "Creating table");
            store.create_table(config).await?;
        }
        Some(TableStatus::Deleting) => {
            tracing::info!(
                table = %config.table_name,
                "Table is being deleted, waiting before recreating it"
            );
            wait_for_table_gone(store, &config.table_name, poll).await?;
            tracing::info!(table = %config.table_name, "Creating table");
            store.create_table(config).await?;
        }
        Some(status) => {
            tracing::info!(
                table = %config.table_name,
                ?status,
                "Table already exists, skipping creation"
            );
        }
    }

    wait_for_table_active(store, &config.table_name, poll).await?;
    tracing::info!(table = %config.table_name, "Table is active");
    Ok(())
}

/// Deletes the table if it exists, then waits until it is gone.
pub async fn drop_table<S>(store: &S, table_name: &str, poll: &PollSettings) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    if store.describe_table(table_name).await?.is_none() {
        tracing::info!(table = %table_name, "Table already gone, nothing to drop");
        return Ok(());
    }

    tracing::info!(table = %table_name, "Deleting table");
    store.delete_table(table_name).await?;

    wait_for_table_gone(store, table_name, poll).await?;
    tracing::info!(table = %table_name, "Table deleted");
    Ok(())
}

async fn wait_for_table_active<S>(store: &S, table_name: &str, poll: &PollSettings) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    for attempt in 1..=poll.max_attempts {
        let status = store.describe_table(table_name).await?;
        tracing::debug!(table = %table_name, attempt, ?status, "Polled table status");

        if status == Some(TableStatus::Active) {
            return Ok(());
        }
        tokio::time::sleep(poll.poll_interval).await;
    }

    tracing::warn!(
        table = %table_name,
        attempts = poll.max_attempts,
        "Timed out waiting for table to become active"
    );
    Err(RepositoryError::TableActivationTimeout {
        table_name: table_name.to_string(),
        attempts: poll.max_attempts,
    })
}

async fn wait_for_table_gone<S>(store: &S, table_name: &str, poll: &PollSettings) -> Result<()>
where
    S: DocumentStore + ?Sized,
{
    for attempt in 1..=poll.max_attempts {
        let status = store.describe_table(table_name).await?;
        tracing::debug!(table = %table_name, attempt, ?status, "Polled table status");

        if status.is_none() {
            return Ok(());
        }
        tokio::time::sleep(poll.poll_interval).await;
    }

    tracing::warn!(
        table = %table_name,
        attempts = poll.max_attempts,
        "Timed out waiting for table deletion"
    );
    Err(RepositoryError::TableDeletionTimeout {
        table_name: table_name.to_string(),
        attempts: poll.max_attempts,
    })
}
