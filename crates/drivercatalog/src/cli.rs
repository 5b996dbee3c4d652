//! CLI command definitions.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use drivercatalog_core::driver::Driver;
use drivercatalog_core::storage::{SortField, SortOrder};

/// Admin CLI for the driver catalog table.
#[derive(Debug, Parser)]
#[command(name = "drivercatalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Driver table name. Defaults to the configured table.
    #[arg(long, global = true, env = "DRIVERS_TABLE_NAME")]
    pub table_name: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the driver table and wait until it is active.
    SetupTable,
    /// Delete the driver table and wait until it is gone.
    DropTable,
    /// Print a driver by ID.
    Get {
        /// Driver ID.
        id: String,
    },
    /// Delete a driver by ID.
    Delete {
        /// Driver ID.
        id: String,
    },
    /// List every driver sorted by a name field.
    List {
        /// Name field to sort by (FirstName or LastName).
        #[arg(long, default_value = "FirstName")]
        sort_by: SortField,
        /// Sort direction: "asc" sorts ascending, anything else descending.
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    /// Check whether a driver with this exact name exists.
    Exists {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Save a driver read from a JSON file.
    Save {
        /// Path to the driver JSON document.
        file: PathBuf,
        /// Stamp ModifiedAt with the current time so the save updates an
        /// existing record.
        #[arg(long)]
        touch: bool,
    },
}

/// Reads a driver JSON document from `path`.
pub async fn read_driver_file(path: &Path) -> anyhow::Result<Driver> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid driver document in {}", path.display()))
}
