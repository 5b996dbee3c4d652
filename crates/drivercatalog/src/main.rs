//! drivercatalog CLI entry point.

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use drivercatalog::cli::{read_driver_file, Cli, Commands};
use drivercatalog::config::Config;
use drivercatalog::storage::dynamodb::{create_client, AwsConfig};
use drivercatalog::storage::{DocumentRepository, DynamoDbStore};
use drivercatalog_core::driver::Name;
use drivercatalog_core::storage::DriverRepository;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drivercatalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let table_name = cli.table_name.unwrap_or_else(|| config.table_name.clone());

    let aws_config = AwsConfig::from_env();
    tracing::info!(endpoint = %aws_config.target_display(), table = %table_name, "Connecting");
    let client = create_client(&aws_config).await;

    let repo = DocumentRepository::new(DynamoDbStore::new(client), &table_name)
        .with_poll_settings(config.poll_settings());

    match cli.command {
        Commands::SetupTable => {
            repo.setup_table().await?;
            println!("Table {} is active", table_name);
        }
        Commands::DropTable => {
            repo.drop_table().await?;
            println!("Table {} dropped", table_name);
        }
        Commands::Get { id } => match repo.load(&id).await? {
            Some(driver) => print_json(&driver)?,
            None => anyhow::bail!("Driver not found: {}", id),
        },
        Commands::Delete { id } => {
            repo.delete(&id).await?;
            println!("Deleted driver {}", id);
        }
        Commands::List { sort_by, order } => {
            let drivers = repo.list(sort_by, order).await?;
            print_json(&drivers)?;
        }
        Commands::Exists {
            first_name,
            last_name,
        } => {
            let exists = repo.exists(&Name::new(first_name, last_name)).await?;
            print_json(&exists)?;
        }
        Commands::Save { file, touch } => {
            let mut driver = read_driver_file(&file).await?;
            if touch {
                driver.touch(Utc::now());
            }

            repo.save(&driver).await?;
            print_json(&driver)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
