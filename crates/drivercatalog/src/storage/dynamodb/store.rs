//! DynamoDB document store implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use drivercatalog_core::storage::{RepositoryError, Result};

use super::error::{
    map_create_table_error, map_delete_item_error, map_delete_table_error,
    map_describe_table_error, map_get_item_error, map_put_item_error, map_scan_error,
    map_update_item_error,
};
use crate::storage::document::{DocumentStore, Item, ScanFilter};
use crate::storage::table::{AttributeType, TableConfig, TableStatus};

/// DynamoDB-based document store.
///
/// The SDK client is cheap to clone and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// An UpdateItem `SET` clause with its placeholder maps.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

/// Build a `SET` expression assigning every attribute of `item` that is not
/// part of `key`. Returns `None` when there is nothing to set.
///
/// Attributes are assigned in name order so the expression is deterministic.
pub fn update_expression(key: &Item, item: &Item) -> Option<UpdateExpression> {
    let mut attributes: Vec<(&String, &AttributeValue)> = item
        .iter()
        .filter(|(name, _)| !key.contains_key(*name))
        .collect();
    if attributes.is_empty() {
        return None;
    }
    attributes.sort_by(|a, b| a.0.cmp(b.0));

    let mut names = HashMap::with_capacity(attributes.len());
    let mut values = HashMap::with_capacity(attributes.len());
    let mut assignments = Vec::with_capacity(attributes.len());

    for (index, (name, value)) in attributes.into_iter().enumerate() {
        let name_placeholder = format!("#a{index}");
        let value_placeholder = format!(":a{index}");
        assignments.push(format!("{name_placeholder} = {value_placeholder}"));
        names.insert(name_placeholder, name.clone());
        values.insert(value_placeholder, value.clone());
    }

    Some(UpdateExpression {
        expression: format!("SET {}", assignments.join(", ")),
        names,
        values,
    })
}

fn to_scalar_type(attr_type: &AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}

fn to_table_status(status: Option<&aws_sdk_dynamodb::types::TableStatus>) -> TableStatus {
    use aws_sdk_dynamodb::types::TableStatus as SdkTableStatus;

    match status {
        Some(SdkTableStatus::Active) => TableStatus::Active,
        Some(SdkTableStatus::Creating) => TableStatus::Creating,
        Some(SdkTableStatus::Updating) => TableStatus::Updating,
        Some(SdkTableStatus::Deleting) => TableStatus::Deleting,
        _ => TableStatus::Unknown,
    }
}

fn build_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Invalid request: {}", err))
}

#[async_trait]
impl DocumentStore for DynamoDbStore {
    async fn create_table(&self, config: &TableConfig) -> Result<()> {
        let key_schema = KeySchemaElement::builder()
            .attribute_name(&config.partition_key.name)
            .key_type(KeyType::Hash)
            .build()
            .map_err(build_error)?;

        let attribute_definition = AttributeDefinition::builder()
            .attribute_name(&config.partition_key.name)
            .attribute_type(to_scalar_type(&config.partition_key.attribute_type))
            .build()
            .map_err(build_error)?;

        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(config.throughput.read_capacity_units)
            .write_capacity_units(config.throughput.write_capacity_units)
            .build()
            .map_err(build_error)?;

        tracing::debug!(table = %config.table_name, "CreateTable");
        self.client
            .create_table()
            .table_name(&config.table_name)
            .key_schema(key_schema)
            .attribute_definitions(attribute_definition)
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &config.table_name))?;

        Ok(())
    }

    async fn describe_table(&self, table_name: &str) -> Result<Option<TableStatus>> {
        match self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.table().and_then(|table| table.table_status());
                Ok(Some(to_table_status(status)))
            }
            Err(err) => map_describe_table_error(err),
        }
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        tracing::debug!(table = %table_name, "DeleteTable");
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_delete_table_error(e, table_name))?;
        Ok(())
    }

    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table_name))?;
        Ok(())
    }

    async fn update_item(&self, table_name: &str, key: Item, item: Item) -> Result<()> {
        let mut request = self.client.update_item().table_name(table_name);

        if let Some(update) = update_expression(&key, &item) {
            request = request
                .update_expression(update.expression)
                .set_expression_attribute_names(Some(update.names))
                .set_expression_attribute_values(Some(update.values));
        }

        request
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_update_item_error(e, table_name))?;
        Ok(())
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<Option<Item>> {
        let result = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table_name))?;

        Ok(result.item)
    }

    async fn delete_item(&self, table_name: &str, key: Item) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(key))
            .send()
            .await
            .map_err(|e| map_delete_item_error(e, table_name))?;
        Ok(())
    }

    async fn scan(
        &self,
        table_name: &str,
        filter: Option<&ScanFilter>,
        limit: Option<usize>,
    ) -> Result<Vec<Item>> {
        let rendered = filter
            .filter(|f| !f.is_empty())
            .map(ScanFilter::to_expression);

        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(table_name)
                .set_exclusive_start_key(start_key.take());

            if let Some(rendered) = &rendered {
                request = request
                    .filter_expression(&rendered.expression)
                    .set_expression_attribute_names(Some(rendered.names.clone()))
                    .set_expression_attribute_values(Some(rendered.values.clone()));
            }

            let output = request
                .send()
                .await
                .map_err(|e| map_scan_error(e, table_name))?;
            pages += 1;

            items.extend(output.items.unwrap_or_default());

            if let Some(limit) = limit {
                if items.len() >= limit {
                    items.truncate(limit);
                    break;
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(table = %table_name, pages, items = items.len(), "Scan complete");
        Ok(items)
    }
}
