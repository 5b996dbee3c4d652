//! DynamoDB storage backend implementation.
//!
//! This module provides a DynamoDB-based implementation of the document store
//! using `aws-sdk-dynamodb`.

mod client;
mod error;
mod store;

pub use client::{create_client, AwsConfig};
pub use store::{update_expression, DynamoDbStore, UpdateExpression};
