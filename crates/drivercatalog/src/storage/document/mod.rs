//! Generic document layer shared by every store backend.
//!
//! Documents are DynamoDB attribute maps. The in-memory store keeps the same
//! representation so that the mapper and filters behave identically against
//! both backends.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

pub mod conversions;
mod filter;
mod store;

pub use filter::{ComparisonOp, Condition, FilterExpression, ScanFilter};
pub use store::DocumentStore;

/// A stored document: attribute name to value.
pub type Item = HashMap<String, AttributeValue>;
