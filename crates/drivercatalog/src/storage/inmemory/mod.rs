//! In-memory storage backend for testing.
//!
//! This module provides an in-memory implementation of [`DocumentStore`] that
//! keeps every table in a HashMap wrapped in `Arc<RwLock<_>>`. Items use the
//! same attribute-map representation as DynamoDB, so the driver repository
//! runs unchanged on top of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use drivercatalog::storage::{DocumentRepository, InMemoryStore};
//!
//! let repo = DocumentRepository::new(InMemoryStore::new(), "Drivers");
//! // Use repo for testing...
//! ```
//!
//! [`DocumentStore`]: crate::storage::document::DocumentStore

mod store;

pub use store::InMemoryStore;
