//! Storage layer for driver records.
//!
//! The repository in [`DocumentRepository`] talks to a [`DocumentStore`],
//! which is either DynamoDB ([`DynamoDbStore`]) or an in-memory stand-in
//! ([`InMemoryStore`]) used by tests.
//!
//! [`DocumentStore`]: document::DocumentStore

pub mod document;
pub mod dynamodb;
pub mod inmemory;
mod repository;
pub mod table;

pub use dynamodb::DynamoDbStore;
pub use inmemory::InMemoryStore;
pub use repository::DocumentRepository;
