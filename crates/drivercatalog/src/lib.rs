//! DynamoDB-backed persistence for the driver catalog.
//!
//! Builds on the contracts in `drivercatalog_core`: the storage module
//! implements `DriverRepository` over a pluggable document store, and the
//! binary wraps it in a small admin CLI.

pub mod cli;
pub mod config;
pub mod storage;
