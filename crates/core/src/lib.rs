//! Core domain model and storage contracts for the driver catalog.
//!
//! This crate is pure: it defines the [`driver::Driver`] aggregate, the
//! repository trait callers program against, and the error taxonomy. Store
//! implementations live in the `drivercatalog` crate.

pub mod driver;
pub mod storage;
