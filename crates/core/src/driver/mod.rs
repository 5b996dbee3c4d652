mod types;

pub use types::{Address, Car, Driver, Name};
