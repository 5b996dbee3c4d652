mod error;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use traits::DriverRepository;
pub use types::{SaveMode, SortField, SortOrder};
