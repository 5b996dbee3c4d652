use std::fmt;
use std::str::FromStr;

use crate::driver::Driver;

use super::RepositoryError;

/// The `Name` sub-field a driver listing is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    FirstName,
    LastName,
}

impl SortField {
    /// The attribute name of this field inside a stored `Name` document.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            SortField::FirstName => "FirstName",
            SortField::LastName => "LastName",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute_name())
    }
}

impl FromStr for SortField {
    type Err = RepositoryError;

    /// Accepts `FirstName`, `first_name` or `first-name` in any case, and the
    /// same forms for `LastName`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "firstname" => Ok(SortField::FirstName),
            "lastname" => Ok(SortField::LastName),
            _ => Err(RepositoryError::InvalidArgument(format!(
                "Unknown sort field: {}",
                s
            ))),
        }
    }
}

/// Direction of a driver listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses a sort direction. `asc` and `ascending` (any case) are
    /// ascending; every other value is descending.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("asc"),
            SortOrder::Descending => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SortOrder::parse(s))
    }
}

/// How a save reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// Full-record insert-or-replace.
    Create,
    /// Field-level update of an existing record.
    Update,
}

impl SaveMode {
    /// A driver that has never been modified is written as a new record;
    /// anything else is an update.
    pub fn for_driver(driver: &Driver) -> Self {
        if driver.modified_at.is_none() {
            SaveMode::Create
        } else {
            SaveMode::Update
        }
    }
}
