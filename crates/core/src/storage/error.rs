use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// A missing record is not an error: point lookups return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Table not found: {table_name}")]
    TableNotFound { table_name: String },
    #[error("Table {table_name} did not become ready after {attempts} attempts")]
    TableActivationTimeout { table_name: String, attempts: u32 },
    #[error("Table {table_name} was not deleted after {attempts} attempts")]
    TableDeletionTimeout { table_name: String, attempts: u32 },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_connection_failed_display() {
        let error = RepositoryError::ConnectionFailed("timeout after 30s".to_string());
        assert_eq!(error.to_string(), "Connection failed: timeout after 30s");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("Throughput exceeded, please retry".to_string());
        assert_eq!(
            error.to_string(),
            "Query failed: Throughput exceeded, please retry"
        );
    }

    #[test]
    fn test_repository_error_table_not_found_display() {
        let error = RepositoryError::TableNotFound {
            table_name: "Drivers".to_string(),
        };
        assert_eq!(error.to_string(), "Table not found: Drivers");
    }

    #[test]
    fn test_repository_error_activation_timeout_display() {
        let error = RepositoryError::TableActivationTimeout {
            table_name: "Drivers".to_string(),
            attempts: 60,
        };
        assert_eq!(
            error.to_string(),
            "Table Drivers did not become ready after 60 attempts"
        );
    }

    #[test]
    fn test_repository_error_deletion_timeout_display() {
        let error = RepositoryError::TableDeletionTimeout {
            table_name: "Drivers".to_string(),
            attempts: 60,
        };
        assert_eq!(
            error.to_string(),
            "Table Drivers was not deleted after 60 attempts"
        );
    }

    #[test]
    fn test_repository_error_invalid_data_display() {
        let error = RepositoryError::InvalidData("Missing or invalid field: Name".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid data: Missing or invalid field: Name"
        );
    }

    #[test]
    fn test_repository_error_invalid_argument_display() {
        let error = RepositoryError::InvalidArgument("driver id cannot be empty".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid argument: driver id cannot be empty"
        );
    }
}
