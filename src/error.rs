use thiserror::Error;

/// Error type for mysqlrs operations
#[derive(Debug, Error)]
pub enum MysqlRsError {
    #[error("Could not connect to MySQL database: {0}")]
    ConnectionFailed(String),

    #[error("MySQL error #{code}: {message}")]
    QueryFailed { code: u16, message: String },

    #[error("Invalid conjunction: {0}")]
    InvalidConjunction(String),

    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid value for column {column}: {message}")]
    InvalidValue { column: String, message: String },
}

impl MysqlRsError {
    /// Shorthand for a query failure that did not come with a server error code.
    pub(crate) fn query(message: impl Into<String>) -> Self {
        MysqlRsError::QueryFailed {
            code: 0,
            message: message.into(),
        }
    }
}

/// Result type alias for mysqlrs operations
pub type Result<T> = std::result::Result<T, MysqlRsError>;
