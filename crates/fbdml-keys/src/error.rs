//! Error types for generated-keys query building.

use crate::support::DisabledReason;

/// Errors that can occur while building a generated-keys query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeysError {
    /// Generated keys were requested but support is disabled.
    #[error("Generated keys functionality not available, reason: {0}")]
    SupportNotAvailable(DisabledReason),

    /// A column index or column name array was empty.
    #[error("Generated keys array {0} was empty")]
    EmptyColumnArray(&'static str),

    /// A requested column position does not exist in the table.
    #[error("Column position {position} does not exist in table {table}")]
    InvalidColumnPosition {
        /// The 1-based position that was requested.
        position: usize,
        /// The table name as written in the statement.
        table: String,
    },

    /// The metadata returned no columns for the table.
    #[error("No columns were found for table {0} to build RETURNING clause")]
    NoColumnsFound(String),

    /// The generated-keys flag is neither `RETURN_GENERATED_KEYS` nor
    /// `NO_GENERATED_KEYS`.
    #[error("Invalid generated keys option: {0}")]
    InvalidOption(i32),

    /// A server version could not be parsed.
    #[error("Invalid server version '{0}': expected MAJOR.MINOR")]
    InvalidServerVersion(String),
}

/// Result type for generated-keys operations.
pub type Result<T> = std::result::Result<T, KeysError>;
