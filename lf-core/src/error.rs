//! Global error type for the lost-and-found register.
//!
//! Every failure across providers, the storage manager and the CLI is
//! expressed as one `LfError` enum with conversions from underlying library
//! errors.

use thiserror::Error;

/// Convenience type alias for Results using LfError.
pub type LfResult<T> = Result<T, LfError>;

/// Unified error type for the lost-and-found register.
#[derive(Error, Debug)]
pub enum LfError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    // -- Provider errors --
    /// A storage operation was attempted on a provider that is not connected.
    #[error("storage provider not connected: {0}")]
    NotConnected(String),

    /// A record referenced by id does not exist in its collection.
    #[error("{collection}: no record with id {id}")]
    NotFound {
        /// Collection wire name.
        collection: String,
        /// Requested record id.
        id: String,
    },

    /// An import blob or loaded file could not be parsed.
    #[error("invalid data format: {0}")]
    InvalidFormat(String),

    /// One or more puts of a best-effort bulk write failed.
    #[error("failed to set {failed} of {total} items in {collection}")]
    BulkWrite {
        /// Collection wire name.
        collection: String,
        /// Number of failed puts.
        failed: usize,
        /// Number of attempted puts.
        total: usize,
    },

    /// The active provider lacks an optional capability.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    // -- Database errors --
    /// SQLite database error.
    #[error("database error: {0}")]
    Database(String),

    /// Database connection pool error.
    #[error("connection pool error: {0}")]
    Pool(String),

    /// Database integrity check failed.
    #[error("database integrity check failed: {0}")]
    IntegrityCheck(String),

    // -- Manager errors --
    /// The storage manager has not been initialized.
    #[error("storage manager not initialized")]
    NotInitialized,

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Wrapping anyhow errors for interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LfError {
    /// Build a `NotFound` error for a collection name and id.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        LfError::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Whether this error reports a missing record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LfError::NotFound { .. })
    }
}

impl From<serde_json::Error> for LfError {
    fn from(e: serde_json::Error) -> Self {
        LfError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for LfError {
    fn from(e: toml::de::Error) -> Self {
        LfError::Config(e.to_string())
    }
}

impl From<rusqlite::Error> for LfError {
    fn from(e: rusqlite::Error) -> Self {
        LfError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_error_display() {
        let err = LfError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_not_found_display() {
        let err = LfError::not_found("lapelBadges", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "lapelBadges: no record with id abc");
    }

    #[test]
    fn test_bulk_write_display() {
        let err = LfError::BulkWrite {
            collection: "counters".into(),
            failed: 2,
            total: 5,
        };
        assert_eq!(err.to_string(), "failed to set 2 of 5 items in counters");
    }

    #[test]
    fn test_json_error_converts_to_serialization() {
        let parse = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: LfError = parse.into();
        assert!(matches!(err, LfError::Serialization(_)));
    }
}
