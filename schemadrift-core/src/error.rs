//! Error types for drift detection and migration file generation.

use thiserror::Error;

/// Result type alias for core drift operations.
pub type CoreResult<T> = Result<T, DriftError>;

/// Errors that can occur while diffing schemas or writing migration files.
#[derive(Debug, Error)]
pub enum DriftError {
    /// Migration file or directory could not be written.
    #[error("file write error: {0}")]
    FileWrite(#[from] std::io::Error),

    /// Environment name is not one of development/test/production.
    #[error("unknown environment '{0}' (expected development, test or production)")]
    UnknownEnvironment(String),

    /// A migration file name does not match the schema-fix pattern.
    #[error("invalid migration file name: {0}")]
    InvalidMigrationName(String),
}

impl DriftError {
    /// Create an invalid migration name error.
    pub fn invalid_migration_name(name: impl Into<String>) -> Self {
        Self::InvalidMigrationName(name.into())
    }
}
