//! CLI error types and result alias.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// IO error
    #[error("IO error: {0}")]
    #[diagnostic(code(schemadrift::io))]
    Io(#[from] std::io::Error),

    /// Configuration error (missing env var, bad URL, unknown environment)
    #[error("Configuration error: {0}")]
    #[diagnostic(code(schemadrift::config))]
    Config(String),

    /// Database connection error
    #[error("Connection error: {0}")]
    #[diagnostic(code(schemadrift::connection))]
    Connection(String),

    /// Catalog or tracking-table query error
    #[error("Query error: {0}")]
    #[diagnostic(code(schemadrift::query))]
    Query(String),

    /// Migration file error
    #[error("Migration error: {0}")]
    #[diagnostic(code(schemadrift::migration))]
    Migration(String),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a migration error.
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }
}

impl From<schemadrift_postgres::PgError> for CliError {
    fn from(err: schemadrift_postgres::PgError) -> Self {
        use schemadrift_postgres::PgError;
        match err {
            PgError::Config(msg) => CliError::Config(msg),
            PgError::Connection(msg) => CliError::Connection(msg),
            PgError::Postgres(e) => CliError::Query(e.to_string()),
            PgError::Query(msg) => CliError::Query(msg),
        }
    }
}

impl From<schemadrift_core::DriftError> for CliError {
    fn from(err: schemadrift_core::DriftError) -> Self {
        use schemadrift_core::DriftError;
        match err {
            DriftError::FileWrite(e) => CliError::Io(e),
            DriftError::UnknownEnvironment(_) => CliError::Config(err.to_string()),
            DriftError::InvalidMigrationName(_) => CliError::Migration(err.to_string()),
        }
    }
}

impl From<tokio_postgres::Error> for CliError {
    fn from(err: tokio_postgres::Error) -> Self {
        CliError::Query(err.to_string())
    }
}
