//! CLI configuration handling.
//!
//! All environment variables are read exactly once, here, when the config
//! is constructed at process start. Everything downstream receives the
//! config by parameter, so tests can fabricate one without touching the
//! process environment.

use schemadrift_core::Environment;

use crate::error::{CliError, CliResult};

/// Environment variable holding the development database URL
pub const DEV_DATABASE_URL: &str = "DEV_DATABASE_URL";

/// Environment variable holding the test database URL
pub const TEST_DATABASE_URL: &str = "TEST_DATABASE_URL";

/// Environment variable holding the production database URL
pub const DATABASE_URL: &str = "DATABASE_URL";

/// Default migrations directory (relative to the working directory)
pub const MIGRATIONS_DIR: &str = "migrations";

/// Resolved runtime configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Development database URL, if set
    pub dev_database_url: Option<String>,

    /// Test database URL, if set
    pub test_database_url: Option<String>,

    /// Production database URL, if set
    pub database_url: Option<String>,
}

impl Config {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Self {
        Self {
            dev_database_url: std::env::var(DEV_DATABASE_URL).ok(),
            test_database_url: std::env::var(TEST_DATABASE_URL).ok(),
            database_url: std::env::var(DATABASE_URL).ok(),
        }
    }

    /// Resolve the database URL for an environment.
    pub fn url_for(&self, environment: Environment) -> CliResult<&str> {
        let (url, var) = match environment {
            Environment::Development => (&self.dev_database_url, DEV_DATABASE_URL),
            Environment::Test => (&self.test_database_url, TEST_DATABASE_URL),
            Environment::Production => (&self.database_url, DATABASE_URL),
        };

        url.as_deref().ok_or_else(|| {
            CliError::config(format!(
                "no database URL for environment '{environment}': set {var}"
            ))
        })
    }
}
