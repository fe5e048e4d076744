//! Migration history records and the `schema_migrations` tracking table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CoreResult, DriftError};
use crate::snapshot::Environment;

/// A row of the `schema_migrations` tracking table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Unique migration identifier (the file stem).
    pub migration_id: String,
    /// Human-readable migration name.
    pub name: String,
    /// When the migration was applied.
    pub applied_at: DateTime<Utc>,
    /// SHA-256 checksum of the applied SQL, hex encoded.
    pub checksum: String,
    /// Environment the migration was applied to.
    pub environment: Environment,
}

/// SQL for initializing the tracking table (PostgreSQL).
pub const SCHEMA_MIGRATIONS_INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    id SERIAL PRIMARY KEY,
    migration_id VARCHAR(255) UNIQUE NOT NULL,
    name VARCHAR(255) NOT NULL,
    applied_at TIMESTAMP NOT NULL DEFAULT NOW(),
    checksum VARCHAR(64) NOT NULL,
    environment VARCHAR(32) NOT NULL
);
"#;

/// Compute the SHA-256 checksum of migration content, hex encoded.
pub fn compute_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// The components of a `schema-fix-<source>-to-<target>-<timestamp>.sql`
/// file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMigrationName {
    /// Environment the schema was read from.
    pub source: Environment,
    /// Environment the migration targets.
    pub target: Environment,
    /// File-name-safe timestamp (RFC 3339 with colons replaced by dashes).
    pub timestamp: String,
}

impl ParsedMigrationName {
    /// Migration identifier: the file name without the `.sql` extension.
    pub fn migration_id(&self) -> String {
        format!(
            "schema-fix-{}-to-{}-{}",
            self.source, self.target, self.timestamp
        )
    }
}

/// Parse a migration file name back into its components.
///
/// Accepts a bare file name, with or without the `.sql` extension.
pub fn parse_migration_file_name(file_name: &str) -> CoreResult<ParsedMigrationName> {
    let stem = file_name.strip_suffix(".sql").unwrap_or(file_name);

    let rest = stem
        .strip_prefix("schema-fix-")
        .ok_or_else(|| DriftError::invalid_migration_name(file_name))?;

    let (source_str, rest) = rest
        .split_once("-to-")
        .ok_or_else(|| DriftError::invalid_migration_name(file_name))?;

    // Environment names never contain a dash, so the first segment after
    // "-to-" is the target and everything else is the timestamp.
    let (target_str, timestamp) = rest
        .split_once('-')
        .ok_or_else(|| DriftError::invalid_migration_name(file_name))?;

    if timestamp.is_empty() {
        return Err(DriftError::invalid_migration_name(file_name));
    }

    Ok(ParsedMigrationName {
        source: source_str.parse()?,
        target: target_str.parse()?,
        timestamp: timestamp.to_string(),
    })
}
