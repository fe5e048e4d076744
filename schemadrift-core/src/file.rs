//! Migration file writing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CoreResult;
use crate::snapshot::Environment;

/// Writes generated statements to a timestamped SQL file.
///
/// Writing is the only side effect; nothing here executes SQL. Applying the
/// file against the target database is a separate, operator-invoked step.
pub struct MigrationWriter {
    /// Directory where migration files are stored.
    migrations_dir: PathBuf,
}

impl MigrationWriter {
    /// Create a writer rooted at a migrations directory.
    pub fn new(migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            migrations_dir: migrations_dir.into(),
        }
    }

    /// Get the migrations directory.
    pub fn migrations_dir(&self) -> &Path {
        &self.migrations_dir
    }

    /// Write the statements to a new migration file, returning its path.
    ///
    /// An empty statement list creates no file and returns `None`.
    pub async fn write(
        &self,
        statements: &[String],
        source: Environment,
        target: Environment,
    ) -> CoreResult<Option<PathBuf>> {
        self.write_at(statements, source, target, Utc::now()).await
    }

    /// Like [`write`](Self::write), with an explicit clock value so the file
    /// name is reproducible under test.
    pub async fn write_at(
        &self,
        statements: &[String],
        source: Environment,
        target: Environment,
        now: DateTime<Utc>,
    ) -> CoreResult<Option<PathBuf>> {
        if statements.is_empty() {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.migrations_dir).await?;

        let path = self.migrations_dir.join(file_name(source, target, now));
        let content = render(statements, source, target, now);

        // Write to a sibling temp file first so a crash mid-write never
        // leaves a half-written .sql file for apply tooling to glob.
        let tmp = path.with_extension("sql.tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::info!(path = %path.display(), statements = statements.len(), "wrote migration file");
        Ok(Some(path))
    }
}

/// Build the `schema-fix-<source>-to-<target>-<timestamp>.sql` file name.
pub fn file_name(source: Environment, target: Environment, now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("schema-fix-{source}-to-{target}-{timestamp}.sql")
}

/// Render the full file body: header comment, transaction-wrapped
/// statements, verification query footer.
fn render(
    statements: &[String],
    source: Environment,
    target: Environment,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "-- Schema fix: {source} -> {target}\n\
         -- Generated at: {}\n\
         -- Statements: {}\n\
         --\n\
         -- Review before applying. This file was generated from a schema\n\
         -- comparison and has not been executed.\n\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
        statements.len()
    ));

    out.push_str("BEGIN;\n\n");
    for statement in statements {
        out.push_str(statement);
        out.push('\n');
    }
    out.push_str("\nCOMMIT;\n");

    out.push_str(
        "\n-- Verify with:\n\
         -- SELECT table_name, column_name, data_type FROM information_schema.columns\n\
         --   WHERE table_schema = 'public' ORDER BY table_name, ordinal_position;\n",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_file_name_at_fixed_clock() {
        let name = file_name(Environment::Development, Environment::Test, fixed_clock());
        assert_eq!(name, "schema-fix-development-to-test-2024-01-15T10-30-00.000Z.sql");
    }

    #[tokio::test]
    async fn test_empty_statements_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MigrationWriter::new(dir.path().join("migrations"));

        let path = writer
            .write(&[], Environment::Development, Environment::Test)
            .await
            .unwrap();
        assert!(path.is_none());
        assert!(!dir.path().join("migrations").exists());
    }

    #[tokio::test]
    async fn test_write_wraps_in_transaction() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MigrationWriter::new(dir.path().join("migrations"));

        let statements = vec!["ALTER TABLE users ADD COLUMN IF NOT EXISTS email TEXT;".to_string()];
        let path = writer
            .write_at(
                &statements,
                Environment::Development,
                Environment::Test,
                fixed_clock(),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "schema-fix-development-to-test-2024-01-15T10-30-00.000Z.sql"
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let begin = content.find("BEGIN;").unwrap();
        let statement = content.find("ALTER TABLE users").unwrap();
        let commit = content.find("COMMIT;").unwrap();
        assert!(begin < statement && statement < commit);
        assert!(content.contains("-- Statements: 1"));
        assert!(content.contains("information_schema.columns"));
    }

    #[tokio::test]
    async fn test_write_creates_directory_and_no_temp_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let migrations = dir.path().join("nested").join("migrations");
        let writer = MigrationWriter::new(&migrations);

        writer
            .write_at(
                &["DROP TABLE IF EXISTS audit_logs;".to_string()],
                Environment::Test,
                Environment::Production,
                fixed_clock(),
            )
            .await
            .unwrap();

        let entries: Vec<_> = std::fs::read_dir(&migrations)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with(".sql"));
    }
}
