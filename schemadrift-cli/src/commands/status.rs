//! `schemadrift status` command - List applied migrations.

use chrono::{DateTime, NaiveDateTime, Utc};
use tokio_postgres::error::SqlState;

use schemadrift_core::MigrationRecord;
use schemadrift_postgres::PgPool;

use crate::cli::StatusArgs;
use crate::config::Config;
use crate::error::CliResult;
use crate::output::{self, kv};

/// Run the status command. Returns the process exit code.
pub async fn run(args: StatusArgs, config: &Config) -> CliResult<i32> {
    let url = config.url_for(args.environment)?;
    let pool = PgPool::from_url(url).await?;
    let result = show(&pool, args.environment).await;
    pool.close();
    result
}

async fn show(pool: &PgPool, environment: schemadrift_core::Environment) -> CliResult<i32> {
    let client = pool.get().await?;

    output::header(&format!("Applied migrations: {environment}"));

    let rows = match client
        .query(
            "SELECT migration_id, name, applied_at, checksum, environment \
             FROM schema_migrations ORDER BY applied_at, id",
            &[],
        )
        .await
    {
        Ok(rows) => rows,
        Err(e) if e.code() == Some(&SqlState::UNDEFINED_TABLE) => {
            output::info("No schema_migrations table: nothing has been applied yet");
            return Ok(0);
        }
        Err(e) => return Err(e.into()),
    };

    if rows.is_empty() {
        output::info("No migrations applied");
        return Ok(0);
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let applied_at: NaiveDateTime = row.get("applied_at");
        let environment: String = row.get("environment");
        records.push(MigrationRecord {
            migration_id: row.get("migration_id"),
            name: row.get("name"),
            applied_at: DateTime::from_naive_utc_and_offset(applied_at, Utc),
            checksum: row.get("checksum"),
            environment: environment.parse()?,
        });
    }

    for record in &records {
        output::list_item(&format!(
            "{}  {}  {}",
            record.migration_id,
            record.applied_at.format("%Y-%m-%d %H:%M:%S"),
            &record.checksum[..12.min(record.checksum.len())]
        ));
    }

    output::newline();
    kv("Total", &records.len().to_string());
    Ok(0)
}
