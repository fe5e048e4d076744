//! `schemadrift apply` command - Apply a generated migration file.

use schemadrift_core::{compute_checksum, parse_migration_file_name, SCHEMA_MIGRATIONS_INIT_SQL};
use schemadrift_postgres::PgPool;

use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::output::{self, kv};

/// Run the apply command. Returns the process exit code.
pub async fn run(args: ApplyArgs, config: &Config) -> CliResult<i32> {
    let file_name = args
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::migration(format!("invalid path: {}", args.file.display())))?;

    let parsed = parse_migration_file_name(file_name)?;
    let target = args.target.unwrap_or(parsed.target);
    let migration_id = parsed.migration_id();

    let sql = tokio::fs::read_to_string(&args.file)
        .await
        .map_err(|e| CliError::migration(format!("cannot read {}: {e}", args.file.display())))?;
    let checksum = compute_checksum(&sql);

    output::header(&format!("Applying migration to {target}"));
    kv("File", &args.file.display().to_string());
    kv("Checksum", &checksum);

    let url = config.url_for(target)?;
    let pool = PgPool::from_url(url).await?;
    let result = apply(&pool, &migration_id, &sql, &checksum, target).await;
    pool.close();
    result
}

async fn apply(
    pool: &PgPool,
    migration_id: &str,
    sql: &str,
    checksum: &str,
    target: schemadrift_core::Environment,
) -> CliResult<i32> {
    let mut client = pool.get().await?;

    client.batch_execute(SCHEMA_MIGRATIONS_INIT_SQL).await?;

    let already = client
        .query_opt(
            "SELECT checksum FROM schema_migrations WHERE migration_id = $1",
            &[&migration_id],
        )
        .await?;

    if let Some(row) = already {
        let recorded: String = row.get("checksum");
        if recorded == checksum {
            output::newline();
            output::info("Migration already applied, nothing to do");
            return Ok(0);
        }
        return Err(CliError::migration(format!(
            "migration {migration_id} was already applied with a different checksum"
        )));
    }

    // Statements and the tracking insert commit atomically: strip the
    // file's own BEGIN/COMMIT wrapping so everything joins one
    // client-owned transaction.
    let body = strip_transaction_wrapping(sql);
    let tx = client.transaction().await?;
    tx.batch_execute(&body).await?;
    tx.execute(
        "INSERT INTO schema_migrations (migration_id, name, checksum, environment) \
         VALUES ($1, $2, $3, $4)",
        &[&migration_id, &migration_id, &checksum, &target.as_str()],
    )
    .await?;
    tx.commit().await?;

    output::newline();
    output::success(&format!("Applied {migration_id}"));
    Ok(0)
}

/// Remove the bare `BEGIN;`/`COMMIT;` lines a generated file carries so its
/// statements can run inside a caller-owned transaction.
fn strip_transaction_wrapping(sql: &str) -> String {
    sql.lines()
        .filter(|line| {
            let trimmed = line.trim();
            trimmed != "BEGIN;" && trimmed != "COMMIT;"
        })
        .collect::<Vec<_>>()
        .join("\n")
}
