//! `schemadrift diff` command - Compare two environments and generate a fix.

use schemadrift_core::{
    diff, DriftReport, Environment, MigrationWriter, NamingPolicy, PostgresSqlGenerator,
    SchemaSnapshot, EXIT_NO_DRIFT,
};
use schemadrift_postgres::{Introspector, PgPool};

use crate::cli::DiffArgs;
use crate::config::Config;
use crate::error::{CliError, CliResult};
use crate::output::{self, kv, style_added, style_removed};

/// Run the diff command. Returns the process exit code: 0 when the
/// environments match, 1 when drift was found.
pub async fn run(args: DiffArgs, config: &Config) -> CliResult<i32> {
    let (source_env, target_env) = match (args.source, args.target) {
        (Some(source), Some(target)) => (source, target),
        _ => {
            return Err(CliError::config(
                "both a source and a target environment are required",
            ));
        }
    };

    if source_env == target_env {
        return Err(CliError::config(
            "source and target environments must differ",
        ));
    }

    // Both URLs must resolve before any network I/O happens.
    let source_url = config.url_for(source_env)?.to_string();
    let target_url = config.url_for(target_env)?.to_string();

    output::header(&format!("Schema drift: {source_env} -> {target_env}"));

    let policy = if args.snake_case {
        NamingPolicy::SnakeCase
    } else {
        NamingPolicy::Exact
    };

    output::step(1, 4, &format!("Capturing {source_env} schema"));
    let source = capture(&source_url, source_env).await?.normalized(policy);

    output::step(2, 4, &format!("Capturing {target_env} schema"));
    let target = capture(&target_url, target_env).await?.normalized(policy);

    output::step(3, 4, "Comparing schemas");
    let drift = diff(&source, &target);
    let report = DriftReport::from_drift(&drift);

    if !report.has_drift() {
        output::newline();
        output::success(&format!(
            "No drift: {source_env} and {target_env} schemas match ({} tables, {} columns)",
            source.table_count(),
            source.column_count()
        ));
        return Ok(EXIT_NO_DRIFT);
    }

    present(&report);

    output::step(4, 4, "Generating fix-up SQL");
    let statements = PostgresSqlGenerator.generate(&source, &drift);

    if args.dry_run {
        output::newline();
        output::section("Generated statements (not written):");
        for statement in &statements {
            output::list_item(statement);
        }
    } else {
        let writer = MigrationWriter::new(&args.migrations_dir);
        if let Some(path) = writer.write(&statements, source_env, target_env).await? {
            output::newline();
            output::success(&format!("Wrote {}", path.display()));
            output::newline();
            output::section("Next steps:");
            output::numbered_item(1, &format!("Review {}", path.display()));
            output::numbered_item(
                2,
                &format!("Apply it: schemadrift apply {}", path.display()),
            );
            output::numbered_item(
                3,
                &format!("Re-check: schemadrift {source_env} {target_env}"),
            );
        }
    }

    Ok(report.exit_code())
}

/// Capture one environment's snapshot, releasing the pool afterwards.
async fn capture(url: &str, environment: Environment) -> CliResult<SchemaSnapshot> {
    let pool = PgPool::from_url(url).await?;
    let result = Introspector::new(pool.clone()).capture(environment).await;
    pool.close();
    Ok(result?)
}

/// Print the per-table drift breakdown.
fn present(report: &DriftReport) {
    output::newline();
    kv("Missing tables", &report.missing_tables.len().to_string());
    kv("Extra tables", &report.extra_tables.len().to_string());
    kv(
        "Column differences",
        &report.column_difference_count().to_string(),
    );
    output::newline();

    for table in &report.missing_tables {
        output::warn(&format!("table {table} is missing from the target"));
    }
    for table in &report.extra_tables {
        output::warn(&format!("table {table} only exists in the target"));
    }

    for (table, columns) in &report.tables {
        output::section(table);
        for annotation in &columns.missing {
            output::list_item(&style_added(&format!("+ {}", annotation.describe())));
        }
        for annotation in &columns.extra {
            output::list_item(&style_removed(&format!("- {}", annotation.describe())));
        }
    }
}
