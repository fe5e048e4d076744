//! End-to-end drift scenarios: capture fixtures through diff, generation
//! and file writing.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use schemadrift_core::{
    diff, ColumnDescriptor, DriftReport, Environment, MigrationWriter, PostgresSqlGenerator,
    SchemaSnapshot, TableSchema, EXIT_DRIFT, EXIT_NO_DRIFT,
};

fn column(
    table: &str,
    name: &str,
    data_type: &str,
    nullable: bool,
    default: Option<&str>,
    position: i32,
) -> ColumnDescriptor {
    ColumnDescriptor {
        table: table.to_string(),
        column: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: nullable,
        default_expression: default.map(String::from),
        ordinal_position: position,
    }
}

#[test]
fn missing_column_generates_single_alter() {
    let mut source = SchemaSnapshot::new(Environment::Development);
    let mut users = TableSchema::new("users");
    users.push_column(column("users", "id", "integer", false, None, 1));
    users.push_column(column("users", "email", "text", true, None, 2));
    source.add_table(users);

    let mut target = SchemaSnapshot::new(Environment::Test);
    let mut users = TableSchema::new("users");
    users.push_column(column("users", "id", "integer", false, None, 1));
    target.add_table(users);

    let drift = diff(&source, &target);
    let statements = PostgresSqlGenerator.generate(&source, &drift);

    assert_eq!(
        statements,
        vec!["ALTER TABLE users ADD COLUMN IF NOT EXISTS email TEXT;"]
    );
    assert_eq!(DriftReport::from_drift(&drift).exit_code(), EXIT_DRIFT);
}

#[test]
fn extra_table_generates_single_drop() {
    let source = SchemaSnapshot::new(Environment::Development);

    let mut target = SchemaSnapshot::new(Environment::Test);
    let mut audit = TableSchema::new("audit_logs");
    audit.push_column(column("audit_logs", "id", "integer", false, None, 1));
    target.add_table(audit);

    let drift = diff(&source, &target);
    let statements = PostgresSqlGenerator.generate(&source, &drift);

    assert_eq!(statements, vec!["DROP TABLE IF EXISTS audit_logs;"]);
}

#[test]
fn serial_table_generates_sequence_then_create() {
    let mut source = SchemaSnapshot::new(Environment::Development);
    let mut campaigns = TableSchema::new("campaigns");
    campaigns.push_column(column(
        "campaigns",
        "id",
        "integer",
        false,
        Some("nextval('campaigns_id_seq')"),
        1,
    ));
    campaigns.push_column(column("campaigns", "name", "text", true, None, 2));
    campaigns.primary_key = Some("id".to_string());
    source.add_table(campaigns);

    let target = SchemaSnapshot::new(Environment::Test);

    let drift = diff(&source, &target);
    let statements = PostgresSqlGenerator.generate(&source, &drift);

    assert_eq!(
        statements,
        vec![
            "CREATE SEQUENCE IF NOT EXISTS campaigns_id_seq;",
            "CREATE TABLE IF NOT EXISTS campaigns (id INTEGER NOT NULL DEFAULT nextval('campaigns_id_seq'), name TEXT, PRIMARY KEY (id));",
        ]
    );
}

#[tokio::test]
async fn fixed_clock_filename_and_transaction_wrapping() {
    let dir = tempfile::tempdir().unwrap();
    let writer = MigrationWriter::new(dir.path().join("migrations"));
    let clock = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();

    let statements = vec!["DROP TABLE IF EXISTS audit_logs;".to_string()];
    let path = writer
        .write_at(&statements, Environment::Development, Environment::Test, clock)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "schema-fix-development-to-test-2024-01-15T10-30-00.000Z.sql"
    );

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("BEGIN;"));
    assert!(content.contains("COMMIT;"));
    assert!(content.contains("DROP TABLE IF EXISTS audit_logs;"));
}

#[tokio::test]
async fn no_drift_writes_nothing_and_exits_zero() {
    let mut snapshot = SchemaSnapshot::new(Environment::Development);
    let mut users = TableSchema::new("users");
    users.push_column(column("users", "id", "integer", false, None, 1));
    snapshot.add_table(users);

    let mut other = snapshot.clone();
    other.environment = Environment::Test;

    let drift = diff(&snapshot, &other);
    assert!(drift.is_empty());

    let statements = PostgresSqlGenerator.generate(&snapshot, &drift);
    assert!(statements.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let writer = MigrationWriter::new(dir.path().join("migrations"));
    let path = writer
        .write(&statements, Environment::Development, Environment::Test)
        .await
        .unwrap();
    assert!(path.is_none());
    assert!(!dir.path().join("migrations").exists());

    assert_eq!(DriftReport::from_drift(&drift).exit_code(), EXIT_NO_DRIFT);
}

#[test]
fn antisymmetry_of_diff() {
    let mut a = SchemaSnapshot::new(Environment::Development);
    let mut users = TableSchema::new("users");
    users.push_column(column("users", "id", "integer", false, None, 1));
    users.push_column(column("users", "email", "text", true, None, 2));
    a.add_table(users);

    let mut b = SchemaSnapshot::new(Environment::Test);
    let mut users = TableSchema::new("users");
    users.push_column(column("users", "id", "integer", false, None, 1));
    b.add_table(users);

    let forward = diff(&a, &b);
    let backward = diff(&b, &a);
    assert_eq!(forward.missing_in_target, backward.extra_in_target);
    assert_eq!(forward.extra_in_target, backward.missing_in_target);
}
