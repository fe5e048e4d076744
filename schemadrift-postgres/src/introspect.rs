//! Schema introspection via the information_schema catalog views.

use std::collections::HashMap;

use tracing::{debug, info};

use schemadrift_core::{ColumnDescriptor, Environment, ForeignKeyRef, SchemaSnapshot, TableSchema};

use crate::error::PgResult;
use crate::pool::PgPool;

/// Columns of every user table in the public schema, in ordinal order.
/// The drift tool's own tracking table is excluded so it never reports
/// as drift between environments.
const COLUMNS_QUERY: &str = "\
SELECT table_name, column_name, data_type, \
       is_nullable = 'YES' AS is_nullable, \
       column_default, ordinal_position::int4 AS ordinal_position \
FROM information_schema.columns \
WHERE table_schema = 'public' AND table_name <> 'schema_migrations' \
ORDER BY table_name, ordinal_position";

/// Single-column primary keys per table.
const PRIMARY_KEYS_QUERY: &str = "\
SELECT tc.table_name, kcu.column_name \
FROM information_schema.table_constraints tc \
JOIN information_schema.key_column_usage kcu \
  ON tc.constraint_name = kcu.constraint_name \
 AND tc.table_schema = kcu.table_schema \
WHERE tc.constraint_type = 'PRIMARY KEY' AND tc.table_schema = 'public'";

/// Foreign key edges: referencing table/column and referenced table.
const FOREIGN_KEYS_QUERY: &str = "\
SELECT tc.table_name, kcu.column_name, ccu.table_name AS referenced_table \
FROM information_schema.table_constraints tc \
JOIN information_schema.key_column_usage kcu \
  ON tc.constraint_name = kcu.constraint_name \
 AND tc.table_schema = kcu.table_schema \
JOIN information_schema.constraint_column_usage ccu \
  ON tc.constraint_name = ccu.constraint_name \
 AND tc.table_schema = ccu.table_schema \
WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public'";

/// One row of the columns catalog query.
#[derive(Debug, Clone)]
pub struct ColumnRow {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub ordinal_position: i32,
}

/// One row of the primary key catalog query.
#[derive(Debug, Clone)]
pub struct PrimaryKeyRow {
    pub table_name: String,
    pub column_name: String,
}

/// One row of the foreign key catalog query.
#[derive(Debug, Clone)]
pub struct ForeignKeyRow {
    pub table_name: String,
    pub column_name: String,
    pub referenced_table: String,
}

/// Captures schema snapshots from a live database.
pub struct Introspector {
    pool: PgPool,
}

impl Introspector {
    /// Create an introspector over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Capture a snapshot of the public schema.
    ///
    /// Uses one pooled connection for all three catalog queries; the
    /// connection goes back to the pool when this call returns, on
    /// success or failure.
    pub async fn capture(&self, environment: Environment) -> PgResult<SchemaSnapshot> {
        let client = self.pool.get().await?;

        debug!(%environment, "querying information_schema");

        let columns = client
            .query(COLUMNS_QUERY, &[])
            .await?
            .iter()
            .map(|row| ColumnRow {
                table_name: row.get("table_name"),
                column_name: row.get("column_name"),
                data_type: row.get("data_type"),
                is_nullable: row.get("is_nullable"),
                column_default: row.get("column_default"),
                ordinal_position: row.get("ordinal_position"),
            })
            .collect::<Vec<_>>();

        let primary_keys = client
            .query(PRIMARY_KEYS_QUERY, &[])
            .await?
            .iter()
            .map(|row| PrimaryKeyRow {
                table_name: row.get("table_name"),
                column_name: row.get("column_name"),
            })
            .collect::<Vec<_>>();

        let foreign_keys = client
            .query(FOREIGN_KEYS_QUERY, &[])
            .await?
            .iter()
            .map(|row| ForeignKeyRow {
                table_name: row.get("table_name"),
                column_name: row.get("column_name"),
                referenced_table: row.get("referenced_table"),
            })
            .collect::<Vec<_>>();

        let snapshot = assemble_snapshot(environment, columns, primary_keys, foreign_keys);
        info!(
            %environment,
            tables = snapshot.table_count(),
            columns = snapshot.column_count(),
            "captured schema snapshot"
        );
        Ok(snapshot)
    }
}

/// Assemble a snapshot from raw catalog rows.
///
/// Column rows arrive ordered by table then ordinal position, so tables are
/// discovered in catalog order and columns stay in ordinal order. A table
/// with a composite primary key gets `primary_key = None`; only
/// single-column keys participate in generated `PRIMARY KEY (...)` clauses.
pub fn assemble_snapshot(
    environment: Environment,
    columns: Vec<ColumnRow>,
    primary_keys: Vec<PrimaryKeyRow>,
    foreign_keys: Vec<ForeignKeyRow>,
) -> SchemaSnapshot {
    let mut snapshot = SchemaSnapshot::new(environment);

    for row in columns {
        let descriptor = ColumnDescriptor {
            table: row.table_name,
            column: row.column_name,
            data_type: row.data_type,
            is_nullable: row.is_nullable,
            default_expression: row.column_default,
            ordinal_position: row.ordinal_position,
        };
        match snapshot.tables.get_mut(&descriptor.table) {
            Some(table) => table.push_column(descriptor),
            None => {
                let mut table = TableSchema::new(descriptor.table.clone());
                table.push_column(descriptor);
                snapshot.add_table(table);
            }
        }
    }

    let mut key_columns: HashMap<String, Vec<String>> = HashMap::new();
    for row in primary_keys {
        key_columns
            .entry(row.table_name)
            .or_default()
            .push(row.column_name);
    }
    for (table_name, mut columns) in key_columns {
        if let Some(table) = snapshot.tables.get_mut(&table_name) {
            // Composite keys are not representable; leave them unset.
            table.primary_key = if columns.len() == 1 {
                columns.pop()
            } else {
                None
            };
        }
    }

    for row in foreign_keys {
        if let Some(table) = snapshot.tables.get_mut(&row.table_name) {
            table.foreign_keys.push(ForeignKeyRef {
                column: row.column_name,
                referenced_table: row.referenced_table,
            });
        }
    }

    snapshot
}
