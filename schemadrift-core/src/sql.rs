//! DDL generation from a drift result.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::diff::DriftResult;
use crate::snapshot::{ColumnDescriptor, SchemaSnapshot, TableSchema};

/// SQL statement generator for PostgreSQL.
///
/// Statement order within the output: sequence creations, `CREATE TABLE`
/// statements topologically sorted by foreign-key dependency, column
/// additions, column drops, table drops. Output is fully determined by the
/// inputs, so repeated calls produce identical lists.
pub struct PostgresSqlGenerator;

impl PostgresSqlGenerator {
    /// Generate the ordered statement list for a drift result.
    ///
    /// An empty drift yields an empty list, never an error.
    pub fn generate(&self, source: &SchemaSnapshot, drift: &DriftResult) -> Vec<String> {
        let mut statements = Vec::new();

        let created: HashSet<&str> = drift.missing_tables.iter().map(String::as_str).collect();
        let dropped: HashSet<&str> = drift.extra_tables.iter().map(String::as_str).collect();

        for name in topological_create_order(source, &drift.missing_tables) {
            let Some(table) = source.table(&name) else {
                continue;
            };
            for column in &table.columns {
                if let Some(sequence) = column
                    .default_expression
                    .as_deref()
                    .and_then(sequence_name)
                {
                    statements.push(format!("CREATE SEQUENCE IF NOT EXISTS {sequence};"));
                }
            }
            statements.push(self.create_table(table));
        }

        // Columns of freshly created tables are covered by CREATE TABLE.
        for column in &drift.missing_in_target {
            if !created.contains(column.table.as_str()) {
                statements.push(self.add_column(column));
            }
        }

        // Column drops precede table drops; columns of dropped tables go
        // with their table.
        for column in &drift.extra_in_target {
            if !dropped.contains(column.table.as_str()) {
                statements.push(format!(
                    "ALTER TABLE {} DROP COLUMN IF EXISTS {};",
                    column.table, column.column
                ));
            }
        }

        for name in &drift.extra_tables {
            statements.push(format!("DROP TABLE IF EXISTS {name};"));
        }

        statements
    }

    /// Generate a single-statement `CREATE TABLE`.
    fn create_table(&self, table: &TableSchema) -> String {
        let mut parts: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c))
            .collect();

        if let Some(pk) = &table.primary_key {
            parts.push(format!("PRIMARY KEY ({pk})"));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            table.name,
            parts.join(", ")
        )
    }

    /// Generate an `ALTER TABLE ... ADD COLUMN` statement.
    fn add_column(&self, column: &ColumnDescriptor) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {};",
            column.table,
            self.column_definition(column)
        )
    }

    /// Render `name TYPE [NOT NULL] [DEFAULT expr]`.
    fn column_definition(&self, column: &ColumnDescriptor) -> String {
        let mut parts = vec![column.column.clone(), sql_type(&column.data_type)];

        if !column.is_nullable {
            parts.push("NOT NULL".to_string());
        }

        if let Some(default) = &column.default_expression {
            parts.push(format!("DEFAULT {default}"));
        }

        parts.join(" ")
    }
}

/// Map an information_schema data type to its DDL spelling.
pub fn sql_type(data_type: &str) -> String {
    match data_type {
        "integer" | "int4" => "INTEGER",
        "smallint" | "int2" => "SMALLINT",
        "bigint" | "int8" => "BIGINT",
        "character varying" | "varchar" => "VARCHAR",
        "character" | "bpchar" => "CHAR",
        "text" => "TEXT",
        "boolean" | "bool" => "BOOLEAN",
        "numeric" | "decimal" => "NUMERIC",
        "real" | "float4" => "REAL",
        "double precision" | "float8" => "DOUBLE PRECISION",
        "date" => "DATE",
        "time without time zone" | "time" => "TIME",
        "time with time zone" | "timetz" => "TIME WITH TIME ZONE",
        "timestamp without time zone" | "timestamp" => "TIMESTAMP",
        "timestamp with time zone" | "timestamptz" => "TIMESTAMP WITH TIME ZONE",
        "json" => "JSON",
        "jsonb" => "JSONB",
        "bytea" => "BYTEA",
        "uuid" => "UUID",
        other => return other.to_uppercase(),
    }
    .to_string()
}

/// Extract the sequence name from a `nextval('...')` default expression.
fn sequence_name(default: &str) -> Option<&str> {
    let start = default.find("nextval('")? + "nextval('".len();
    let end = default[start..].find('\'')? + start;
    let name = &default[start..end];
    if name.is_empty() { None } else { Some(name) }
}

/// Order tables so that foreign-key targets are created before the tables
/// that reference them (Kahn's algorithm). Only edges between tables that
/// are both being created matter; a dependency cycle falls back to
/// discovery order for the remaining tables, with a warning.
fn topological_create_order(source: &SchemaSnapshot, missing: &[String]) -> Vec<String> {
    let set: HashSet<&str> = missing.iter().map(String::as_str).collect();

    let mut indegree: HashMap<&str, usize> = missing.iter().map(|n| (n.as_str(), 0)).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for name in missing {
        let Some(table) = source.table(name) else {
            continue;
        };
        for fk in &table.foreign_keys {
            let referenced = fk.referenced_table.as_str();
            if referenced != name && set.contains(referenced) {
                if let Some(degree) = indegree.get_mut(name.as_str()) {
                    *degree += 1;
                }
                dependents.entry(referenced).or_default().push(name);
            }
        }
    }

    let mut queue: VecDeque<&str> = missing
        .iter()
        .map(String::as_str)
        .filter(|n| indegree[n] == 0)
        .collect();
    let mut order = Vec::with_capacity(missing.len());

    while let Some(name) = queue.pop_front() {
        order.push(name.to_string());
        if let Some(deps) = dependents.get(name) {
            for dep in deps {
                if let Some(degree) = indegree.get_mut(dep) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dep);
                    }
                }
            }
        }
    }

    if order.len() < missing.len() {
        tracing::warn!(
            "foreign-key cycle among created tables; falling back to discovery order"
        );
        let placed: HashSet<String> = order.iter().cloned().collect();
        order.extend(
            missing
                .iter()
                .filter(|name| !placed.contains(*name))
                .cloned(),
        );
    }

    order
}
