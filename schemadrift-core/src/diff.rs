//! Schema diffing between two environment snapshots.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::snapshot::{ColumnDescriptor, SchemaSnapshot};

/// Structural differences between a source and a target snapshot.
///
/// Column identity is by exact name only: type, nullability and default
/// changes on a column present in both snapshots are not detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftResult {
    /// Tables present in the source but absent from the target.
    pub missing_tables: Vec<String>,
    /// Tables present in the target but absent from the source.
    pub extra_tables: Vec<String>,
    /// Columns present in the source but absent from the target.
    /// Includes every column of a missing table.
    pub missing_in_target: Vec<ColumnDescriptor>,
    /// Columns present in the target but absent from the source.
    /// Includes every column of an extra table.
    pub extra_in_target: Vec<ColumnDescriptor>,
}

impl DriftResult {
    /// Whether any difference was found.
    pub fn has_drift(&self) -> bool {
        !self.missing_tables.is_empty()
            || !self.extra_tables.is_empty()
            || !self.missing_in_target.is_empty()
            || !self.extra_in_target.is_empty()
    }

    /// Check if there are no differences.
    pub fn is_empty(&self) -> bool {
        !self.has_drift()
    }

    /// One-line human summary of the difference counts.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No drift".to_string();
        }

        let mut parts = Vec::new();
        if !self.missing_tables.is_empty() {
            parts.push(format!("{} missing tables", self.missing_tables.len()));
        }
        if !self.extra_tables.is_empty() {
            parts.push(format!("{} extra tables", self.extra_tables.len()));
        }
        if !self.missing_in_target.is_empty() {
            parts.push(format!("{} missing columns", self.missing_in_target.len()));
        }
        if !self.extra_in_target.is_empty() {
            parts.push(format!("{} extra columns", self.extra_in_target.len()));
        }
        parts.join(", ")
    }
}

/// Compute the drift between two snapshots.
///
/// The result is deterministic: entries follow the snapshots' own table and
/// ordinal order, so repeated runs over the same inputs produce identical
/// results.
pub fn diff(source: &SchemaSnapshot, target: &SchemaSnapshot) -> DriftResult {
    let mut result = DriftResult::default();

    for (name, table) in &source.tables {
        match target.table(name) {
            None => {
                result.missing_tables.push(name.clone());
                result.missing_in_target.extend(table.columns.iter().cloned());
            }
            Some(target_table) => {
                let present: HashSet<&str> = target_table
                    .columns
                    .iter()
                    .map(|c| c.column.as_str())
                    .collect();
                for column in &table.columns {
                    if !present.contains(column.column.as_str()) {
                        result.missing_in_target.push(column.clone());
                    }
                }
            }
        }
    }

    // Symmetric pass with the snapshots swapped.
    for (name, table) in &target.tables {
        match source.table(name) {
            None => {
                result.extra_tables.push(name.clone());
                result.extra_in_target.extend(table.columns.iter().cloned());
            }
            Some(source_table) => {
                let present: HashSet<&str> = source_table
                    .columns
                    .iter()
                    .map(|c| c.column.as_str())
                    .collect();
                for column in &table.columns {
                    if !present.contains(column.column.as_str()) {
                        result.extra_in_target.push(column.clone());
                    }
                }
            }
        }
    }

    result
}
