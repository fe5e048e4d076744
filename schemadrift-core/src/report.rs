//! Drift report assembly.
//!
//! Groups a raw [`DriftResult`] per table so a presenter only has to walk
//! the structure and print it. Rendering and colors live with the caller.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::diff::DriftResult;
use crate::snapshot::ColumnDescriptor;

/// Process exit code for a run that found no drift.
pub const EXIT_NO_DRIFT: i32 = 0;
/// Process exit code for a run that found drift (or failed).
pub const EXIT_DRIFT: i32 = 1;

/// One column entry in a report, with its display annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAnnotation {
    /// Column name.
    pub column: String,
    /// Catalog data type.
    pub data_type: String,
    /// Whether the column accepts NULL.
    pub is_nullable: bool,
}

impl ColumnAnnotation {
    fn from_descriptor(descriptor: &ColumnDescriptor) -> Self {
        Self {
            column: descriptor.column.clone(),
            data_type: descriptor.data_type.clone(),
            is_nullable: descriptor.is_nullable,
        }
    }

    /// Render as `name type [nullable|not null]`.
    pub fn describe(&self) -> String {
        let nullability = if self.is_nullable { "nullable" } else { "not null" };
        format!("{} {} {}", self.column, self.data_type, nullability)
    }
}

/// Column differences for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumns {
    /// Columns missing from the target.
    pub missing: Vec<ColumnAnnotation>,
    /// Columns only present in the target.
    pub extra: Vec<ColumnAnnotation>,
}

/// A per-table view of a drift result, ready for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Tables missing from the target entirely.
    pub missing_tables: Vec<String>,
    /// Tables only present in the target.
    pub extra_tables: Vec<String>,
    /// Column differences, grouped by table, in discovery order.
    pub tables: IndexMap<String, TableColumns>,
}

impl DriftReport {
    /// Group a drift result by table.
    pub fn from_drift(drift: &DriftResult) -> Self {
        let mut report = DriftReport {
            missing_tables: drift.missing_tables.clone(),
            extra_tables: drift.extra_tables.clone(),
            tables: IndexMap::new(),
        };

        for column in &drift.missing_in_target {
            report
                .tables
                .entry(column.table.clone())
                .or_default()
                .missing
                .push(ColumnAnnotation::from_descriptor(column));
        }
        for column in &drift.extra_in_target {
            report
                .tables
                .entry(column.table.clone())
                .or_default()
                .extra
                .push(ColumnAnnotation::from_descriptor(column));
        }

        report
    }

    /// Whether the report contains any difference.
    pub fn has_drift(&self) -> bool {
        !self.missing_tables.is_empty()
            || !self.extra_tables.is_empty()
            || !self.tables.is_empty()
    }

    /// The process exit code this report maps to.
    pub fn exit_code(&self) -> i32 {
        if self.has_drift() { EXIT_DRIFT } else { EXIT_NO_DRIFT }
    }

    /// Total number of differing columns across all tables.
    pub fn column_difference_count(&self) -> usize {
        self.tables
            .values()
            .map(|t| t.missing.len() + t.extra.len())
            .sum()
    }
}
