//! # schemadrift-core
//!
//! Schema drift detection core for multi-environment PostgreSQL setups.
//!
//! This crate provides:
//! - Point-in-time schema snapshots ([`SchemaSnapshot`]) and their diffing
//! - SQL statement generation from a drift result
//! - Transactional migration file writing
//! - Per-table drift reports and exit-code mapping
//! - Migration history records for the `schema_migrations` tracking table
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────┐     ┌───────────────┐
//! │ Snapshot A │────▶│          │────▶│ SQL Generator │──▶ migrations/*.sql
//! │ Snapshot B │────▶│  Differ  │     └───────────────┘
//! └────────────┘     │          │────▶┌───────────────┐
//!                    └──────────┘     │ Drift Report  │──▶ exit code 0 / 1
//!                                     └───────────────┘
//! ```
//!
//! Snapshots are captured elsewhere (see `schemadrift-postgres`); everything
//! in this crate is pure apart from the file writer. Each run is
//! capture → diff → generate → write/present with no state retained between
//! invocations.
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemadrift_core::{diff, DriftReport, MigrationWriter, PostgresSqlGenerator};
//!
//! let drift = diff(&source_snapshot, &target_snapshot);
//! if drift.has_drift() {
//!     let statements = PostgresSqlGenerator.generate(&source_snapshot, &drift);
//!     let writer = MigrationWriter::new("migrations");
//!     let path = writer.write(&statements, source_env, target_env).await?;
//! }
//! let report = DriftReport::from_drift(&drift);
//! std::process::exit(report.exit_code());
//! ```

pub mod diff;
pub mod error;
pub mod file;
pub mod history;
pub mod report;
pub mod snapshot;
pub mod sql;

// Re-exports
pub use diff::{diff, DriftResult};
pub use error::{CoreResult, DriftError};
pub use file::MigrationWriter;
pub use history::{
    compute_checksum, parse_migration_file_name, MigrationRecord, ParsedMigrationName,
    SCHEMA_MIGRATIONS_INIT_SQL,
};
pub use report::{ColumnAnnotation, DriftReport, TableColumns, EXIT_DRIFT, EXIT_NO_DRIFT};
pub use snapshot::{
    to_snake_case, ColumnDescriptor, Environment, ForeignKeyRef, NamingPolicy, SchemaSnapshot,
    TableSchema,
};
pub use sql::{sql_type, PostgresSqlGenerator};
