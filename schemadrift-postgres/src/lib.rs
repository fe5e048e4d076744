//! # schemadrift-postgres
//!
//! PostgreSQL backend for schemadrift: connection configuration, pooling
//! and information_schema introspection.
//!
//! The [`Introspector`] turns one environment's live catalog into a
//! [`SchemaSnapshot`](schemadrift_core::SchemaSnapshot) that the core crate
//! can diff. No DDL is ever executed here; introspection is read-only.

pub mod config;
pub mod error;
pub mod introspect;
pub mod pool;

// Re-exports
pub use config::PgConfig;
pub use error::{PgError, PgResult};
pub use introspect::{assemble_snapshot, ColumnRow, ForeignKeyRow, Introspector, PrimaryKeyRow};
pub use pool::PgPool;
