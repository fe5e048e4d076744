//! Command implementations.

pub mod apply;
pub mod diff;
pub mod status;
pub mod version;
