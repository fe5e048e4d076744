//! Library surface of the schemadrift CLI, exposed for integration tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
