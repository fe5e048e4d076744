//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use schemadrift_core::Environment;

/// Parse an environment name for clap.
fn parse_environment(s: &str) -> Result<Environment, String> {
    s.parse().map_err(|e: schemadrift_core::DriftError| e.to_string())
}

/// Schema drift detection between PostgreSQL environments
#[derive(Parser, Debug)]
#[command(name = "schemadrift")]
#[command(version)]
#[command(about = "Detect and fix schema drift between PostgreSQL environments", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Bare invocation: `schemadrift <source> <target>` is shorthand for
    /// `schemadrift diff <source> <target>`.
    #[command(flatten)]
    pub diff: DiffArgs,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare two environments and write a fix-up migration file
    Diff(DiffArgs),

    /// Apply a generated migration file to its target environment
    Apply(ApplyArgs),

    /// Show applied migrations for an environment
    Status(StatusArgs),

    /// Display version information
    Version,
}

/// Arguments for the `diff` command
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Source environment (development, test or production)
    #[arg(value_parser = parse_environment)]
    pub source: Option<Environment>,

    /// Target environment to compare against
    #[arg(value_parser = parse_environment)]
    pub target: Option<Environment>,

    /// Directory to write migration files into
    #[arg(long, default_value = crate::config::MIGRATIONS_DIR)]
    pub migrations_dir: PathBuf,

    /// Normalize identifiers to snake_case before comparing
    #[arg(long)]
    pub snake_case: bool,

    /// Print generated statements without writing a file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `apply` command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to a generated schema-fix migration file
    pub file: PathBuf,

    /// Apply to this environment instead of the one in the file name
    #[arg(long, value_parser = parse_environment)]
    pub target: Option<Environment>,
}

/// Arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Environment to inspect
    #[arg(value_parser = parse_environment)]
    pub environment: Environment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_invocation_parses_as_diff() {
        let cli = Cli::parse_from(["schemadrift", "development", "test"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.diff.source, Some(Environment::Development));
        assert_eq!(cli.diff.target, Some(Environment::Test));
    }

    #[test]
    fn test_diff_subcommand_with_flags() {
        let cli = Cli::parse_from([
            "schemadrift",
            "diff",
            "development",
            "test",
            "--snake-case",
            "--dry-run",
        ]);
        match cli.command {
            Some(Command::Diff(args)) => {
                assert!(args.snake_case);
                assert!(args.dry_run);
            }
            other => panic!("expected diff subcommand, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_environment() {
        assert!(Cli::try_parse_from(["schemadrift", "staging", "test"]).is_err());
    }
}
