//! schemadrift - Detect and fix schema drift between PostgreSQL environments.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schemadrift_cli::cli::{Cli, Command};
use schemadrift_cli::commands;
use schemadrift_cli::config::Config;
use schemadrift_cli::error::CliResult;
use schemadrift_cli::output;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output::newline();
            output::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

async fn run() -> CliResult<i32> {
    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Some(Command::Diff(args)) => commands::diff::run(args, &config).await,
        Some(Command::Apply(args)) => commands::apply::run(args, &config).await,
        Some(Command::Status(args)) => commands::status::run(args, &config).await,
        Some(Command::Version) => commands::version::run().await,
        // Bare `schemadrift <source> <target>`
        None => commands::diff::run(cli.diff, &config).await,
    }
}
