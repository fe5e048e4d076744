//! `schemadrift version` command - Display version information.

use crate::error::CliResult;
use crate::output::{self, kv};

/// Package version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command
pub async fn run() -> CliResult<i32> {
    output::header("schemadrift");

    kv("Version", VERSION);

    #[cfg(debug_assertions)]
    let build_mode = "debug";
    #[cfg(not(debug_assertions))]
    let build_mode = "release";

    kv("Build", build_mode);

    output::newline();
    output::section("Components");
    kv("schemadrift-core", VERSION);
    kv("schemadrift-postgres", VERSION);

    output::newline();
    output::dim("https://github.com/schemadrift/schemadrift");

    Ok(0)
}
