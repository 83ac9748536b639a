//! `mnemo serve` command - run the REST API server

use crate::cli::Cli;
use crate::server;
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;

/// Execute the serve command
///
/// Blocks until the server shuts down (ctrl-c).
pub fn execute(cli: &Cli, archive: Archive, host: &str, port: u16) -> Result<()> {
    if !cli.quiet {
        eprintln!("mnemo REST server listening on http://{}:{}", host, port);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::run(archive, host, port))
}
