//! `mnemo init` command - create the data directory
//!
//! Idempotent: safe to run multiple times, keeps an existing config.json.

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path) -> Result<()> {
    let archive = Archive::init(root)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "root": archive.root().display().to_string(),
                "message": "Archive initialized"
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if !cli.quiet {
                println!("Initialized mnemo archive at {}", archive.root().display());
                println!();
                println!("Run `mnemo --help` for usage information.");
            }
        }
    }

    Ok(())
}
