//! `mnemo generate` command - render the merged instruction file

use std::fs;
use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;
use mnemo_core::rules::{RulesStore, DEFAULT_BASE};

/// Execute the generate command
pub fn execute(
    cli: &Cli,
    archive: &Archive,
    base: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let store = RulesStore::new(archive);
    let base_content = base.map(fs::read_to_string).transpose()?;

    match output {
        Some(path) => {
            let written = store.generate(base_content.as_deref(), path)?;
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "ok",
                        "file": written.display().to_string(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Human | OutputFormat::Text => {
                    if !cli.quiet {
                        println!("Wrote {}", written.display());
                    }
                }
            }
        }
        None => {
            let merged = store.render_merged(base_content.as_deref().unwrap_or(DEFAULT_BASE))?;
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "status": "ok",
                        "document": merged,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Human | OutputFormat::Text => print!("{merged}"),
            }
        }
    }

    Ok(())
}
