//! `mnemo add` command - write an entry into the archive

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::commands::helpers::read_content;
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;

/// Execute the add command
pub fn execute(
    cli: &Cli,
    archive: &Archive,
    project: &str,
    section: &str,
    title: &str,
    content: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let content = read_content(content, file)?;
    let location = archive.add(project, section, title, &content)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "project": location.project,
                "section": location.section,
                "file": location.file.display().to_string(),
                "sequence": location.sequence,
                "created_file": location.created_file,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if !cli.quiet {
                println!("Added '{}' to {}", title, location.file.display());
            }
        }
    }

    Ok(())
}
