//! `mnemo projects` and `mnemo sections` commands

use crate::cli::{Cli, OutputFormat};
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;

/// Execute the projects command
pub fn projects(cli: &Cli, archive: &Archive) -> Result<()> {
    let projects = archive.list_projects()?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "count": projects.len(),
                "projects": projects,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if projects.is_empty() {
                if !cli.quiet {
                    println!("No projects");
                }
            } else {
                for project in &projects {
                    println!("{}", project);
                }
            }
        }
    }

    Ok(())
}

/// Execute the sections command
pub fn sections(cli: &Cli, archive: &Archive, project: &str) -> Result<()> {
    let sections = archive.list_sections(project)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "project": project,
                "count": sections.len(),
                "sections": sections,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if sections.is_empty() {
                if !cli.quiet {
                    println!("No sections in '{}'", project);
                }
            } else {
                for section in &sections {
                    println!("{}", section);
                }
            }
        }
    }

    Ok(())
}
