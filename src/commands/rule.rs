//! `mnemo rule` commands - manage custom rules

use std::path::Path;

use crate::cli::{Cli, OutputFormat};
use crate::commands::helpers::read_content;
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;
use mnemo_core::rules::RulesStore;

/// Execute the rule add command
pub fn execute_add(
    cli: &Cli,
    archive: &Archive,
    name: &str,
    content: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    let content = read_content(content, file)?;
    let path = RulesStore::new(archive).set_rule(name, &content)?;
    let stored_name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
        .to_string();

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "status": "ok",
                "name": stored_name,
                "file": path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if !cli.quiet {
                println!("Rule '{}' written to {}", stored_name, path.display());
            }
        }
    }

    Ok(())
}

/// Execute the rule list command
pub fn execute_list(cli: &Cli, archive: &Archive) -> Result<()> {
    let rules = RulesStore::new(archive).get_rules()?;

    match cli.format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = rules
                .iter()
                .map(|r| (r.name.clone(), serde_json::Value::String(r.content.clone())))
                .collect();
            let output = serde_json::json!({
                "count": rules.len(),
                "rules": map,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human | OutputFormat::Text => {
            if rules.is_empty() {
                if !cli.quiet {
                    println!("No custom rules");
                }
            } else {
                for rule in &rules {
                    println!("{}", rule.name);
                }
            }
        }
    }

    Ok(())
}
