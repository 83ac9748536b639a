//! `mnemo search` command - ranked archive search
//!
//! - `mnemo search <query...>` - token overlap plus exact-phrase bonus
//! - `--project` filter, `--limit` cap
//! - `--format text` renders the banner layout used for agent context

use crate::cli::{Cli, OutputFormat};
use mnemo_core::archive::Archive;
use mnemo_core::error::Result;
use mnemo_core::search::{ScoredResult, SearchEngine};

/// Execute the search command
pub fn execute(
    cli: &Cli,
    archive: &Archive,
    query: &str,
    project: Option<&str>,
    limit: Option<usize>,
) -> Result<()> {
    let mut results = SearchEngine::new(archive).search(query, project)?;
    if let Some(limit) = limit {
        results.truncate(limit);
    }

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "query": query,
                "count": results.len(),
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if results.is_empty() {
                if !cli.quiet {
                    println!("No results found for '{}'", query);
                }
            } else {
                for result in &results {
                    println!(
                        "{}/{} [{}%] {}",
                        result.project, result.section, result.match_quality, result.title
                    );
                    if cli.verbose {
                        println!("    {}", result.snippet);
                    }
                }
            }
        }
        OutputFormat::Text => {
            print!("{}", text_banner(query, &results));
        }
    }

    Ok(())
}

/// Render results as the banner-style plain text for agent context injection
pub fn text_banner(query: &str, results: &[ScoredResult]) -> String {
    if results.is_empty() {
        return format!(
            "No archives found for query: '{query}'. The information you're looking for is not in the archives.\n"
        );
    }

    let mut out = format!("ARCHIVES SEARCH RESULTS FOR: '{query}'\n");
    out.push_str(&"=".repeat(80));
    out.push_str("\n\n");
    out.push_str(&format!(
        "Found {} relevant entries in the archives:\n\n",
        results.len()
    ));

    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("RESULT {}: {}\n", i + 1, result.title));
        out.push_str(&"-".repeat(80));
        out.push('\n');
        out.push_str(&format!("Project: {}\n", result.project));
        out.push_str(&format!("Location: {}\n\n", result.file.display()));
        out.push_str(&format!("CONTENT PREVIEW:\n{}\n\n", result.snippet));
    }

    out
}
