//! Custom rules store and instruction-file merge
//!
//! Rules are named markdown fragments under `custom_rules/`, merged into a
//! generated instruction document beneath a dedicated marker heading.

pub mod blocks;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::archive::{paths, Archive};
use crate::error::{MnemoError, Result};
use blocks::{demote_top_headings, parse_blocks, render_blocks};

/// Marker heading delimiting the merged rules in a generated document
pub const MERGED_RULES_HEADING: &str = "Mnemo Custom Rules";

/// Reserved rule name surfaced first in the merged block
pub const INTEGRATION_RULE: &str = "integration";

/// Instruction template used when the caller supplies no base document and
/// no previous output exists
pub const DEFAULT_BASE: &str = "\
# Instructions

You are an AI assistant working in a project that keeps its long-lived
knowledge in a mnemo archive. This document defines how you work with it.

## Guidelines

* Search the archive before solving a problem that may have been solved before.
* Record solved errors, working fixes, and decisions with a clear title.
* Keep entries concise and factual.
* Always be helpful, accurate, and safe.
";

/// A named rule document
#[derive(Debug, Clone, Serialize)]
pub struct CustomRule {
    pub name: String,
    pub content: String,
    pub file: PathBuf,
}

/// Store of named rule documents
#[derive(Debug)]
pub struct RulesStore {
    dir: PathBuf,
}

impl RulesStore {
    /// Create a store over an opened archive's rules directory
    pub fn new(archive: &Archive) -> Self {
        RulesStore {
            dir: archive.rules_dir(),
        }
    }

    /// Directory holding the rule files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a rule or wholesale-replace an existing one
    pub fn set_rule(&self, name: &str, content: &str) -> Result<PathBuf> {
        let name = paths::normalize_component("rule name", name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!("{name}.md"));
        fs::write(&path, content)?;
        tracing::debug!(rule = %name, file = %path.display(), "rule written");
        Ok(path)
    }

    /// Read all rules, name-sorted
    pub fn get_rules(&self) -> Result<Vec<CustomRule>> {
        let mut rules = Vec::new();
        if !self.dir.is_dir() {
            return Ok(rules);
        }

        for dirent in fs::read_dir(&self.dir)? {
            let path = dirent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let content = fs::read_to_string(&path)?;
            rules.push(CustomRule {
                name: stem.to_string(),
                content,
                file: path,
            });
        }

        rules.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rules)
    }

    /// Merge the stored rules into a base instruction document.
    ///
    /// The merged rules live in a single marker section. When the base
    /// already carries the marker heading, the section is replaced in place
    /// so regeneration is byte-idempotent; otherwise the section is appended
    /// after the base. A base with more than one marker heading is
    /// ambiguous; the policy then is to log and prepend the whole rules
    /// block, never to abort.
    pub fn render_merged(&self, base: &str) -> Result<String> {
        let rules = self.get_rules()?;
        let rules_block = render_rules_block(&rules);

        match merge_into_marker(base, &rules_block) {
            Ok(merged) => Ok(merged),
            Err(MnemoError::RulesParse { reason }) => {
                tracing::warn!(%reason, "rules marker ambiguous, prepending rules block");
                if rules_block.is_empty() {
                    return Ok(base.to_string());
                }
                Ok(format!("# {MERGED_RULES_HEADING}\n\n{rules_block}{base}"))
            }
            Err(err) => Err(err),
        }
    }

    /// Render the merged document and write it to `output`.
    ///
    /// Base resolution: an explicit `base` wins; else an existing `output`
    /// file is reused, so manual edits outside the marker section survive
    /// regeneration; else the built-in template.
    #[tracing::instrument(skip(self, base), fields(output = %output.display()))]
    pub fn generate(&self, base: Option<&str>, output: &Path) -> Result<PathBuf> {
        let base = match base {
            Some(base) => base.to_string(),
            None if output.is_file() => fs::read_to_string(output)?,
            None => DEFAULT_BASE.to_string(),
        };

        let merged = self.render_merged(&base)?;
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output, &merged)?;
        tracing::info!(bytes = merged.len(), "instruction file written");
        Ok(output.to_path_buf())
    }
}

/// Render the inner rules block: the integration rule first, then the rest
/// name-sorted, each under its own level-2 heading. Level-1 headings inside
/// rule content are demoted so a rule cannot terminate the marker section.
fn render_rules_block(rules: &[CustomRule]) -> String {
    let (integration, others): (Vec<_>, Vec<_>) =
        rules.iter().partition(|r| r.name == INTEGRATION_RULE);

    let mut out = String::new();
    for rule in integration.into_iter().chain(others) {
        let content = demote_top_headings(rule.content.trim_end());
        out.push_str(&format!("## {}\n\n{}\n\n", rule.name, content));
    }
    out
}

fn merge_into_marker(base: &str, rules_block: &str) -> Result<String> {
    let mut parsed = parse_blocks(base);
    let is_marker =
        |b: &blocks::Block| b.heading.as_deref() == Some(MERGED_RULES_HEADING);

    let markers = parsed.iter().filter(|b| is_marker(b)).count();
    if markers > 1 {
        return Err(MnemoError::RulesParse {
            reason: format!("marker heading appears {markers} times"),
        });
    }

    // An empty rule set drops the marker section entirely
    if rules_block.is_empty() {
        if markers == 0 {
            return Ok(base.to_string());
        }
        parsed.retain(|b| !is_marker(b));
        return Ok(render_blocks(&parsed));
    }

    let marker_text = format!("# {MERGED_RULES_HEADING}\n\n{rules_block}");
    match parsed.iter_mut().find(|b| is_marker(b)) {
        Some(block) => {
            block.text = marker_text;
            Ok(render_blocks(&parsed))
        }
        None => {
            let mut out = base.trim_end().to_string();
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&marker_text);
            Ok(out)
        }
    }
}
