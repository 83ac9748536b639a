//! Path layout and identifier normalization for the archive tree

use std::path::{Path, PathBuf};

use crate::error::{MnemoError, Result};

/// Default data directory name (hidden)
pub const DEFAULT_DATA_DIR: &str = ".mnemo";

/// Archive subdirectories
pub const ARCHIVES_DIR: &str = "archives";
pub const RULES_DIR: &str = "custom_rules";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.json";

/// Walk up from `start` looking for an existing data directory
pub fn discover_data_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(DEFAULT_DATA_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => return None,
        }
    }
}

/// Normalize a project or section name into a lowercase filesystem-safe token.
///
/// Anything resembling path traversal is rejected before slugifying; the slug
/// never contains underscores, which keeps section file names unambiguous.
pub fn normalize_component(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MnemoError::EmptyField { field });
    }
    if trimmed.contains("..") || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(MnemoError::InvalidName {
            field,
            value: value.to_string(),
        });
    }

    let normalized = slug::slugify(trimmed);
    if normalized.is_empty() {
        return Err(MnemoError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(normalized)
}

/// File name of the section file at the given sequence index
pub fn section_file_name(section: &str, seq: u64) -> String {
    format!("{}_{}.md", section, seq)
}

/// Extract the sequence index from a section file name, if it belongs to
/// the given section
pub fn parse_sequence(file_name: &str, section: &str) -> Option<u64> {
    file_name
        .strip_prefix(section)?
        .strip_prefix('_')?
        .strip_suffix(".md")?
        .parse()
        .ok()
}
