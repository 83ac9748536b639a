//! Archive configuration for mnemo
//!
//! Configuration is stored in `.mnemo/config.json`. A missing file means all
//! defaults. The config is loaded once when an archive handle is opened and
//! never mutated afterwards.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MnemoError, Result};

/// Words excluded from tokenization by default
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Archive configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Archive data root override (optional; relative paths resolve against
    /// the `.mnemo` directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Maximum lines per section file before rolling to the next sequence
    #[serde(default = "default_max_file_lines")]
    pub max_file_lines: usize,

    /// Minimum token length kept by the tokenizer
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,

    /// Words excluded from tokenization
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Project directories created empty on archive initialization
    #[serde(default = "default_projects")]
    pub default_projects: Vec<String>,
}

impl ArchiveConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ArchiveConfig =
            serde_json::from_str(&content).map_err(|e| MnemoError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut content = serde_json::to_string_pretty(self)?;
        content.push('\n');
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            data_dir: None,
            max_file_lines: default_max_file_lines(),
            min_token_len: default_min_token_len(),
            stop_words: default_stop_words(),
            default_projects: default_projects(),
        }
    }
}

fn default_max_file_lines() -> usize {
    500
}

fn default_min_token_len() -> usize {
    2
}

fn default_stop_words() -> Vec<String> {
    DEFAULT_STOP_WORDS.iter().map(|s| s.to_string()).collect()
}

fn default_projects() -> Vec<String> {
    vec![
        "frontend".to_string(),
        "backend".to_string(),
        "shared".to_string(),
    ]
}
