//! Helper functions shared across commands

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use mnemo_core::error::Result;

/// Resolve body content from `--content`, `--file`, or stdin
///
/// Example usage:
/// - `pbpaste | mnemo add -p backend -s errors -t "DB Timeout"`
/// - `mnemo add -p backend -s errors -t "DB Timeout" --file notes.md`
pub fn read_content(content: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (content, file) {
        (Some(content), _) => Ok(content.to_string()),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            // Trim trailing whitespace but preserve internal formatting
            Ok(buf.trim_end().to_string())
        }
    }
}
