//! Tokenized search over archive section files
//!
//! A full scan recomputed on every query: no persisted index, so reads always
//! see the latest on-disk state.

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::archive::{entry, Archive};
use crate::error::{MnemoError, Result};
use crate::text::Tokenizer;

/// Fixed score increment for an exact phrase match
pub const PHRASE_BONUS: u32 = 10;

/// Context window, in bytes before snapping, around the first match
const SNIPPET_CONTEXT: usize = 60;

/// One ranked search hit
#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub project: String,
    pub section: String,
    pub title: String,
    pub snippet: String,
    pub score: u32,
    /// Display percentage derived from token overlap and phrase match
    pub match_quality: u8,
    pub file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<NaiveDateTime>,
}

/// Tokenized search engine scanning section files fresh per query
pub struct SearchEngine<'a> {
    archive: &'a Archive,
    tokenizer: Tokenizer,
}

impl<'a> SearchEngine<'a> {
    /// Create a search engine over an opened archive
    pub fn new(archive: &'a Archive) -> Self {
        SearchEngine {
            archive,
            tokenizer: Tokenizer::new(archive.config()),
        }
    }

    /// Search the archive for a free-text query.
    ///
    /// Candidates are scored by distinct query tokens present plus a fixed
    /// bonus when the exact query appears case-insensitively in the raw
    /// text. Candidates with no token overlap and no phrase hit are dropped.
    /// Unreadable section files are skipped and logged, never fatal.
    #[tracing::instrument(skip(self), fields(query = %query, project = ?project_filter))]
    pub fn search(
        &self,
        query: &str,
        project_filter: Option<&str>,
    ) -> Result<Vec<ScoredResult>> {
        let phrase = query.trim().to_lowercase();
        if phrase.is_empty() {
            return Err(MnemoError::EmptyField { field: "query" });
        }
        let query_tokens: HashSet<String> = self.tokenizer.token_set(query);

        let mut results = Vec::new();
        for file in self.archive.section_files(project_filter)? {
            let content = match fs::read_to_string(&file.path) {
                Ok(content) => content,
                Err(err) => {
                    tracing::warn!(
                        file = %file.path.display(),
                        error = %err,
                        "skipping unreadable section file"
                    );
                    continue;
                }
            };

            for parsed in entry::parse_entries(&content) {
                let raw = format!("{}\n{}", parsed.title, parsed.body);
                let raw_lower = raw.to_lowercase();

                let candidate_tokens = self.tokenizer.token_set(&raw);
                let token_score = query_tokens
                    .iter()
                    .filter(|t| candidate_tokens.contains(*t))
                    .count() as u32;
                let phrase_hit = raw_lower.contains(&phrase);

                if token_score == 0 && !phrase_hit {
                    continue;
                }

                let score = token_score + if phrase_hit { PHRASE_BONUS } else { 0 };
                results.push(ScoredResult {
                    project: file.project.clone(),
                    section: file.section.clone(),
                    snippet: extract_snippet(&parsed.body, &phrase, &query_tokens),
                    title: parsed.title,
                    score,
                    match_quality: match_quality(token_score, query_tokens.len(), phrase_hit),
                    file: file.path.clone(),
                    added: parsed.added,
                });
            }
        }

        // Rank by score, newest first among ties, then a stable name order
        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| b.added.cmp(&a.added))
                .then_with(|| {
                    (&a.project, &a.section, &a.title).cmp(&(&b.project, &b.section, &b.title))
                })
        });

        tracing::debug!(hits = results.len(), "search complete");
        Ok(results)
    }
}

/// Display percentage: 100 on a phrase hit, else the share of query tokens
/// matched (floor of 1 for any surviving candidate)
fn match_quality(token_score: u32, query_token_count: usize, phrase_hit: bool) -> u8 {
    if phrase_hit || query_token_count == 0 {
        return 100;
    }
    let pct = (token_score as f64 / query_token_count as f64 * 100.0).round() as u8;
    pct.max(1)
}

/// Extract a single-line context window around the first match in the body.
///
/// Prefers the exact phrase position, falls back to the first query token,
/// then to the body head. Window bounds are snapped to char boundaries.
fn extract_snippet(body: &str, phrase: &str, query_tokens: &HashSet<String>) -> String {
    let body_lower = body.to_lowercase();

    let hit = body_lower
        .find(phrase)
        .map(|pos| (pos, phrase.len()))
        .or_else(|| {
            query_tokens
                .iter()
                .filter_map(|t| body_lower.find(t.as_str()).map(|pos| (pos, t.len())))
                .min_by_key(|(pos, _)| *pos)
        })
        .unwrap_or((0, 0));

    // Lowercasing can shift byte offsets for a few scripts; clamping and
    // snapping keeps the slice valid either way.
    let (pos, len) = hit;
    let start = snap_left(body, pos.saturating_sub(SNIPPET_CONTEXT).min(body.len()));
    let end = snap_right(body, (pos + len + SNIPPET_CONTEXT).min(body.len()));

    let window = body[start..end].replace('\n', " ");
    let mut snippet = window.trim().to_string();
    if start > 0 {
        snippet = format!("...{}", snippet);
    }
    if end < body.len() {
        snippet = format!("{}...", snippet);
    }
    snippet
}

fn snap_left(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn snap_right(s: &str, mut i: usize) -> usize {
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
