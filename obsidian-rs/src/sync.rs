//! Frontmatter synchronization on save.
//!
//! A sync compares the lines currently at the top of a note against the
//! canonical frontmatter for it and, when they differ, produces a single
//! replacement of lines `[0, end)`.

use crate::client::Client;
use crate::error::Result;
use crate::note::Note;
use crate::parser::{frontmatter_lines, replace_leading_lines, text_lines};
use serde::Serialize;
use serde_yaml::Mapping;
use std::path::Path;
use std::sync::Arc;

/// Custom frontmatter for a note, replacing the built-in default.
pub type FrontmatterGenerator = Arc<dyn Fn(&Note) -> Mapping + Send + Sync>;

/// Extra save policy; returning `false` suppresses frontmatter writes.
pub type SavePredicate = Arc<dyn Fn(&Note) -> bool + Send + Sync>;

/// Replacement of lines `[start, end)` with `lines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontmatterEdit {
    pub start: usize,
    pub end: usize,
    pub lines: Vec<String>,
}

impl FrontmatterEdit {
    /// Apply the edit to full note text in one step.
    pub fn apply(&self, text: &str) -> String {
        replace_leading_lines(text, self.end, &self.lines)
    }
}

/// Result of planning a sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Policy forbids writing frontmatter for this note.
    Skipped,
    /// The existing lines already match.
    Unchanged,
    Updated(FrontmatterEdit),
}

impl SyncOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, SyncOutcome::Updated(_))
    }
}

/// Plan a sync for `note`, whose source text split into lines is `lines`.
pub fn plan(client: &Client, note: &Note, lines: &[&str]) -> Result<SyncOutcome> {
    if !client.should_save_frontmatter(note) {
        tracing::debug!(path = %note.path.display(), "frontmatter sync skipped by policy");
        return Ok(SyncOutcome::Skipped);
    }

    let mapping = client.frontmatter_for(note);
    let new_lines = frontmatter_lines(&mapping)?;
    let end = note.frontmatter_end_line.unwrap_or(0).min(lines.len());

    // Exact line comparison, not semantic.
    let unchanged = lines[..end].len() == new_lines.len()
        && lines[..end].iter().zip(&new_lines).all(|(old, new)| *old == new.as_str());
    if unchanged {
        return Ok(SyncOutcome::Unchanged);
    }

    Ok(SyncOutcome::Updated(FrontmatterEdit {
        start: 0,
        end,
        lines: new_lines,
    }))
}

/// Parse `text` and plan a sync for it.
///
/// Malformed frontmatter is returned as [`crate::Error::InvalidFrontmatter`]
/// so callers can warn and leave the text untouched.
pub fn plan_text(client: &Client, path: &Path, text: &str) -> Result<SyncOutcome> {
    let note = Note::from_text(path, text)?;
    plan(client, &note, &text_lines(text))
}
