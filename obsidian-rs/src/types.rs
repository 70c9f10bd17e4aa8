//! Shared types.

use serde::{Deserialize, Serialize};

/// Syntax a link was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// `[[target]]`, `[[target|alias]]`, `![[embed]]`.
    Wiki,
    /// `[text](target.md)`.
    Markdown,
}

/// A wikilink, embed or markdown link found in a note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Link {
    /// The link target as written (title, id, or path), without any heading
    /// or block reference. Markdown targets are percent-decoded.
    pub target: String,

    /// Link syntax.
    pub kind: LinkKind,

    /// Optional display alias (wiki `|alias`, or markdown link text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Optional heading reference (the part after #, before ^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,

    /// Optional block reference (the part after #^).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Whether this is an embed (`![[...]]` / `![..](..)`).
    pub embed: bool,

    /// Line number where this link appears (1-indexed).
    pub line: usize,

    /// Start column in the line (0-indexed, bytes).
    pub start_col: usize,

    /// End column in the line (0-indexed, exclusive).
    pub end_col: usize,
}

impl Link {
    /// Returns the full link target including heading/block reference.
    pub fn full_target(&self) -> String {
        let mut result = self.target.clone();
        if let Some(ref heading) = self.heading {
            result.push('#');
            result.push_str(heading);
        }
        if let Some(ref block_id) = self.block_id {
            result.push_str("#^");
            result.push_str(block_id);
        }
        result
    }
}

/// A heading found in a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// The heading text (without the # prefix).
    pub text: String,

    /// The heading level (1-6).
    pub level: u8,

    /// Line number where this heading appears (1-indexed, within the body).
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(target: &str) -> Link {
        Link {
            target: target.to_string(),
            kind: LinkKind::Wiki,
            alias: None,
            heading: None,
            block_id: None,
            embed: false,
            line: 1,
            start_col: 0,
            end_col: 0,
        }
    }

    #[test]
    fn test_full_target() {
        let mut l = link("Note");
        l.heading = Some("Section".to_string());
        assert_eq!(l.full_target(), "Note#Section");

        let mut l = link("Note");
        l.block_id = Some("abc".to_string());
        assert_eq!(l.full_target(), "Note#^abc");
    }
}
