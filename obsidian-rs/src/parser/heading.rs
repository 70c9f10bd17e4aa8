//! Heading parsing and title slugs.

use crate::parser::code_block::{find_code_ranges, is_in_code};
use crate::types::Heading;
use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

// ATX-style heading: # Heading, ## Heading, etc.
static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+?)(?:\s+#+)?\s*$").unwrap());

/// Parse all ATX headings outside code blocks.
pub fn parse_headings(content: &str) -> Vec<Heading> {
    let code_ranges = find_code_ranges(content);
    let mut headings = Vec::new();
    let mut offset = 0;

    for (idx, line) in content.split('\n').enumerate() {
        let line_offset = offset;
        offset += line.len() + 1;

        if is_in_code(line_offset, &code_ranges) {
            continue;
        }
        if let Some(cap) = HEADING.captures(line.trim_end_matches('\r')) {
            let level = cap.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let text = cap.get(2).map_or("", |m| m.as_str()).trim().to_string();
            if text.is_empty() {
                continue;
            }
            headings.push(Heading {
                text,
                level,
                line: idx + 1,
            });
        }
    }

    headings
}

/// Text of the first level-1 heading, used as a note's title.
pub fn first_title(content: &str) -> Option<String> {
    parse_headings(content)
        .into_iter()
        .find(|h| h.level == 1)
        .map(|h| h.text)
}

/// Turn a title into an identifier-safe slug.
///
/// Accents are stripped, spaces become `-`, anything other than ASCII
/// letters, digits and `-` is dropped, and the result is lowercased.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = false;

    for c in title.nfkd() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !last_was_hyphen && !slug.is_empty() {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headings() {
        let headings = parse_headings("# Title\n\ntext\n## Sub ##\n");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Title");
        assert_eq!(headings[1].text, "Sub");
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].line, 4);
    }

    #[test]
    fn test_heading_in_code_ignored() {
        let headings = parse_headings("```\n# not a heading\n```\n# Real");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_first_title() {
        assert_eq!(first_title("## Sub\n# Main\n# Other"), Some("Main".to_string()));
        assert_eq!(first_title("no headings"), None);
        assert_eq!(first_title("#tag not heading"), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My New Note"), "my-new-note");
        assert_eq!(slugify("Café  déjà vu!"), "cafe-deja-vu");
        assert_eq!(slugify("  -- Leading & trailing --  "), "leading-trailing");
        assert_eq!(slugify("日本"), "");
    }
}
