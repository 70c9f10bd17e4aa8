//! Wikilink, embed and markdown-link parsing.

use crate::parser::code_block::{find_code_ranges, is_in_code};
use crate::types::{Link, LinkKind};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// (!)?                     - Optional ! for embeds (group 1)
// \[\[                     - Opening [[
// ([^\]\|#]+)              - Target (group 2)
// (?:#\^([a-zA-Z0-9_-]+))? - Block reference (group 3)
// (?:#([^\]\|]+))?         - Heading reference (group 4)
// (?:\|([^\]]+))?          - Alias (group 5)
// \]\]                     - Closing ]]
static WIKILINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[\[([^\]\|#]+)(?:#\^([a-zA-Z0-9_-]+))?(?:#([^\]\|]+))?(?:\|([^\]]+))?\]\]")
        .unwrap()
});

// (!)? [text] (target) - target may be wrapped in <...> when it holds spaces.
static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(!?)\[([^\]\n]*)\]\((?:<([^>\n]+)>|([^)\s]+))\)").unwrap()
});

/// Parse all wikilinks (not embeds) from content.
pub fn parse_links(content: &str) -> Vec<Link> {
    parse_all_links(content)
        .into_iter()
        .filter(|link| !link.embed)
        .collect()
}

/// Parse all wikilinks, embeds and markdown note links, in document order.
pub fn parse_all_links(content: &str) -> Vec<Link> {
    let code_ranges = find_code_ranges(content);
    let mut links = Vec::new();
    let mut wiki_spans = Vec::new();

    for cap in WIKILINK.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        if is_in_code(full.start(), &code_ranges) {
            continue;
        }
        wiki_spans.push((full.start(), full.end()));

        let (line, start_col, end_col) = position(content, full.start(), full.end());
        links.push(Link {
            target: cap.get(2).map(|m| m.as_str().trim()).unwrap_or("").to_string(),
            kind: LinkKind::Wiki,
            alias: cap.get(5).map(|m| m.as_str().to_string()),
            heading: cap.get(4).map(|m| m.as_str().to_string()),
            block_id: cap.get(3).map(|m| m.as_str().to_string()),
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            line,
            start_col,
            end_col,
        });
    }

    for cap in MARKDOWN_LINK.captures_iter(content) {
        let Some(full) = cap.get(0) else { continue };
        let start = full.start();
        if is_in_code(start, &code_ranges)
            || wiki_spans.iter().any(|(s, e)| start < *e && full.end() > *s)
        {
            continue;
        }

        let raw = cap
            .get(3)
            .or_else(|| cap.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        let Some((target, heading)) = markdown_note_target(raw) else {
            continue;
        };

        let text = cap.get(2).map(|m| m.as_str()).unwrap_or("");
        let (line, start_col, end_col) = position(content, start, full.end());
        links.push(Link {
            target,
            kind: LinkKind::Markdown,
            alias: (!text.is_empty()).then(|| text.to_string()),
            heading,
            block_id: None,
            embed: cap.get(1).is_some_and(|m| !m.as_str().is_empty()),
            line,
            start_col,
            end_col,
        });
    }

    links.sort_by_key(|l| (l.line, l.start_col));
    links
}

/// Decode a markdown link destination that points at a note.
///
/// URLs and non-markdown files are skipped.
fn markdown_note_target(raw: &str) -> Option<(String, Option<String>)> {
    if raw.contains("://") || raw.starts_with("mailto:") || raw.starts_with('#') {
        return None;
    }
    let (path, heading) = match raw.split_once('#') {
        Some((path, heading)) => (path, Some(heading)),
        None => (raw, None),
    };
    let decoded = urlencoding::decode(path).unwrap_or(Cow::Borrowed(path));
    if !decoded.to_lowercase().ends_with(".md") {
        return None;
    }
    let heading = heading
        .map(|h| urlencoding::decode(h).unwrap_or(Cow::Borrowed(h)).into_owned())
        .filter(|h| !h.is_empty());
    Some((decoded.into_owned(), heading))
}

/// Line (1-indexed) and byte columns of a match.
fn position(content: &str, start: usize, end: usize) -> (usize, usize, usize) {
    let line = content[..start].matches('\n').count() + 1;
    let line_start = content[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, start - line_start, end - line_start)
}

/// Format a link back into its source syntax.
pub fn format_link(link: &Link) -> String {
    match link.kind {
        LinkKind::Wiki => format_wikilink(link),
        LinkKind::Markdown => format_markdown_link(link),
    }
}

/// Format a wikilink as a string.
pub fn format_wikilink(link: &Link) -> String {
    let mut result = String::new();
    if link.embed {
        result.push('!');
    }
    result.push_str("[[");
    result.push_str(&link.full_target());
    if let Some(ref alias) = link.alias {
        result.push('|');
        result.push_str(alias);
    }
    result.push_str("]]");
    result
}

fn format_markdown_link(link: &Link) -> String {
    let mut destination = link.target.replace(' ', "%20");
    if let Some(ref heading) = link.heading {
        destination.push('#');
        destination.push_str(&heading.replace(' ', "%20"));
    }
    format!(
        "{}[{}]({})",
        if link.embed { "!" } else { "" },
        link.alias.as_deref().unwrap_or(""),
        destination
    )
}
