//! Frontmatter block detection, decoding and line-range replacement.
//!
//! A frontmatter block starts on the first line of a note with `---` and ends
//! at the next `---` line. Line numbers here are 0-indexed: a block occupying
//! lines `[0, end_line)` leaves the body starting at `end_line`.

use crate::error::{Error, Result};
use crate::parser::yaml;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Delimiter line that opens and closes a frontmatter block.
pub const DELIMITER: &str = "---";

/// A decoded frontmatter block.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterBlock {
    /// The decoded key/value mapping, in file order.
    pub mapping: Mapping,
    /// Index of the first body line.
    pub end_line: usize,
}

/// Split text into lines, dropping any `\r` before each `\n`.
///
/// A trailing newline produces a final empty line so that joining with the
/// original line ending reproduces the text exactly.
pub fn text_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Line ending used by the text (`\r\n` if any line uses it).
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

/// Locate and decode the frontmatter block at the top of `lines`.
///
/// Returns `Ok(None)` when the first line is not a delimiter. A block that
/// opens but never closes, or whose YAML does not decode to a mapping, is
/// an [`Error::InvalidFrontmatter`].
pub fn parse_frontmatter(lines: &[&str], path: &Path) -> Result<Option<FrontmatterBlock>> {
    match lines.first() {
        Some(first) if is_delimiter(first) => {}
        _ => return Ok(None),
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|line| is_delimiter(line))
        .map(|i| i + 1)
        .ok_or_else(|| invalid(path, "unterminated frontmatter block"))?;

    let yaml_text = lines[1..close].join("\n");
    let mapping = decode_mapping(&yaml_text, path)?;

    Ok(Some(FrontmatterBlock {
        mapping,
        end_line: close + 1,
    }))
}

/// Convenience wrapper over [`parse_frontmatter`] for raw text.
pub fn parse_frontmatter_text(text: &str, path: &Path) -> Result<Option<FrontmatterBlock>> {
    parse_frontmatter(&text_lines(text), path)
}

fn decode_mapping(yaml_text: &str, path: &Path) -> Result<Mapping> {
    if yaml_text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match yaml::load(yaml_text) {
        Ok(Value::Mapping(mapping)) => Ok(mapping),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(invalid(path, "frontmatter is not a key/value mapping")),
        Err(e) => Err(invalid(path, &e.to_string())),
    }
}

fn invalid(path: &Path, message: &str) -> Error {
    Error::InvalidFrontmatter {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Serialize a mapping into a complete frontmatter block, delimiters included.
pub fn frontmatter_lines(mapping: &Mapping) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(mapping.len() + 2);
    lines.push(DELIMITER.to_string());
    lines.extend(yaml::dump_lines(mapping)?);
    lines.push(DELIMITER.to_string());
    Ok(lines)
}

/// Replace lines `[0, end)` of `text` with `new_lines`, keeping its line ending.
pub fn replace_leading_lines(text: &str, end: usize, new_lines: &[String]) -> String {
    let eol = line_ending(text);
    let lines = text_lines(text);
    let end = end.min(lines.len());

    let mut out: Vec<&str> = new_lines.iter().map(String::as_str).collect();
    out.extend_from_slice(&lines[end..]);
    out.join(eol)
}
