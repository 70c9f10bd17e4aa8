//! Note representation: identifier, frontmatter fields and body.

use crate::error::{Error, Result};
use crate::parser::{self, first_title, parse_all_links, parse_frontmatter, text_lines};
use crate::types::Link;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

pub const ID_KEY: &str = "id";
pub const ALIASES_KEY: &str = "aliases";
pub const TAGS_KEY: &str = "tags";

/// A parsed note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Note {
    /// Path as given when parsed; vault-relative for notes loaded from a vault.
    pub path: PathBuf,

    /// Frontmatter `id`, or the file stem when absent.
    pub id: String,

    /// First level-1 heading, falling back to the first alias.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub aliases: Vec<String>,

    /// Tags without the leading `#`.
    pub tags: Vec<String>,

    /// All frontmatter fields in file order (empty when there is no block).
    pub frontmatter: Mapping,

    pub has_frontmatter: bool,

    /// Index of the first body line, or `None` without frontmatter.
    pub frontmatter_end_line: Option<usize>,

    #[serde(skip)]
    pub body: String,
}

impl Note {
    /// Create an empty note with the given identifier.
    pub fn new(path: impl Into<PathBuf>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: id.into(),
            title: None,
            aliases: Vec::new(),
            tags: Vec::new(),
            frontmatter: Mapping::new(),
            has_frontmatter: false,
            frontmatter_end_line: None,
            body: String::new(),
        }
    }

    /// Parse a note from its full text.
    ///
    /// Fails with [`Error::InvalidFrontmatter`] when a leading block exists
    /// but cannot be decoded; a missing block is not an error.
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Result<Self> {
        let path = path.into();
        let lines = text_lines(text);
        let (frontmatter, end_line) = match parse_frontmatter(&lines, &path)? {
            Some(block) => (block.mapping, Some(block.end_line)),
            None => (Mapping::new(), None),
        };
        let body_start = end_line.unwrap_or(0).min(lines.len());
        let body = lines[body_start..].join("\n");
        Ok(Self::assemble(path, frontmatter, end_line, body))
    }

    /// Parse a note, treating an undecodable frontmatter block as body text.
    pub fn from_text_lenient(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        match Self::from_text(path.clone(), text) {
            Ok(note) => note,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable frontmatter");
                let body = text_lines(text).join("\n");
                Self::assemble(path, Mapping::new(), None, body)
            }
        }
    }

    /// Load a note from disk.
    pub fn load(vault_root: &Path, relative_path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(vault_root.join(relative_path))?;
        Self::from_text(relative_path, &text)
    }

    fn assemble(path: PathBuf, frontmatter: Mapping, end_line: Option<usize>, body: String) -> Self {
        let id = frontmatter
            .get(ID_KEY)
            .and_then(scalar_text)
            .unwrap_or_else(|| file_stem(&path));
        let aliases = string_list(frontmatter.get(ALIASES_KEY));
        let tags = string_list(frontmatter.get(TAGS_KEY))
            .into_iter()
            .map(|t| t.trim_start_matches('#').to_string())
            .collect();
        let title = first_title(&body).or_else(|| aliases.first().cloned());

        Self {
            path,
            id,
            title,
            aliases,
            tags,
            frontmatter,
            has_frontmatter: end_line.is_some(),
            frontmatter_end_line: end_line,
            body,
        }
    }

    /// File name, e.g. `My Note.md`.
    pub fn fname(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    /// The built-in frontmatter for this note.
    ///
    /// Existing fields are kept in order; `id` is added when missing and
    /// `aliases`/`tags` are always present as lists.
    pub fn frontmatter_mapping(&self) -> Mapping {
        let mut out = Mapping::new();
        let id = self
            .frontmatter
            .get(ID_KEY)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::String(self.id.clone()));
        out.insert(ID_KEY.into(), id);
        out.insert(ALIASES_KEY.into(), as_list(self.frontmatter.get(ALIASES_KEY)));
        out.insert(TAGS_KEY.into(), as_list(self.frontmatter.get(TAGS_KEY)));

        for (key, value) in &self.frontmatter {
            if !is_builtin_key(key) {
                out.insert(key.clone(), value.clone());
            }
        }
        out
    }

    /// Render the note's full text with the given frontmatter (or none).
    pub fn to_text(&self, frontmatter: Option<&Mapping>) -> Result<String> {
        let lines = match frontmatter {
            Some(mapping) => parser::frontmatter_lines(mapping)?,
            None => Vec::new(),
        };
        Ok(self.with_frontmatter_lines(&lines))
    }

    /// Full text from already-serialized frontmatter lines and the body.
    pub fn with_frontmatter_lines(&self, lines: &[String]) -> String {
        let mut out: Vec<&str> = lines.iter().map(String::as_str).collect();
        out.push(&self.body);
        out.join("\n")
    }

    /// Fold a rendered template into this note.
    ///
    /// The template body replaces ours, its aliases and tags are appended and
    /// its other fields are added where we have none.
    pub fn merge_template(&mut self, template: Note) {
        for (key, value) in template.frontmatter {
            if !is_builtin_key(&key) && !self.frontmatter.contains_key(&key) {
                self.frontmatter.insert(key, value);
            }
        }
        for alias in &template.aliases {
            self.add_alias(alias);
        }
        for tag in &template.tags {
            self.add_tag(tag);
        }
        if let Some(title) = first_title(&template.body) {
            self.title = Some(title);
        }
        self.body = template.body;
    }

    /// All links in the body; line numbers refer to the full file.
    pub fn links(&self) -> Vec<Link> {
        let offset = self.frontmatter_end_line.unwrap_or(0);
        parse_all_links(&self.body)
            .into_iter()
            .map(|mut link| {
                link.line += offset;
                link
            })
            .collect()
    }

    /// Add an alias. Returns `false` if it was already present.
    pub fn add_alias(&mut self, alias: &str) -> bool {
        if self.aliases.iter().any(|a| a == alias) {
            return false;
        }
        self.aliases.push(alias.to_string());
        push_to_list(&mut self.frontmatter, ALIASES_KEY, alias);
        if self.title.is_none() {
            self.title = Some(alias.to_string());
        }
        true
    }

    /// Add a tag (a leading `#` is dropped). Returns `false` if present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim_start_matches('#');
        if self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        push_to_list(&mut self.frontmatter, TAGS_KEY, tag);
        true
    }

    /// Change the identifier, updating the `id` field if the note has one.
    pub fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
        if self.frontmatter.contains_key(ID_KEY) {
            self.frontmatter.insert(ID_KEY.into(), Value::String(id.to_string()));
        }
    }

    /// Whether the note carries the given alias (case-insensitive).
    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(alias))
    }
}

/// Text of a scalar frontmatter value.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
        None => Vec::new(),
    }
}

fn as_list(value: Option<&Value>) -> Value {
    match value {
        None | Some(Value::Null) => Value::Sequence(Vec::new()),
        Some(Value::Sequence(items)) => Value::Sequence(items.clone()),
        Some(other) => Value::Sequence(vec![other.clone()]),
    }
}

fn push_to_list(mapping: &mut Mapping, key: &str, item: &str) {
    let mut list = match as_list(mapping.get(key)) {
        Value::Sequence(items) => items,
        _ => Vec::new(),
    };
    list.push(Value::String(item.to_string()));
    mapping.insert(key.into(), Value::Sequence(list));
}

/// Check that `id` can serve as a file stem: a single, non-empty path segment.
pub fn check_id(id: &str) -> Result<&str> {
    let id = id.trim();
    if id.is_empty() || id == "." || id.contains(['/', '\\']) || id.contains("..") {
        return Err(Error::InvalidNoteId(id.to_string()));
    }
    Ok(id)
}

fn is_builtin_key(key: &Value) -> bool {
    matches!(key.as_str(), Some(ID_KEY | ALIASES_KEY | TAGS_KEY))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}
