//! Renaming a note and rewriting the links that point at it.

use super::link_index::LinkIndex;
use crate::error::{Error, Result};
use crate::note::{ID_KEY, Note, check_id};
use crate::parser::{format_link, frontmatter_lines, line_ending, replace_leading_lines, text_lines};
use crate::types::{Link, LinkKind};
use crate::vault::Vault;
use serde::Serialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A link that was (or would be) rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkChange {
    pub line: usize,
    pub old: String,
    pub new: String,
}

/// Changes within one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEdit {
    pub path: PathBuf,
    pub links: Vec<LinkChange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub from: PathBuf,
    pub to: PathBuf,
    pub id_updated: bool,
    pub files: Vec<FileEdit>,
    pub dry_run: bool,
}

impl RenamePlan {
    pub fn links_updated(&self) -> usize {
        self.files.iter().map(|f| f.links.len()).sum()
    }
}

/// Rename the note at `from` so its file stem (and `id`, if set) is `new_id`.
///
/// Links that named the note by path, id or stem are rewritten; links via an
/// alias still resolve and are left alone. With `dry_run` nothing is written.
pub fn rename_note(
    vault: &Vault,
    index: &LinkIndex,
    from: &Path,
    new_id: &str,
    dry_run: bool,
) -> Result<RenamePlan> {
    let note = index
        .catalog()
        .get(from)
        .ok_or_else(|| Error::NoteNotFound(from.to_path_buf()))?;
    let new_id = check_id(new_id)?;
    let to = from.with_file_name(format!("{}.md", new_id));
    if to != from && vault.note_exists(&to) {
        return Err(Error::NoteAlreadyExists(to));
    }

    // Group incoming links by source file.
    let mut by_file: BTreeMap<PathBuf, Vec<&Link>> = BTreeMap::new();
    for source in index.backlink_sources(from).into_iter().flatten() {
        for out in index.outgoing(source) {
            if out.resolved.as_deref() == Some(from) && !note.has_alias(&out.link.target) {
                by_file.entry(source.clone()).or_default().push(&out.link);
            }
        }
    }

    let old_stem = note.stem();
    let mut files = Vec::new();
    let mut new_texts = Vec::new();

    for (source, links) in by_file {
        let mut changes = Vec::new();
        for link in &links {
            let updated = create_updated_link(link, &old_stem, &note.id, new_id);
            let old_text = format_link(link);
            let new_text = format_link(&updated);
            if old_text != new_text {
                changes.push((*link, new_text.clone(), LinkChange {
                    line: link.line,
                    old: old_text,
                    new: new_text,
                }));
            }
        }
        if changes.is_empty() {
            continue;
        }

        let text = vault.read_text(&source)?;
        let edits: Vec<(&Link, String)> = changes.iter().map(|(l, t, _)| (*l, t.clone())).collect();
        new_texts.push((source.clone(), rewrite_links(&text, &edits)));
        files.push(FileEdit {
            path: source,
            links: changes.into_iter().map(|(_, _, change)| change).collect(),
        });
    }

    let id_updated = note.frontmatter.contains_key(ID_KEY);
    let plan = RenamePlan {
        from: from.to_path_buf(),
        to: to.clone(),
        id_updated,
        files,
        dry_run,
    };

    if dry_run {
        return Ok(plan);
    }

    for (path, text) in &new_texts {
        vault.write_text(path, text)?;
    }
    if id_updated {
        // Re-read: the note may have just been rewritten for self-links.
        let text = vault.read_text(from)?;
        let mut renamed = Note::from_text(from, &text)?;
        renamed.set_id(new_id);
        renamed
            .frontmatter
            .insert(ID_KEY.into(), Value::String(new_id.to_string()));
        let lines = frontmatter_lines(&renamed.frontmatter)?;
        let end = renamed.frontmatter_end_line.unwrap_or(0);
        vault.write_text(from, &replace_leading_lines(&text, end, &lines))?;
    }
    if to != from {
        vault.rename_file(from, &to)?;
    }

    tracing::info!(
        from = %from.display(),
        to = %to.display(),
        links = plan.links_updated(),
        "renamed note"
    );
    Ok(plan)
}

/// A copy of `link` pointing at the renamed note.
///
/// The rename stays within the same directory, so only the last path
/// segment of the target changes.
fn create_updated_link(link: &Link, old_stem: &str, old_id: &str, new_id: &str) -> Link {
    let mut updated = link.clone();
    let (dir, name) = match link.target.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, link.target.as_str()),
    };

    let has_ext = name.to_lowercase().ends_with(".md");
    let bare = if has_ext { &name[..name.len() - 3] } else { name };
    if !bare.eq_ignore_ascii_case(old_stem) && !bare.eq_ignore_ascii_case(old_id) {
        return updated;
    }

    let mut new_name = new_id.to_string();
    if has_ext || link.kind == LinkKind::Markdown {
        new_name.push_str(".md");
    }
    updated.target = match dir {
        Some(dir) => format!("{}/{}", dir, new_name),
        None => new_name,
    };
    updated
}

/// Replace each link's column range with new text, last link first.
fn rewrite_links(text: &str, edits: &[(&Link, String)]) -> String {
    let eol = line_ending(text);
    let mut lines: Vec<String> = text_lines(text).into_iter().map(str::to_string).collect();

    let mut ordered: Vec<&(&Link, String)> = edits.iter().collect();
    ordered.sort_by(|a, b| (b.0.line, b.0.start_col).cmp(&(a.0.line, a.0.start_col)));

    for (link, new_text) in ordered {
        let Some(line) = link.line.checked_sub(1).and_then(|i| lines.get_mut(i)) else {
            continue;
        };
        if link.end_col <= line.len()
            && line.is_char_boundary(link.start_col)
            && line.is_char_boundary(link.end_col)
        {
            line.replace_range(link.start_col..link.end_col, new_text);
        }
    }
    lines.join(eol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("notes")).unwrap();
        fs::write(
            root.join("notes/old.md"),
            "---\nid: old\naliases: [Old Note]\n---\n# Old\nSelf [[old#Top]]\n",
        )
        .unwrap();
        fs::write(
            root.join("a.md"),
            "See [[old]] and [[notes/old|label]].\nAlso [[Old Note]] and [x](notes/old.md).\n",
        )
        .unwrap();
        let vault = Vault::new(root).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_dry_run_reports_only() {
        let (temp, vault) = setup();
        let index = LinkIndex::build(&vault).unwrap();
        let plan = rename_note(&vault, &index, Path::new("notes/old.md"), "new", true).unwrap();

        assert_eq!(plan.to, PathBuf::from("notes/new.md"));
        assert!(plan.id_updated);
        assert_eq!(plan.links_updated(), 4);
        let a = plan.files.iter().find(|f| f.path == Path::new("a.md")).unwrap();
        assert_eq!(
            a.links.iter().map(|c| c.new.as_str()).collect::<Vec<_>>(),
            vec!["[[new]]", "[[notes/new|label]]", "[x](notes/new.md)"]
        );
        assert!(temp.path().join("notes/old.md").exists());
    }

    #[test]
    fn test_rename_rewrites_files() {
        let (temp, vault) = setup();
        let index = LinkIndex::build(&vault).unwrap();
        rename_note(&vault, &index, Path::new("notes/old.md"), "new", false).unwrap();

        assert!(!temp.path().join("notes/old.md").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("a.md")).unwrap(),
            "See [[new]] and [[notes/new|label]].\nAlso [[Old Note]] and [x](notes/new.md).\n"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("notes/new.md")).unwrap(),
            "---\nid: new\naliases: [Old Note]\n---\n# Old\nSelf [[new#Top]]\n"
        );
    }

    #[test]
    fn test_rename_onto_existing_fails() {
        let (temp, vault) = setup();
        fs::write(temp.path().join("notes/taken.md"), "x").unwrap();
        let index = LinkIndex::build(&vault).unwrap();
        let result = rename_note(&vault, &index, Path::new("notes/old.md"), "taken", false);
        assert!(matches!(result, Err(Error::NoteAlreadyExists(_))));
    }

    #[test]
    fn test_rename_rejects_path_like_id() {
        let (temp, vault) = setup();
        let index = LinkIndex::build(&vault).unwrap();
        let a_before = fs::read_to_string(temp.path().join("a.md")).unwrap();

        for bad in ["../../gone", "sub/new", "sub\\new", "", "  "] {
            let result = rename_note(&vault, &index, Path::new("notes/old.md"), bad, false);
            assert!(matches!(result, Err(Error::InvalidNoteId(_))), "accepted {:?}", bad);
        }

        assert!(temp.path().join("notes/old.md").exists());
        assert!(!temp.path().parent().unwrap().join("gone.md").exists());
        assert_eq!(fs::read_to_string(temp.path().join("a.md")).unwrap(), a_before);
    }

    #[test]
    fn test_rewrite_links_multibyte() {
        let text = "é [[a]] ü [[a]]";
        let links = crate::parser::parse_all_links(text);
        let edits: Vec<(&Link, String)> = links.iter().map(|l| (l, "[[b]]".to_string())).collect();
        assert_eq!(rewrite_links(text, &edits), "é [[b]] ü [[b]]");
    }
}
