//! Outgoing links, backlinks and unresolved targets across a vault.
//!
//! The index is derived data: it is rebuilt from note contents and never
//! edited by hand.

use super::resolution::{is_media_target, NoteCatalog};
use crate::error::Result;
use crate::note::Note;
use crate::types::Link;
use crate::vault::Vault;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// A link in a note together with where it points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingLink {
    #[serde(flatten)]
    pub link: Link,

    /// Resolved note path, if the target exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<PathBuf>,
}

/// A link pointing at a note, seen from the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Backlink {
    /// The note containing the link.
    pub source: PathBuf,

    #[serde(flatten)]
    pub link: Link,
}

#[derive(Debug, Clone, Default)]
pub struct LinkIndex {
    catalog: NoteCatalog,
    outgoing: BTreeMap<PathBuf, Vec<OutgoingLink>>,
    /// Target path to the notes linking to it.
    backlinks: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Normalized missing target to the notes linking to it.
    unresolved: BTreeMap<String, BTreeSet<PathBuf>>,
}

impl LinkIndex {
    /// Load every note in the vault and index it.
    pub fn build(vault: &Vault) -> Result<Self> {
        let catalog = NoteCatalog::new(vault.load_all()?);
        let index = Self::from_catalog(catalog);
        tracing::debug!(
            notes = index.catalog.len(),
            unresolved = index.unresolved.len(),
            "built link index"
        );
        Ok(index)
    }

    pub fn from_catalog(catalog: NoteCatalog) -> Self {
        let mut index = Self {
            catalog,
            ..Self::default()
        };
        index.reindex();
        index
    }

    pub fn catalog(&self) -> &NoteCatalog {
        &self.catalog
    }

    fn index_source(&mut self, source: &Path) {
        let Some(note) = self.catalog.get(source) else {
            return;
        };

        let mut links = Vec::new();
        for link in note.links() {
            if is_media_target(&link.target) {
                continue;
            }
            let resolved = self.catalog.resolve_link(&link, source);
            links.push(OutgoingLink { link, resolved });
        }

        for out in &links {
            match out.resolved {
                Some(ref target) => {
                    self.backlinks
                        .entry(target.clone())
                        .or_default()
                        .insert(source.to_path_buf());
                }
                None => {
                    self.unresolved
                        .entry(normalize_target(&out.link.target))
                        .or_default()
                        .insert(source.to_path_buf());
                }
            }
        }
        self.outgoing.insert(source.to_path_buf(), links);
    }

    /// Re-index one changed or new note.
    ///
    /// Any note may gain a better match for a link that already resolves
    /// elsewhere, so every source is re-resolved against the updated catalog.
    pub fn refresh_note(&mut self, note: Note) {
        self.catalog.upsert(note);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.outgoing.clear();
        self.backlinks.clear();
        self.unresolved.clear();
        let sources: Vec<PathBuf> = self.catalog.notes().iter().map(|n| n.path.clone()).collect();
        for source in sources {
            self.index_source(&source);
        }
    }

    /// Links found in a note.
    pub fn outgoing(&self, path: &Path) -> &[OutgoingLink] {
        self.outgoing.get(path).map(Vec::as_slice).unwrap_or_default()
    }

    /// Notes linking to `path`.
    pub fn backlink_sources(&self, path: &Path) -> Option<&BTreeSet<PathBuf>> {
        self.backlinks.get(path)
    }

    /// Every link occurrence pointing at `path`, ordered by source then position.
    pub fn backlinks(&self, path: &Path) -> Vec<Backlink> {
        let Some(sources) = self.backlinks.get(path) else {
            return Vec::new();
        };
        sources
            .iter()
            .flat_map(|source| {
                self.outgoing(source)
                    .iter()
                    .filter(|out| out.resolved.as_deref() == Some(path))
                    .map(|out| Backlink {
                        source: source.clone(),
                        link: out.link.clone(),
                    })
            })
            .collect()
    }

    /// Missing targets and the notes mentioning them.
    pub fn unresolved(&self) -> &BTreeMap<String, BTreeSet<PathBuf>> {
        &self.unresolved
    }
}

/// Normalize a link target for use as a key.
fn normalize_target(target: &str) -> String {
    let target = target.trim().to_lowercase();
    target
        .strip_suffix(".md")
        .unwrap_or(&target)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_vault() -> (TempDir, Vault) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(
            root.join("Note A.md"),
            "---\naliases:\n  - alias-a\n---\n\n# Note A\n\nLinks to [[Note B]] and [[Note C#heading]].\n",
        )
        .unwrap();
        fs::write(
            root.join("Note B.md"),
            "# Note B\n\nLinks back to [[alias-a]] and [[Missing]].\n\n![[diagram.png]]\n",
        )
        .unwrap();
        fs::write(root.join("Note C.md"), "# Note C\n\nSee [A](Note%20A.md).\n").unwrap();

        let vault = Vault::new(root).unwrap();
        (temp, vault)
    }

    #[test]
    fn test_outgoing() {
        let (_temp, vault) = create_test_vault();
        let index = LinkIndex::build(&vault).unwrap();

        let outgoing = index.outgoing(Path::new("Note A.md"));
        assert_eq!(outgoing.len(), 2);
        assert_eq!(outgoing[0].resolved, Some(PathBuf::from("Note B.md")));
        assert_eq!(outgoing[1].link.heading.as_deref(), Some("heading"));
        // Frontmatter occupies lines 1-4.
        assert_eq!(outgoing[0].link.line, 8);
    }

    #[test]
    fn test_backlinks() {
        let (_temp, vault) = create_test_vault();
        let index = LinkIndex::build(&vault).unwrap();

        let backlinks = index.backlinks(Path::new("Note A.md"));
        let sources: Vec<_> = backlinks.iter().map(|b| b.source.clone()).collect();
        assert_eq!(sources, vec![PathBuf::from("Note B.md"), PathBuf::from("Note C.md")]);
        assert_eq!(backlinks[0].link.target, "alias-a");
    }

    #[test]
    fn test_unresolved_and_media() {
        let (_temp, vault) = create_test_vault();
        let index = LinkIndex::build(&vault).unwrap();

        let unresolved: Vec<_> = index.unresolved().keys().cloned().collect();
        assert_eq!(unresolved, vec!["missing"]);
        assert_eq!(index.outgoing(Path::new("Note B.md")).len(), 2);
    }

    #[test]
    fn test_refresh_resolves_new_note() {
        let (_temp, vault) = create_test_vault();
        let mut index = LinkIndex::build(&vault).unwrap();

        index.refresh_note(Note::from_text("Missing.md", "# Here now").unwrap());
        assert!(index.unresolved().is_empty());
        let sources = index.backlink_sources(Path::new("Missing.md")).unwrap();
        assert!(sources.contains(Path::new("Note B.md")));
    }

    #[test]
    fn test_refresh_drops_removed_links() {
        let (_temp, vault) = create_test_vault();
        let mut index = LinkIndex::build(&vault).unwrap();

        index.refresh_note(Note::from_text("Note C.md", "# Note C\n\nNo links now.").unwrap());
        let backlinks = index.backlinks(Path::new("Note A.md"));
        assert_eq!(backlinks.len(), 1);
        assert_eq!(backlinks[0].source, PathBuf::from("Note B.md"));
    }

    #[test]
    fn test_refresh_matches_rebuild() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::write(root.join("b.md"), "---\naliases: [Topic]\n---\n# B\n").unwrap();
        fs::write(root.join("src.md"), "See [[Topic]] and [[Later]].\n").unwrap();
        let vault = Vault::new(root).unwrap();
        let mut index = LinkIndex::build(&vault).unwrap();
        assert_eq!(
            index.outgoing(Path::new("src.md"))[0].resolved,
            Some(PathBuf::from("b.md"))
        );

        // A stem match outranks the alias `src.md` resolved through so far.
        let text = "# Topic\n\nSee [[Later]].\n";
        fs::write(root.join("topic.md"), text).unwrap();
        index.refresh_note(Note::from_text("topic.md", text).unwrap());
        let rebuilt = LinkIndex::build(&vault).unwrap();

        for source in ["b.md", "src.md", "topic.md"] {
            assert_eq!(index.outgoing(Path::new(source)), rebuilt.outgoing(Path::new(source)));
        }
        for target in ["b.md", "topic.md"] {
            assert_eq!(
                index.backlink_sources(Path::new(target)),
                rebuilt.backlink_sources(Path::new(target))
            );
        }
        assert_eq!(index.unresolved(), rebuilt.unresolved());

        assert_eq!(
            index.outgoing(Path::new("src.md"))[0].resolved,
            Some(PathBuf::from("topic.md"))
        );
        assert!(index.backlink_sources(Path::new("b.md")).is_none());
        let later = index.unresolved().get("later").unwrap();
        assert_eq!(later.len(), 2);
    }
}
