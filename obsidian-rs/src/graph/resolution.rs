//! Link target resolution.
//!
//! A query is matched against the vault in tiers, each case-insensitive:
//! 1. Vault-relative path (with or without `.md`)
//! 2. Frontmatter `id`
//! 3. File stem
//! 4. Alias
//!
//! The first tier with any match wins.

use crate::error::{Error, Result};
use crate::note::Note;
use crate::types::{Link, LinkKind};
use crate::workspace::normalize_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Lookup tables over every note in a vault.
#[derive(Debug, Clone, Default)]
pub struct NoteCatalog {
    notes: Vec<Note>,
    by_path: HashMap<String, usize>,
    by_id: HashMap<String, Vec<usize>>,
    by_stem: HashMap<String, Vec<usize>>,
    by_alias: HashMap<String, Vec<usize>>,
}

impl NoteCatalog {
    pub fn new(mut notes: Vec<Note>) -> Self {
        notes.sort_by(|a, b| a.path.cmp(&b.path));
        let mut catalog = Self {
            notes,
            ..Self::default()
        };
        catalog.reindex();
        catalog
    }

    fn reindex(&mut self) {
        self.by_path.clear();
        self.by_id.clear();
        self.by_stem.clear();
        self.by_alias.clear();

        for (idx, note) in self.notes.iter().enumerate() {
            self.by_path.insert(path_key(&note.path), idx);
            self.by_id.entry(note.id.to_lowercase()).or_default().push(idx);
            self.by_stem.entry(note.stem().to_lowercase()).or_default().push(idx);
            for alias in &note.aliases {
                let entry = self.by_alias.entry(alias.to_lowercase()).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }
    }

    /// Add or replace a note (matched by path).
    pub fn upsert(&mut self, note: Note) {
        match self.notes.binary_search_by(|n| n.path.cmp(&note.path)) {
            Ok(pos) => self.notes[pos] = note,
            Err(pos) => self.notes.insert(pos, note),
        }
        self.reindex();
    }

    /// Drop a note by path. Returns it if present.
    pub fn remove(&mut self, path: &Path) -> Option<Note> {
        let pos = self.notes.binary_search_by(|n| n.path.as_path().cmp(path)).ok()?;
        let note = self.notes.remove(pos);
        self.reindex();
        Some(note)
    }

    /// All notes, sorted by path.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Note at an exact vault-relative path.
    pub fn get(&self, path: &Path) -> Option<&Note> {
        self.by_path.get(&path_key(path)).map(|&idx| &self.notes[idx])
    }

    /// Notes matching `query` on the first tier that has any, sorted by path.
    pub fn candidates(&self, query: &str) -> Vec<&Note> {
        let query = query.trim().trim_start_matches("./");
        if query.is_empty() {
            return Vec::new();
        }

        if let Some(&idx) = self.by_path.get(&path_key(Path::new(query))) {
            return vec![&self.notes[idx]];
        }

        let lower = query.to_lowercase();
        let stem = lower.strip_suffix(".md").unwrap_or(&lower);
        let tiers = [
            self.by_id.get(&lower),
            self.by_stem.get(stem),
            self.by_alias.get(&lower),
        ];

        for matches in tiers.into_iter().flatten() {
            if !matches.is_empty() {
                let mut found: Vec<usize> = matches.clone();
                found.sort_unstable();
                found.dedup();
                return found.into_iter().map(|idx| &self.notes[idx]).collect();
            }
        }
        Vec::new()
    }

    /// Resolve a user query to exactly one note.
    pub fn resolve(&self, query: &str) -> Result<&Note> {
        let found = self.candidates(query);
        match found.len() {
            0 => Err(Error::NoteNotFound(PathBuf::from(query))),
            1 => Ok(found[0]),
            count => Err(Error::AmbiguousResolution {
                query: query.to_string(),
                count,
                matches: found.iter().map(|n| n.path.clone()).collect(),
            }),
        }
    }

    /// Resolve a link found in `source` to a note path.
    ///
    /// Markdown links are tried relative to the source's directory first.
    /// Several candidates resolve to the first by path.
    pub fn resolve_link(&self, link: &Link, source: &Path) -> Option<PathBuf> {
        if link.kind == LinkKind::Markdown {
            let dir = source.parent().unwrap_or(Path::new(""));
            let relative = normalize_path(&dir.join(&link.target));
            if let Some(note) = self.get(&relative) {
                return Some(note.path.clone());
            }
        }
        self.candidates(&link.target)
            .first()
            .map(|note| note.path.clone())
    }
}

/// Lowercase, `/`-separated path without `.md`.
fn path_key(path: &Path) -> String {
    let text = normalize_path(path).to_string_lossy().replace('\\', "/").to_lowercase();
    match text.strip_suffix(".md") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}

/// Check if a target looks like an attachment (image, audio, video, PDF).
pub fn is_media_target(target: &str) -> bool {
    const MEDIA_EXTENSIONS: [&str; 17] = [
        "png", "jpg", "jpeg", "gif", "webp", "svg", "bmp", "mp3", "wav", "ogg", "m4a", "flac",
        "mp4", "webm", "mov", "avi", "pdf",
    ];
    let lower = target.to_lowercase();
    lower
        .rsplit_once('.')
        .is_some_and(|(_, ext)| MEDIA_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_all_links;

    fn note(path: &str, text: &str) -> Note {
        Note::from_text(path, text).unwrap()
    }

    fn catalog() -> NoteCatalog {
        NoteCatalog::new(vec![
            note("Alpha.md", "---\nid: a-1\naliases: [First]\n---\n"),
            note("sub/Beta.md", "---\naliases: [Shared]\n---\n"),
            note("other/Beta.md", "---\naliases: [Shared]\n---\n"),
            note("Gamma.md", "---\nid: beta\n---\n"),
        ])
    }

    #[test]
    fn test_tiers() {
        let catalog = catalog();
        assert_eq!(catalog.resolve("alpha.md").unwrap().path, PathBuf::from("Alpha.md"));
        assert_eq!(catalog.resolve("A-1").unwrap().path, PathBuf::from("Alpha.md"));
        assert_eq!(catalog.resolve("first").unwrap().path, PathBuf::from("Alpha.md"));
        assert_eq!(catalog.resolve("sub/beta").unwrap().path, PathBuf::from("sub/Beta.md"));
        // Id outranks stem.
        assert_eq!(catalog.resolve("beta").unwrap().path, PathBuf::from("Gamma.md"));
    }

    #[test]
    fn test_ambiguous_and_missing() {
        let catalog = catalog();
        match catalog.resolve("shared") {
            Err(Error::AmbiguousResolution { count, matches, .. }) => {
                assert_eq!(count, 2);
                assert_eq!(
                    matches,
                    vec![PathBuf::from("other/Beta.md"), PathBuf::from("sub/Beta.md")]
                );
            }
            other => panic!("unexpected: {:?}", other.map(|n| n.path.clone())),
        }
        assert!(matches!(catalog.resolve("nothing"), Err(Error::NoteNotFound(_))));
    }

    #[test]
    fn test_link_resolves_to_first_candidate() {
        let catalog = catalog();
        let links = parse_all_links("[[Shared]]");
        assert_eq!(
            catalog.resolve_link(&links[0], Path::new("Alpha.md")),
            Some(PathBuf::from("other/Beta.md"))
        );
    }

    #[test]
    fn test_markdown_link_relative_to_source() {
        let catalog = catalog();
        let links = parse_all_links("[b](Beta.md) [up](../Alpha.md)");
        let source = Path::new("sub/Note.md");
        assert_eq!(
            catalog.resolve_link(&links[0], source),
            Some(PathBuf::from("sub/Beta.md"))
        );
        assert_eq!(
            catalog.resolve_link(&links[1], source),
            Some(PathBuf::from("Alpha.md"))
        );
    }

    #[test]
    fn test_upsert_and_remove() {
        let mut catalog = catalog();
        catalog.upsert(note("Delta.md", "---\naliases: [D]\n---\n"));
        assert_eq!(catalog.resolve("d").unwrap().path, PathBuf::from("Delta.md"));
        assert_eq!(catalog.len(), 5);

        assert!(catalog.remove(Path::new("Delta.md")).is_some());
        assert!(catalog.resolve("d").is_err());
    }

    #[test]
    fn test_is_media_target() {
        assert!(is_media_target("image.png"));
        assert!(is_media_target("photo.JPG"));
        assert!(is_media_target("document.pdf"));
        assert!(!is_media_target("Note"));
        assert!(!is_media_target("v1.2 notes"));
        assert!(!is_media_target("Note.md"));
    }
}
