//! Vault representation and file operations.

use crate::error::{Error, Result};
use crate::note::Note;
use crate::workspace::normalize_path;
use glob::glob;
use std::path::{Path, PathBuf};

/// A directory tree of Markdown notes.
#[derive(Debug, Clone)]
pub struct Vault {
    /// Root path of the vault.
    pub root: PathBuf,
}

impl Vault {
    /// Open an existing vault directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = normalize_path(&root.into());

        if !root.is_dir() {
            return Err(Error::VaultNotFound(root));
        }

        Ok(Self { root })
    }

    /// Get the full path to a note.
    pub fn note_path(&self, relative_path: &Path) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Vault-relative form of `path`, or `None` if it lies outside the vault.
    ///
    /// Relative paths are taken to be vault-relative already.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_relative() {
            let normalized = normalize_path(path);
            return (!normalized.starts_with("..")).then_some(normalized);
        }
        normalize_path(path)
            .strip_prefix(&self.root)
            .ok()
            .map(Path::to_path_buf)
    }

    /// Whether `path` lies inside the vault.
    pub fn contains(&self, path: &Path) -> bool {
        self.relative_path(path).is_some()
    }

    /// Normalize a note path (add .md extension if needed).
    pub fn normalize_note_path(&self, path: &str) -> PathBuf {
        let path = path.trim();
        if path.to_lowercase().ends_with(".md") {
            PathBuf::from(path)
        } else {
            PathBuf::from(format!("{}.md", path))
        }
    }

    /// Check if a note exists.
    pub fn note_exists(&self, relative_path: &Path) -> bool {
        self.note_path(relative_path).is_file()
    }

    /// Raw text of a note.
    pub fn read_text(&self, relative_path: &Path) -> Result<String> {
        if !self.note_exists(relative_path) {
            return Err(Error::NoteNotFound(relative_path.to_path_buf()));
        }
        Ok(std::fs::read_to_string(self.note_path(relative_path))?)
    }

    /// Load a note from the vault.
    pub fn load_note(&self, relative_path: &Path) -> Result<Note> {
        if !self.note_exists(relative_path) {
            return Err(Error::NoteNotFound(relative_path.to_path_buf()));
        }
        Note::load(&self.root, relative_path)
    }

    /// Load a note, treating malformed frontmatter as body text.
    pub fn load_note_lenient(&self, relative_path: &Path) -> Result<Note> {
        let text = self.read_text(relative_path)?;
        Ok(Note::from_text_lenient(relative_path, &text))
    }

    /// Overwrite a note's text, creating parent directories as needed.
    pub fn write_text(&self, relative_path: &Path, text: &str) -> Result<()> {
        let full_path = self.note_path(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(full_path, text)?;
        Ok(())
    }

    /// Create a new note with the given text.
    pub fn create_note(&self, relative_path: &Path, text: &str) -> Result<Note> {
        if self.note_exists(relative_path) {
            return Err(Error::NoteAlreadyExists(relative_path.to_path_buf()));
        }

        let note = Note::from_text(relative_path, text)?;
        self.write_text(relative_path, text)?;
        tracing::info!(path = %relative_path.display(), "created note");
        Ok(note)
    }

    /// Move a note file.
    pub fn rename_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.note_exists(from) {
            return Err(Error::NoteNotFound(from.to_path_buf()));
        }

        if self.note_exists(to) {
            return Err(Error::NoteAlreadyExists(to.to_path_buf()));
        }

        let to_full = self.note_path(to);
        if let Some(parent) = to_full.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::rename(self.note_path(from), to_full)?;
        Ok(())
    }

    /// Create a vault subdirectory; an existing directory is fine.
    pub fn ensure_dir(&self, relative_dir: &Path) -> Result<PathBuf> {
        let full = self.root.join(relative_dir);
        std::fs::create_dir_all(&full)?;
        Ok(full)
    }

    /// List all markdown files in the vault, sorted, skipping hidden paths.
    pub fn list_notes(&self) -> Result<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/**/*.md", root.trim_end_matches('/'));

        let mut notes = Vec::new();

        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Ok(relative) = path.strip_prefix(&self.root) {
                        if !relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        {
                            notes.push(relative.to_path_buf());
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "glob error while listing notes");
                }
            }
        }

        notes.sort();

        Ok(notes)
    }

    /// Load every note, skipping (with a warning) any that fail to parse.
    pub fn load_all(&self) -> Result<Vec<Note>> {
        let mut notes = Vec::new();
        for path in self.list_notes()? {
            match self.load_note_lenient(&path) {
                Ok(note) => notes.push(note),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping note"),
            }
        }
        Ok(notes)
    }
}
