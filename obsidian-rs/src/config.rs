//! User configuration, loaded from TOML.
//!
//! Only data lives here. Function-valued settings (custom frontmatter, note
//! ids, save predicates, template substitutions) are injected through
//! [`crate::client::ClientBuilder`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Where new notes go when no directory is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewNotesLocation {
    /// Next to the note most recently entered.
    CurrentDir,
    /// In `notes_subdir` (or the vault root if unset).
    #[default]
    NotesSubdir,
}

/// How note identifiers are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteIdScheme {
    /// `<unix seconds>-<slug or 4 random letters>`.
    #[default]
    Zettel,
    /// Slugified title.
    Title,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyNotesConfig {
    pub folder: Option<PathBuf>,
    pub date_format: String,
    pub alias_format: String,
    pub default_tags: Vec<String>,
    pub template: Option<String>,
}

impl Default for DailyNotesConfig {
    fn default() -> Self {
        Self {
            folder: None,
            date_format: "%Y-%m-%d".to_string(),
            alias_format: "%B %-d, %Y".to_string(),
            default_tags: vec!["daily-notes".to_string()],
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    pub folder: Option<PathBuf>,
    pub date_format: String,
    pub time_format: String,
    /// Static `{{name}}` replacements.
    pub substitutions: BTreeMap<String, String>,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            folder: None,
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M".to_string(),
            substitutions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontmatterConfig {
    /// Master switch for writing frontmatter on save.
    pub enabled: bool,
    /// Glob patterns (vault-relative) of notes whose frontmatter is left alone.
    pub exclude: Vec<String>,
}

impl Default for FrontmatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exclude: Vec::new(),
        }
    }
}

/// Per-workspace replacements for top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_subdir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_notes_location: Option<NewNotesLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<NoteIdScheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_notes: Option<DailyNotesConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<TemplatesConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<FrontmatterConfig>,
}

/// A named vault root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceSpec {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub overrides: WorkspaceOverrides,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub workspaces: Vec<WorkspaceSpec>,
    pub notes_subdir: Option<PathBuf>,
    pub new_notes_location: NewNotesLocation,
    pub note_id: NoteIdScheme,
    pub daily_notes: DailyNotesConfig,
    pub templates: TemplatesConfig,
    pub frontmatter: FrontmatterConfig,
}

impl Config {
    /// Default config file location: `<config dir>/obsidian/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("obsidian").join("config.toml"))
    }

    /// Load from the default location; a missing file yields defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), workspaces = config.workspaces.len(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for ws in &self.workspaces {
            if ws.name.trim().is_empty() {
                return Err(Error::Config("workspace name must not be empty".to_string()));
            }
            if !seen.insert(ws.name.as_str()) {
                return Err(Error::Config(format!("duplicate workspace name '{}'", ws.name)));
            }
        }
        Ok(())
    }

    /// This config with a workspace's overrides applied.
    pub fn with_overrides(&self, overrides: &WorkspaceOverrides) -> Config {
        let mut merged = self.clone();
        if let Some(ref dir) = overrides.notes_subdir {
            merged.notes_subdir = Some(dir.clone());
        }
        if let Some(location) = overrides.new_notes_location {
            merged.new_notes_location = location;
        }
        if let Some(scheme) = overrides.note_id {
            merged.note_id = scheme;
        }
        if let Some(ref daily) = overrides.daily_notes {
            merged.daily_notes = daily.clone();
        }
        if let Some(ref templates) = overrides.templates {
            merged.templates = templates.clone();
        }
        if let Some(ref frontmatter) = overrides.frontmatter {
            merged.frontmatter = frontmatter.clone();
        }
        merged
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.frontmatter.enabled);
        assert_eq!(config.daily_notes.date_format, "%Y-%m-%d");
        assert_eq!(config.new_notes_location, NewNotesLocation::NotesSubdir);
    }

    #[test]
    fn test_full_config() {
        let text = r#"
notes_subdir = "notes"
new_notes_location = "current_dir"
note_id = "title"

[daily_notes]
folder = "dailies"
template = "daily.md"

[templates]
folder = "templates"

[templates.substitutions]
author = "me"

[frontmatter]
exclude = ["archive/**"]

[[workspaces]]
name = "personal"
path = "~/vaults/personal"

[[workspaces]]
name = "work"
path = "/srv/work"
[workspaces.overrides]
notes_subdir = "inbox"
"#;
        let config = Config::from_toml_str(text).unwrap();
        assert_eq!(config.notes_subdir, Some(PathBuf::from("notes")));
        assert_eq!(config.new_notes_location, NewNotesLocation::CurrentDir);
        assert_eq!(config.note_id, NoteIdScheme::Title);
        assert_eq!(config.daily_notes.folder, Some(PathBuf::from("dailies")));
        assert_eq!(config.daily_notes.alias_format, "%B %-d, %Y");
        assert_eq!(config.templates.substitutions.get("author").map(String::as_str), Some("me"));
        assert_eq!(config.frontmatter.exclude, vec!["archive/**"]);
        assert!(config.frontmatter.enabled);
        assert_eq!(config.workspaces.len(), 2);

        let work = config.with_overrides(&config.workspaces[1].overrides);
        assert_eq!(work.notes_subdir, Some(PathBuf::from("inbox")));
        assert_eq!(work.daily_notes.folder, Some(PathBuf::from("dailies")));
    }

    #[test]
    fn test_duplicate_workspace_rejected() {
        let text = "[[workspaces]]\nname = \"a\"\npath = \"/a\"\n[[workspaces]]\nname = \"a\"\npath = \"/b\"\n";
        assert!(matches!(Config::from_toml_str(text), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(Config::from_toml_str("notes_subdir = ["), Err(Error::TomlParse(_))));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/vault")), home.join("vault"));
        }
    }
}
