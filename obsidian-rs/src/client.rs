//! The vault client: resolved workspace, effective settings and every
//! operation that needs them.
//!
//! A client is constructed once through [`ClientBuilder`] and passed
//! explicitly to whatever needs it.

use crate::config::{Config, NewNotesLocation, NoteIdScheme};
use crate::error::{Error, Result};
use crate::graph::{self, LinkIndex, NoteCatalog, RenamePlan};
use crate::note::{check_id, Note};
use crate::parser::{frontmatter_lines, line_ending, replace_leading_lines, slugify, text_lines};
use crate::sync::{self, FrontmatterGenerator, SavePredicate, SyncOutcome};
use crate::templates::{strftime, SubstitutionFn, TemplateContext, Templates};
use crate::vault::Vault;
use crate::workspace::{normalize_path, resolve_workspace, Workspace};
use chrono::{Duration, Local, NaiveDate};
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Generates a note id from an optional title.
pub type NoteIdFn = Arc<dyn Fn(Option<&str>) -> String + Send + Sync>;

/// File names whose frontmatter is never managed.
const UNMANAGED_FILES: [&str; 3] = ["index.md", "README.md", "CHANGELOG.md"];

/// Parameters for [`Client::create_note`].
#[derive(Debug, Clone, Default)]
pub struct NewNote {
    pub title: Option<String>,
    pub id: Option<String>,
    /// Vault-relative directory; defaults per `new_notes_location`.
    pub dir: Option<PathBuf>,
    pub template: Option<String>,
}

/// Builds a [`Client`] from configuration plus injected functions.
#[derive(Default)]
pub struct ClientBuilder {
    config: Config,
    dir: Option<PathBuf>,
    workspace: Option<String>,
    cwd: Option<PathBuf>,
    frontmatter_fn: Option<FrontmatterGenerator>,
    save_predicate: Option<SavePredicate>,
    note_id_fn: Option<NoteIdFn>,
    substitutions: BTreeMap<String, SubstitutionFn>,
}

impl ClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Bind to this directory regardless of configured workspaces.
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// Bind to the named workspace.
    pub fn workspace(mut self, name: impl Into<String>) -> Self {
        self.workspace = Some(name.into());
        self
    }

    /// Context for ancestor matching; defaults to the process cwd.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn frontmatter_func(mut self, f: impl Fn(&Note) -> Mapping + Send + Sync + 'static) -> Self {
        self.frontmatter_fn = Some(Arc::new(f));
        self
    }

    pub fn save_predicate(mut self, f: impl Fn(&Note) -> bool + Send + Sync + 'static) -> Self {
        self.save_predicate = Some(Arc::new(f));
        self
    }

    pub fn note_id_func(mut self, f: impl Fn(Option<&str>) -> String + Send + Sync + 'static) -> Self {
        self.note_id_fn = Some(Arc::new(f));
        self
    }

    /// Add a computed `{{name}}` template substitution.
    pub fn substitution(
        mut self,
        name: impl Into<String>,
        f: impl Fn(&TemplateContext) -> String + Send + Sync + 'static,
    ) -> Self {
        self.substitutions.insert(name.into(), Arc::new(f));
        self
    }

    /// Resolve the workspace, open the vault and create configured folders.
    pub fn build(self) -> Result<Client> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir()?,
        };
        let workspace = resolve_workspace(
            &self.config.workspaces,
            &cwd,
            self.dir.as_deref(),
            self.workspace.as_deref(),
        )?;
        let config = self.config.with_overrides(&workspace.overrides);
        let vault = Vault::new(&workspace.root)?;

        let mut exclude = Vec::with_capacity(config.frontmatter.exclude.len());
        for pattern in &config.frontmatter.exclude {
            exclude.push(glob::Pattern::new(pattern)?);
        }

        let templates = Templates::new(&vault.root, config.templates.clone(), self.substitutions);

        let client = Client {
            workspace,
            vault,
            config,
            templates,
            exclude,
            frontmatter_fn: self.frontmatter_fn,
            save_predicate: self.save_predicate,
            note_id_fn: self.note_id_fn,
        };
        client.ensure_dirs()?;
        tracing::debug!(
            workspace = %client.workspace.name,
            root = %client.vault.root.display(),
            "client ready"
        );
        Ok(client)
    }
}

pub struct Client {
    workspace: Workspace,
    vault: Vault,
    config: Config,
    templates: Templates,
    exclude: Vec<glob::Pattern>,
    frontmatter_fn: Option<FrontmatterGenerator>,
    save_predicate: Option<SavePredicate>,
    note_id_fn: Option<NoteIdFn>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("workspace", &self.workspace)
            .field("config", &self.config)
            .field("templates", &self.templates)
            .field("frontmatter_fn", &self.frontmatter_fn.is_some())
            .field("save_predicate", &self.save_predicate.is_some())
            .field("note_id_fn", &self.note_id_fn.is_some())
            .finish()
    }
}

impl Client {
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Effective configuration, workspace overrides applied.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Create the notes and daily-notes folders if configured.
    pub fn ensure_dirs(&self) -> Result<()> {
        if let Some(ref dir) = self.config.notes_subdir {
            self.vault.ensure_dir(dir)?;
        }
        if let Some(ref dir) = self.config.daily_notes.folder {
            self.vault.ensure_dir(dir)?;
        }
        Ok(())
    }

    pub fn is_template(&self, path: &Path) -> bool {
        self.templates.is_template(path)
    }

    /// Whether frontmatter may be written for `note`.
    pub fn should_save_frontmatter(&self, note: &Note) -> bool {
        let relative = self
            .vault
            .relative_path(&note.path)
            .unwrap_or_else(|| note.path.clone());

        if self.is_template(&relative) {
            return false;
        }
        if note.fname().is_some_and(|name| UNMANAGED_FILES.contains(&name)) {
            return false;
        }
        if !self.config.frontmatter.enabled {
            return false;
        }
        let key = relative.to_string_lossy().replace('\\', "/");
        if self.exclude.iter().any(|pattern| pattern.matches(&key)) {
            return false;
        }
        self.save_predicate.as_ref().is_none_or(|predicate| predicate(note))
    }

    /// Canonical frontmatter for `note`.
    pub fn frontmatter_for(&self, note: &Note) -> Mapping {
        match self.frontmatter_fn {
            Some(ref f) => f(note),
            None => note.frontmatter_mapping(),
        }
    }

    /// Plan a frontmatter sync for buffer text.
    pub fn sync_text(&self, path: &Path, text: &str) -> Result<SyncOutcome> {
        sync::plan_text(self, path, text)
    }

    /// Sync a note file on disk.
    pub fn sync_file(&self, relative_path: &Path, dry_run: bool) -> Result<SyncOutcome> {
        let text = self.vault.read_text(relative_path)?;
        let outcome = self.sync_text(relative_path, &text)?;
        if let SyncOutcome::Updated(ref edit) = outcome {
            if !dry_run {
                self.vault.write_text(relative_path, &edit.apply(&text))?;
                tracing::info!(path = %relative_path.display(), "updated frontmatter");
            }
        }
        Ok(outcome)
    }

    /// Catalog of every note in the vault.
    pub fn catalog(&self) -> Result<NoteCatalog> {
        Ok(NoteCatalog::new(self.vault.load_all()?))
    }

    pub fn link_index(&self) -> Result<LinkIndex> {
        LinkIndex::build(&self.vault)
    }

    /// Resolve a query (path, id, file name or alias) to one note.
    pub fn resolve_note(&self, query: &str) -> Result<Note> {
        self.catalog()?.resolve(query).cloned()
    }

    /// Rename a note and rewrite links to it.
    pub fn rename_note(&self, query: &str, new_id: &str, dry_run: bool) -> Result<RenamePlan> {
        let index = self.link_index()?;
        let from = index.catalog().resolve(query)?.path.clone();
        graph::rename_note(&self.vault, &index, &from, new_id, dry_run)
    }

    /// A new note id for `title` per the configured scheme.
    pub fn new_note_id(&self, title: Option<&str>) -> String {
        if let Some(ref f) = self.note_id_fn {
            return f(title);
        }
        let slug = title.map(slugify).unwrap_or_default();
        match self.config.note_id {
            NoteIdScheme::Title if !slug.is_empty() => slug,
            _ => {
                let suffix = if slug.is_empty() { random_letters() } else { slug };
                format!("{}-{}", Local::now().timestamp(), suffix)
            }
        }
    }

    /// Where a note goes when no directory is given.
    pub fn default_note_dir(&self, current_note: Option<&Path>) -> PathBuf {
        match self.config.new_notes_location {
            NewNotesLocation::CurrentDir => {
                if let Some(dir) = current_note
                    .and_then(|p| self.vault.relative_path(p))
                    .and_then(|p| p.parent().map(Path::to_path_buf))
                {
                    return dir;
                }
                PathBuf::new()
            }
            NewNotesLocation::NotesSubdir => self.config.notes_subdir.clone().unwrap_or_default(),
        }
    }

    /// Create and write a new note.
    pub fn create_note(&self, new: NewNote) -> Result<Note> {
        let (subdir, title) = match new.title.as_deref().map(str::trim) {
            Some(title) => match title.rsplit_once('/') {
                Some((dir, name)) => (Some(PathBuf::from(dir)), Some(name.trim().to_string())),
                None => (None, Some(title.to_string())),
            },
            None => (None, None),
        };
        let title = title.filter(|t| !t.is_empty());

        let id = match new.id {
            Some(id) => id,
            None => self.new_note_id(title.as_deref()),
        };
        let id = check_id(&id)?.to_string();
        let dir = match (new.dir, subdir) {
            (Some(dir), Some(sub)) => dir.join(sub),
            (Some(dir), None) => dir,
            (None, Some(sub)) => sub,
            (None, None) => self.default_note_dir(None),
        };
        let joined = dir.join(format!("{}.md", id));
        let path = self
            .vault
            .relative_path(&joined)
            .ok_or_else(|| Error::OutsideVault(normalize_path(&self.vault.root.join(&joined))))?;
        if self.vault.note_exists(&path) {
            return Err(Error::NoteAlreadyExists(path));
        }

        let mut note = Note::new(&path, &id);
        if let Some(ref title) = title {
            note.add_alias(title);
            note.body = format!("# {}\n", title);
        }
        if let Some(ref template) = new.template {
            let ctx = TemplateContext::new(title.clone(), Some(id.clone()));
            self.apply_template(&mut note, template, &ctx)?;
        }
        self.write_new_note(note)
    }

    /// The daily note for `date`, created if it does not exist yet.
    pub fn daily(&self, date: NaiveDate) -> Result<Note> {
        let daily = &self.config.daily_notes;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::Config(format!("invalid date {}", date)))?;
        let id = strftime(&midnight, &daily.date_format)
            .ok_or_else(|| Error::Config(format!("invalid date_format '{}'", daily.date_format)))?;
        let alias = strftime(&midnight, &daily.alias_format)
            .ok_or_else(|| Error::Config(format!("invalid alias_format '{}'", daily.alias_format)))?;

        let dir = daily.folder.clone().unwrap_or_default();
        let path = dir.join(format!("{}.md", id));
        if self.vault.note_exists(&path) {
            return self.vault.load_note_lenient(&path);
        }

        let mut note = Note::new(&path, &id);
        note.add_alias(&alias);
        for tag in &daily.default_tags {
            note.add_tag(tag);
        }
        note.body = format!("# {}\n", alias);
        if let Some(ref template) = daily.template {
            let now = date.and_time(Local::now().time());
            let ctx = TemplateContext::at(Some(alias.clone()), Some(id.clone()), now);
            self.apply_template(&mut note, template, &ctx)?;
        }
        self.write_new_note(note)
    }

    pub fn today(&self) -> Result<Note> {
        self.daily(Local::now().date_naive())
    }

    pub fn yesterday(&self) -> Result<Note> {
        self.daily(Local::now().date_naive() - Duration::days(1))
    }

    pub fn tomorrow(&self) -> Result<Note> {
        self.daily(Local::now().date_naive() + Duration::days(1))
    }

    /// Render a template by name.
    pub fn render_template(&self, name: &str, ctx: &TemplateContext) -> Result<String> {
        self.templates.render_named(name, ctx)
    }

    /// Text of the note at `relative_path` with a template inserted before
    /// line `line` (0-indexed, never inside the frontmatter).
    ///
    /// Fields from the template's own frontmatter are merged into the note's.
    pub fn insert_template(&self, name: &str, relative_path: &Path, line: usize) -> Result<String> {
        let text = self.vault.read_text(relative_path)?;
        let mut note = Note::from_text(relative_path, &text)?;
        let ctx = TemplateContext::new(note.title.clone(), Some(note.id.clone()));
        let rendered = Note::from_text(relative_path, &self.render_template(name, &ctx)?)?;

        let end = note.frontmatter_end_line.unwrap_or(0);
        let eol = line_ending(&text);
        let mut lines = text_lines(&text);
        let at = line.clamp(end, lines.len());
        let mut template_lines = text_lines(&rendered.body);
        // The body's final newline ends its last line rather than adding one.
        if template_lines.last() == Some(&"") {
            template_lines.pop();
        }
        lines.splice(at..at, template_lines);
        let inserted = lines.join(eol);

        if !rendered.has_frontmatter || !self.should_save_frontmatter(&note) {
            return Ok(inserted);
        }

        let body = note.body.clone();
        note.merge_template(rendered);
        note.body = body;
        let fm_lines = frontmatter_lines(&self.frontmatter_for(&note))?;
        Ok(replace_leading_lines(&inserted, end, &fm_lines))
    }

    fn apply_template(&self, note: &mut Note, name: &str, ctx: &TemplateContext) -> Result<()> {
        let rendered = self.render_template(name, ctx)?;
        let template = Note::from_text(note.path.clone(), &rendered)?;
        note.merge_template(template);
        Ok(())
    }

    fn write_new_note(&self, note: Note) -> Result<Note> {
        let text = if self.should_save_frontmatter(&note) {
            note.to_text(Some(&self.frontmatter_for(&note)))?
        } else {
            note.body.clone()
        };
        self.vault.create_note(&note.path, &text)
    }
}

/// Four random uppercase letters.
fn random_letters() -> String {
    uuid::Uuid::new_v4().as_bytes()[..4]
        .iter()
        .map(|b| char::from(b'A' + b % 26))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DailyNotesConfig, TemplatesConfig};
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn client_with(dir: &TempDir, config: Config) -> Client {
        ClientBuilder::new(config).dir(dir.path()).build().unwrap()
    }

    #[test]
    fn test_build_creates_folders() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            notes_subdir: Some(PathBuf::from("notes")),
            daily_notes: DailyNotesConfig {
                folder: Some(PathBuf::from("daily")),
                ..DailyNotesConfig::default()
            },
            ..Config::default()
        };
        client_with(&dir, config.clone());
        assert!(dir.path().join("notes").is_dir());
        assert!(dir.path().join("daily").is_dir());
        // Idempotent.
        client_with(&dir, config);
    }

    #[test]
    fn test_missing_vault_dir() {
        let result = ClientBuilder::new(Config::default())
            .dir("/no/such/vault/here")
            .build();
        assert!(matches!(result, Err(Error::VaultNotFound(_))));
    }

    #[test]
    fn test_should_save_policy() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        let mut config = Config::default();
        config.templates.folder = Some(PathBuf::from("templates"));
        config.frontmatter.exclude = vec!["archive/**".to_string()];
        let client = ClientBuilder::new(config)
            .dir(dir.path())
            .save_predicate(|note: &Note| !note.tags.iter().any(|t| t == "nofm"))
            .build()
            .unwrap();

        let plain = Note::new("n.md", "n");
        assert!(client.should_save_frontmatter(&plain));
        assert!(!client.should_save_frontmatter(&Note::new("templates/t.md", "t")));
        assert!(!client.should_save_frontmatter(&Note::new(dir.path().join("templates/t.md"), "t")));
        assert!(client.should_save_frontmatter(&Note::new("templates-archive/t.md", "t")));
        assert!(!client.should_save_frontmatter(&Note::new("archive/2020/x.md", "x")));
        assert!(!client.should_save_frontmatter(&Note::new("sub/README.md", "README")));

        let mut tagged = Note::new("n.md", "n");
        tagged.add_tag("nofm");
        assert!(!client.should_save_frontmatter(&tagged));
    }

    #[test]
    fn test_disabled_frontmatter() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.frontmatter.enabled = false;
        let client = client_with(&dir, config);
        assert!(!client.should_save_frontmatter(&Note::new("n.md", "n")));
    }

    #[test]
    fn test_create_note_with_title() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.note_id = NoteIdScheme::Title;
        config.notes_subdir = Some(PathBuf::from("notes"));
        let client = client_with(&dir, config);

        let note = client
            .create_note(NewNote {
                title: Some("My New Note".to_string()),
                ..NewNote::default()
            })
            .unwrap();
        assert_eq!(note.path, PathBuf::from("notes/my-new-note.md"));
        assert_eq!(
            fs::read_to_string(dir.path().join("notes/my-new-note.md")).unwrap(),
            "---\nid: my-new-note\naliases: [My New Note]\ntags: []\n---\n# My New Note\n"
        );

        let again = client.create_note(NewNote {
            title: Some("My New Note".to_string()),
            ..NewNote::default()
        });
        assert!(matches!(again, Err(Error::NoteAlreadyExists(_))));
    }

    #[test]
    fn test_create_note_title_with_dir() {
        let dir = TempDir::new().unwrap();
        let client = ClientBuilder::new(Config::default())
            .dir(dir.path())
            .note_id_func(|title: Option<&str>| format!("x-{}", title.unwrap_or("none").len()))
            .build()
            .unwrap();
        let note = client
            .create_note(NewNote {
                title: Some("projects/Big Plan".to_string()),
                ..NewNote::default()
            })
            .unwrap();
        assert_eq!(note.path, PathBuf::from("projects/x-8.md"));
        assert_eq!(note.aliases, vec!["Big Plan"]);
    }

    #[test]
    fn test_create_note_outside_vault_rejected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("vault");
        fs::create_dir_all(&root).unwrap();
        let client = ClientBuilder::new(Config::default()).dir(&root).build().unwrap();

        let escaped = client.create_note(NewNote {
            title: Some("../escaped/Note".to_string()),
            id: Some("evil".to_string()),
            ..NewNote::default()
        });
        assert!(matches!(escaped, Err(Error::OutsideVault(_))));
        assert!(!dir.path().join("escaped/evil.md").exists());

        let escaped = client.create_note(NewNote {
            title: Some("Note".to_string()),
            id: Some("evil".to_string()),
            dir: Some(PathBuf::from("a/../../escaped")),
            ..NewNote::default()
        });
        assert!(matches!(escaped, Err(Error::OutsideVault(_))));

        let escaped = client.create_note(NewNote {
            title: Some("Note".to_string()),
            id: Some("../evil".to_string()),
            ..NewNote::default()
        });
        assert!(matches!(escaped, Err(Error::InvalidNoteId(_))));
        assert!(!dir.path().join("evil.md").exists());

        // `..` that stays inside the vault is fine.
        let note = client
            .create_note(NewNote {
                title: Some("a/../kept/Note".to_string()),
                id: Some("kept".to_string()),
                ..NewNote::default()
            })
            .unwrap();
        assert_eq!(note.path, PathBuf::from("kept/kept.md"));
        assert!(root.join("kept/kept.md").is_file());
    }

    #[test]
    fn test_zettel_id() {
        let dir = TempDir::new().unwrap();
        let client = client_with(&dir, Config::default());

        let titled = client.new_note_id(Some("Hello World"));
        let (secs, suffix) = titled.split_once('-').unwrap();
        assert!(secs.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix, "hello-world");

        let untitled = client.new_note_id(None);
        let (_, letters) = untitled.split_once('-').unwrap();
        assert_eq!(letters.len(), 4);
        assert!(letters.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_daily_note() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.daily_notes.folder = Some(PathBuf::from("daily"));
        let client = client_with(&dir, config);

        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let note = client.daily(date).unwrap();
        assert_eq!(note.path, PathBuf::from("daily/2024-01-05.md"));
        assert_eq!(
            fs::read_to_string(dir.path().join("daily/2024-01-05.md")).unwrap(),
            "---\nid: 2024-01-05\naliases: [\"January 5, 2024\"]\ntags: [daily-notes]\n---\n# January 5, 2024\n"
        );

        // Existing notes are loaded, never overwritten.
        fs::write(dir.path().join("daily/2024-01-05.md"), "edited").unwrap();
        let again = client.daily(date).unwrap();
        assert_eq!(again.body, "edited");
    }

    #[test]
    fn test_daily_with_template() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("tpl")).unwrap();
        fs::write(dir.path().join("tpl/daily.md"), "# {{title}}\n\n## Log\n").unwrap();
        let config = Config {
            daily_notes: DailyNotesConfig {
                template: Some("daily".to_string()),
                ..DailyNotesConfig::default()
            },
            templates: TemplatesConfig {
                folder: Some(PathBuf::from("tpl")),
                ..TemplatesConfig::default()
            },
            ..Config::default()
        };
        let client = client_with(&dir, config);
        let note = client.daily(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        assert_eq!(note.body, "# February 29, 2024\n\n## Log\n");
    }

    #[test]
    fn test_insert_template() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(
            dir.path().join("templates/meeting.md"),
            "---\ntags: [meeting]\n---\n## Meeting {{id}}\n",
        )
        .unwrap();
        fs::write(dir.path().join("n.md"), "---\nid: n\n---\n# N\nend\n").unwrap();
        let mut config = Config::default();
        config.templates.folder = Some(PathBuf::from("templates"));
        let client = client_with(&dir, config);

        let text = client.insert_template("meeting", Path::new("n.md"), 4).unwrap();
        assert_eq!(
            text,
            "---\nid: n\naliases: []\ntags: [meeting]\n---\n# N\n## Meeting n\nend\n"
        );
    }

    #[test]
    fn test_insert_template_without_trailing_newline() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/todo.md"), "- [ ] {{id}}").unwrap();
        fs::write(dir.path().join("templates/blank.md"), "").unwrap();
        fs::write(dir.path().join("n.md"), "a\r\nb\r\n").unwrap();
        let mut config = Config::default();
        config.templates.folder = Some(PathBuf::from("templates"));
        let client = client_with(&dir, config);

        assert_eq!(
            client.insert_template("todo", Path::new("n.md"), 1).unwrap(),
            "a\r\n- [ ] n\r\nb\r\n"
        );
        assert_eq!(
            client.insert_template("blank", Path::new("n.md"), 1).unwrap(),
            "a\r\nb\r\n"
        );
    }

    #[test]
    fn test_sync_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "Body\n").unwrap();
        let client = client_with(&dir, Config::default());

        assert!(client.sync_file(Path::new("a.md"), true).unwrap().is_updated());
        assert_eq!(fs::read_to_string(dir.path().join("a.md")).unwrap(), "Body\n");

        assert!(client.sync_file(Path::new("a.md"), false).unwrap().is_updated());
        assert_eq!(
            client.sync_file(Path::new("a.md"), false).unwrap(),
            SyncOutcome::Unchanged
        );
    }
}
