//! Template folder membership, lookup and placeholder rendering.

use crate::config::TemplatesConfig;
use crate::error::{Error, Result};
use crate::workspace::normalize_path;
use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

// {{name}} or {{name:argument}}
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_-]+)(?::([^}]*))?\s*\}\}").unwrap()
});

/// A computed substitution, evaluated on every render.
pub type SubstitutionFn = Arc<dyn Fn(&TemplateContext) -> String + Send + Sync>;

/// Values available to placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateContext {
    pub title: Option<String>,
    pub id: Option<String>,
    pub now: NaiveDateTime,
}

impl TemplateContext {
    pub fn new(title: Option<String>, id: Option<String>) -> Self {
        Self::at(title, id, Local::now().naive_local())
    }

    pub fn at(title: Option<String>, id: Option<String>, now: NaiveDateTime) -> Self {
        Self { title, id, now }
    }
}

/// Decides whether a path lies inside the templates folder.
///
/// The folder path is regex-escaped and must be followed by a separator, so
/// `templates-archive/` never matches `templates` and folder names with
/// metacharacters match literally.
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    root: PathBuf,
    dir: Option<PathBuf>,
    pattern: Option<Regex>,
}

impl TemplateClassifier {
    /// Build a classifier for `folder` (vault-relative or absolute).
    ///
    /// A configured folder that does not exist disables classification.
    pub fn new(vault_root: &Path, folder: Option<&Path>) -> Self {
        let disabled = Self {
            root: vault_root.to_path_buf(),
            dir: None,
            pattern: None,
        };
        let Some(folder) = folder else {
            return disabled;
        };

        let dir = normalize_path(&vault_root.join(folder));
        if !dir.is_dir() {
            tracing::warn!(
                path = %dir.display(),
                "templates folder does not exist, template features disabled"
            );
            return disabled;
        }

        let prefix = path_key(&dir);
        let pattern = format!("^{}/", regex::escape(prefix.trim_end_matches('/')));
        match Regex::new(&pattern) {
            Ok(pattern) => Self {
                root: vault_root.to_path_buf(),
                dir: Some(dir),
                pattern: Some(pattern),
            },
            Err(e) => {
                tracing::warn!(error = %e, "cannot build templates matcher");
                disabled
            }
        }
    }

    /// Absolute templates folder, when enabled.
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Whether `path` (absolute or vault-relative) is strictly inside the folder.
    pub fn is_template(&self, path: &Path) -> bool {
        let Some(ref pattern) = self.pattern else {
            return false;
        };
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        pattern.is_match(&path_key(&normalize_path(&full)))
    }
}

/// Forward-slash string form of a path, for matching.
fn path_key(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Template lookup and rendering for one vault.
#[derive(Clone)]
pub struct Templates {
    classifier: TemplateClassifier,
    config: TemplatesConfig,
    dynamic: BTreeMap<String, SubstitutionFn>,
}

impl fmt::Debug for Templates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Templates")
            .field("classifier", &self.classifier)
            .field("config", &self.config)
            .field("dynamic", &self.dynamic.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Templates {
    pub fn new(
        vault_root: &Path,
        config: TemplatesConfig,
        dynamic: BTreeMap<String, SubstitutionFn>,
    ) -> Self {
        let classifier = TemplateClassifier::new(vault_root, config.folder.as_deref());
        Self {
            classifier,
            config,
            dynamic,
        }
    }

    pub fn classifier(&self) -> &TemplateClassifier {
        &self.classifier
    }

    pub fn is_template(&self, path: &Path) -> bool {
        self.classifier.is_template(path)
    }

    /// Template files, relative to the templates folder, sorted.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let dir = self.classifier.dir().ok_or(Error::TemplatesDisabled)?;
        let root = glob::Pattern::escape(&dir.to_string_lossy());
        let pattern = format!("{}/**/*", root.trim_end_matches('/'));

        let mut templates = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => {
                    if let Ok(relative) = path.strip_prefix(dir) {
                        if !relative
                            .components()
                            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
                        {
                            templates.push(relative.to_path_buf());
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "glob error while listing templates"),
            }
        }
        templates.sort();
        Ok(templates)
    }

    /// Absolute path of a template, by name with or without `.md`.
    pub fn find(&self, name: &str) -> Result<PathBuf> {
        let dir = self.classifier.dir().ok_or(Error::TemplatesDisabled)?;
        let name = name.trim();
        let direct = dir.join(name);
        if direct.is_file() {
            return Ok(direct);
        }
        let with_ext = dir.join(format!("{}.md", name));
        if with_ext.is_file() {
            return Ok(with_ext);
        }
        Err(Error::TemplateNotFound(name.to_string()))
    }

    /// Load and render a template by name.
    pub fn render_named(&self, name: &str, ctx: &TemplateContext) -> Result<String> {
        let path = self.find(name)?;
        let text = std::fs::read_to_string(&path)?;
        Ok(self.render(&text, ctx))
    }

    /// Replace placeholders in `text`. Unknown placeholders are left as written.
    pub fn render(&self, text: &str, ctx: &TemplateContext) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &regex::Captures| {
                let whole = caps.get(0).map_or("", |m| m.as_str());
                let name = caps.get(1).map_or("", |m| m.as_str());
                let arg = caps.get(2).map(|m| m.as_str().trim());
                self.substitute(name, arg, ctx)
                    .unwrap_or_else(|| whole.to_string())
            })
            .into_owned()
    }

    fn substitute(&self, name: &str, arg: Option<&str>, ctx: &TemplateContext) -> Option<String> {
        match name {
            "title" => Some(ctx.title.clone().unwrap_or_default()),
            "id" => Some(ctx.id.clone().unwrap_or_default()),
            "date" => strftime(&ctx.now, arg.unwrap_or(&self.config.date_format)),
            "time" => strftime(&ctx.now, arg.unwrap_or(&self.config.time_format)),
            _ => {
                if let Some(value) = self.config.substitutions.get(name) {
                    return Some(value.clone());
                }
                self.dynamic.get(name).map(|f| f(ctx))
            }
        }
    }
}

/// Format with a user-supplied strftime string; `None` if the format is invalid.
pub fn strftime(dt: &NaiveDateTime, format: &str) -> Option<String> {
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        tracing::warn!(format, "invalid date format");
        return None;
    }
    Some(dt.format_with_items(items.iter()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn at_noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn templates_in(dir: &TempDir, folder: &str) -> Templates {
        fs::create_dir_all(dir.path().join(folder)).unwrap();
        let config = TemplatesConfig {
            folder: Some(PathBuf::from(folder)),
            ..TemplatesConfig::default()
        };
        Templates::new(dir.path(), config, BTreeMap::new())
    }

    #[test]
    fn test_no_folder_never_matches() {
        let dir = TempDir::new().unwrap();
        let classifier = TemplateClassifier::new(dir.path(), None);
        assert!(!classifier.is_template(Path::new("templates/a.md")));
        assert!(!classifier.is_template(&dir.path().join("a.md")));
    }

    #[test]
    fn test_missing_folder_disables() {
        let dir = TempDir::new().unwrap();
        let classifier = TemplateClassifier::new(dir.path(), Some(Path::new("templates")));
        assert!(classifier.dir().is_none());
        assert!(!classifier.is_template(Path::new("templates/a.md")));
    }

    #[test]
    fn test_inside_and_sibling() {
        let dir = TempDir::new().unwrap();
        let templates = templates_in(&dir, "templates");
        assert!(templates.is_template(Path::new("templates/daily.md")));
        assert!(templates.is_template(&dir.path().join("templates/sub/x.md")));
        assert!(!templates.is_template(Path::new("templates-archive/daily.md")));
        assert!(!templates.is_template(Path::new("templates")));
        assert!(!templates.is_template(Path::new("notes/templates.md")));
    }

    #[test]
    fn test_metacharacter_folder() {
        let dir = TempDir::new().unwrap();
        let templates = templates_in(&dir, "tpl (v1)[a]+.*");
        assert!(templates.is_template(Path::new("tpl (v1)[a]+.*/x.md")));
        assert!(!templates.is_template(Path::new("tpl (v1)a+.x/x.md")));
        assert!(!templates.is_template(Path::new("tpl v1a/x.md")));
    }

    #[test]
    fn test_render_placeholders() {
        let dir = TempDir::new().unwrap();
        let mut config = TemplatesConfig::default();
        config.substitutions.insert("author".to_string(), "Ann".to_string());
        let mut dynamic: BTreeMap<String, SubstitutionFn> = BTreeMap::new();
        dynamic.insert(
            "shout".to_string(),
            Arc::new(|ctx: &TemplateContext| ctx.title.clone().unwrap_or_default().to_uppercase()),
        );
        let templates = Templates::new(dir.path(), config, dynamic);
        let ctx = TemplateContext::at(Some("Hello".to_string()), Some("h1".to_string()), at_noon());

        let out = templates.render(
            "# {{title}} ({{ id }})\n{{date}} {{time}} {{date:%d/%m}}\n{{author}} {{shout}} {{unknown}}",
            &ctx,
        );
        assert_eq!(out, "# Hello (h1)\n2024-03-05 12:30 05/03\nAnn HELLO {{unknown}}");
    }

    #[test]
    fn test_invalid_date_format_left_as_written() {
        let dir = TempDir::new().unwrap();
        let templates = Templates::new(dir.path(), TemplatesConfig::default(), BTreeMap::new());
        let ctx = TemplateContext::at(None, None, at_noon());
        assert_eq!(templates.render("{{date:%Q}}", &ctx), "{{date:%Q}}");
    }

    #[test]
    fn test_list_and_find() {
        let dir = TempDir::new().unwrap();
        let templates = templates_in(&dir, "templates");
        fs::write(dir.path().join("templates/daily.md"), "# {{title}}").unwrap();
        fs::create_dir_all(dir.path().join("templates/meetings")).unwrap();
        fs::write(dir.path().join("templates/meetings/standup.md"), "x").unwrap();

        assert_eq!(
            templates.list().unwrap(),
            vec![PathBuf::from("daily.md"), PathBuf::from("meetings/standup.md")]
        );
        assert!(templates.find("daily").is_ok());
        assert!(templates.find("daily.md").is_ok());
        assert!(matches!(templates.find("nope"), Err(Error::TemplateNotFound(_))));

        let ctx = TemplateContext::at(Some("T".to_string()), None, at_noon());
        assert_eq!(templates.render_named("daily", &ctx).unwrap(), "# T");
    }

    #[test]
    fn test_disabled_lookup() {
        let dir = TempDir::new().unwrap();
        let templates = Templates::new(dir.path(), TemplatesConfig::default(), BTreeMap::new());
        assert!(matches!(templates.list(), Err(Error::TemplatesDisabled)));
        assert!(matches!(templates.find("x"), Err(Error::TemplatesDisabled)));
    }
}
