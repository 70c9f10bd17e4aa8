//! Choosing the active vault root among configured workspaces.

use crate::config::{expand_home, WorkspaceOverrides, WorkspaceSpec};
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// The workspace a client is bound to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Workspace {
    pub name: String,
    pub root: PathBuf,
    #[serde(skip)]
    pub overrides: WorkspaceOverrides,
}

impl Workspace {
    fn from_spec(spec: &WorkspaceSpec, cwd: &Path) -> Self {
        Self {
            name: spec.name.clone(),
            root: absolute(&spec.path, cwd),
            overrides: spec.overrides.clone(),
        }
    }

    /// An ad-hoc workspace for a bare directory.
    pub fn from_dir(dir: &Path) -> Self {
        let name = dir
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("vault")
            .to_string();
        Self {
            name,
            root: dir.to_path_buf(),
            overrides: WorkspaceOverrides::default(),
        }
    }
}

/// Select the active workspace.
///
/// Precedence: explicit directory, named workspace, the first workspace whose
/// root contains `cwd`, then the first configured workspace.
pub fn resolve_workspace(
    specs: &[WorkspaceSpec],
    cwd: &Path,
    dir_override: Option<&Path>,
    name_override: Option<&str>,
) -> Result<Workspace> {
    let cwd = normalize_path(cwd);
    let candidates: Vec<Workspace> = specs.iter().map(|s| Workspace::from_spec(s, &cwd)).collect();

    if let Some(dir) = dir_override {
        let root = absolute(dir, &cwd);
        // A directory that is a configured root keeps that workspace's name and overrides.
        let workspace = candidates
            .into_iter()
            .find(|ws| ws.root == root)
            .unwrap_or_else(|| Workspace::from_dir(&root));
        tracing::debug!(name = %workspace.name, root = %workspace.root.display(), "workspace from directory");
        return Ok(workspace);
    }

    if let Some(name) = name_override {
        return candidates
            .into_iter()
            .find(|ws| ws.name == name)
            .ok_or_else(|| Error::WorkspaceNotFound(name.to_string()));
    }

    if let Some(ws) = candidates.iter().find(|ws| cwd.starts_with(&ws.root)) {
        tracing::debug!(name = %ws.name, cwd = %cwd.display(), "workspace contains cwd");
        return Ok(ws.clone());
    }

    let first = candidates.into_iter().next().ok_or(Error::NoWorkspace)?;
    tracing::debug!(name = %first.name, "falling back to first workspace");
    Ok(first)
}

/// Expand `~` and make `path` absolute against `base`, then normalize.
pub fn absolute(path: &Path, base: &Path) -> PathBuf {
    let expanded = expand_home(path);
    if expanded.is_absolute() {
        normalize_path(&expanded)
    } else {
        normalize_path(&base.join(expanded))
    }
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
