//! CLI command implementations.

pub mod args;
pub mod output;

pub mod create;
pub mod links;
pub mod rename;
pub mod resolve;
pub mod sync;
pub mod templates;
pub mod workspace;

pub use args::{Cli, Commands};
pub use output::Output;

use crate::client::Client;
use crate::error::{Error, Result};
use crate::workspace::absolute;
use std::path::{Path, PathBuf};

/// Vault-relative path for a note named on the command line.
///
/// An existing file relative to the working directory wins; otherwise the
/// path is taken as vault-relative, with `.md` added when missing.
pub fn note_path_arg(client: &Client, path: &Path) -> Result<PathBuf> {
    let vault = client.vault();
    let on_disk = absolute(path, &std::env::current_dir()?);
    if on_disk.is_file() {
        return vault
            .relative_path(&on_disk)
            .ok_or(Error::OutsideVault(on_disk));
    }
    let relative = vault
        .relative_path(path)
        .ok_or_else(|| Error::OutsideVault(path.to_path_buf()))?;
    Ok(vault.normalize_note_path(&relative.to_string_lossy()))
}
