//! Sync command implementation.

use crate::cli::args::SyncArgs;
use crate::cli::note_path_arg;
use crate::cli::output::Output;
use crate::client::Client;
use crate::error::Result;
use crate::sync::SyncOutcome;
use serde::Serialize;
use std::path::PathBuf;

/// Output for the sync command.
#[derive(Debug, Serialize)]
pub struct SyncOutput {
    pub path: PathBuf,
    pub dry_run: bool,
    #[serde(flatten)]
    pub outcome: SyncOutcome,
}

pub fn run(client: &Client, args: &SyncArgs, output: &Output) -> Result<()> {
    let path = note_path_arg(client, &args.path)?;
    let outcome = client.sync_file(&path, args.dry_run)?;

    match (&outcome, args.dry_run) {
        (SyncOutcome::Updated(_), true) => output.info(&format!("Would update frontmatter of {}", path.display())),
        (SyncOutcome::Updated(_), false) => output.info(&format!("Updated frontmatter of {}", path.display())),
        (SyncOutcome::Unchanged, _) => output.info("Frontmatter already up to date"),
        (SyncOutcome::Skipped, _) => output.info("Frontmatter is not managed for this note"),
    }

    output.print(&SyncOutput {
        path,
        dry_run: args.dry_run,
        outcome,
    })
}
