//! Link, backlink and unresolved-link commands.

use crate::cli::args::QueryArgs;
use crate::cli::output::Output;
use crate::client::Client;
use crate::error::{ExitCode, Result};
use crate::graph::{Backlink, OutgoingLink};
use serde::Serialize;
use std::path::PathBuf;

/// Output for the links command.
#[derive(Debug, Serialize)]
pub struct LinksOutput<'a> {
    pub path: PathBuf,
    pub links: &'a [OutgoingLink],
}

/// Output for the backlinks command.
#[derive(Debug, Serialize)]
pub struct BacklinksOutput {
    pub path: PathBuf,
    pub count: usize,
    pub backlinks: Vec<Backlink>,
}

/// A link target that matches no note.
#[derive(Debug, Serialize)]
pub struct UnresolvedTarget {
    pub target: String,
    pub sources: Vec<PathBuf>,
}

/// Output for the check command.
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub count: usize,
    pub unresolved: Vec<UnresolvedTarget>,
}

/// Outgoing links of a note.
pub fn links(client: &Client, args: &QueryArgs, output: &Output) -> Result<()> {
    let index = client.link_index()?;
    let path = index.catalog().resolve(&args.query)?.path.clone();
    let result = LinksOutput {
        links: index.outgoing(&path),
        path,
    };
    output.print(&result)
}

/// Notes linking to a note.
pub fn backlinks(client: &Client, args: &QueryArgs, output: &Output) -> Result<()> {
    let index = client.link_index()?;
    let path = index.catalog().resolve(&args.query)?.path.clone();
    let backlinks = index.backlinks(&path);
    output.print(&BacklinksOutput {
        path,
        count: backlinks.len(),
        backlinks,
    })
}

/// Report unresolved link targets. Fails with a distinct exit code if any exist.
pub fn check(client: &Client, output: &Output) -> Result<ExitCode> {
    let index = client.link_index()?;
    let unresolved: Vec<UnresolvedTarget> = index
        .unresolved()
        .iter()
        .map(|(target, sources)| UnresolvedTarget {
            target: target.clone(),
            sources: sources.iter().cloned().collect(),
        })
        .collect();

    let count = unresolved.len();
    output.print(&CheckOutput { count, unresolved })?;

    if count == 0 {
        Ok(ExitCode::Success)
    } else {
        output.warn(&format!("{} unresolved link target(s)", count));
        Ok(ExitCode::UnresolvedLinksFound)
    }
}
