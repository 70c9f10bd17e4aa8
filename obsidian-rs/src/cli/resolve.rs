//! Resolve command implementation.

use crate::cli::args::QueryArgs;
use crate::cli::output::Output;
use crate::client::Client;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<PathBuf>,
}

pub fn run(client: &Client, args: &QueryArgs, output: &Output) -> Result<()> {
    match client.resolve_note(&args.query) {
        Ok(note) => output.print(&ResolveResponse {
            query: args.query.clone(),
            resolved: Some(note.path),
            id: Some(note.id),
            matches: Vec::new(),
        }),
        Err(Error::AmbiguousResolution { query, count, matches }) => {
            // Print the candidates, then fail with the ambiguity.
            output.print(&ResolveResponse {
                query: query.clone(),
                resolved: None,
                id: None,
                matches: matches.clone(),
            })?;
            Err(Error::AmbiguousResolution { query, count, matches })
        }
        Err(e) => Err(e),
    }
}
