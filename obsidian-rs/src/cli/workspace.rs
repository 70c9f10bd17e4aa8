//! Workspace command implementation.

use crate::cli::output::Output;
use crate::client::Client;
use crate::config::{DailyNotesConfig, FrontmatterConfig, NewNotesLocation, NoteIdScheme, TemplatesConfig};
use crate::error::Result;
use serde::Serialize;
use std::path::Path;

/// Output for the workspace command.
#[derive(Debug, Serialize)]
pub struct WorkspaceOutput<'a> {
    pub name: &'a str,
    pub root: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_subdir: Option<&'a Path>,
    pub new_notes_location: NewNotesLocation,
    pub note_id: NoteIdScheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<&'a Path>,
    pub daily_notes: &'a DailyNotesConfig,
    pub templates: &'a TemplatesConfig,
    pub frontmatter: &'a FrontmatterConfig,
}

/// Show the active workspace with its effective settings.
pub fn run(client: &Client, output: &Output) -> Result<()> {
    let config = client.config();
    let result = WorkspaceOutput {
        name: &client.workspace().name,
        root: &client.vault().root,
        notes_subdir: config.notes_subdir.as_deref(),
        new_notes_location: config.new_notes_location,
        note_id: config.note_id,
        templates_dir: client.templates().classifier().dir(),
        daily_notes: &config.daily_notes,
        templates: &config.templates,
        frontmatter: &config.frontmatter,
    };
    output.print(&result)
}
