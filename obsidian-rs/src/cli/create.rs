//! Note creation and daily note commands.

use crate::cli::args::NewArgs;
use crate::cli::output::Output;
use crate::client::{Client, NewNote};
use crate::error::Result;
use crate::note::Note;
use serde::Serialize;
use std::path::PathBuf;

/// Summary of a created or opened note.
#[derive(Debug, Serialize)]
pub struct NoteOutput {
    pub path: PathBuf,
    pub absolute_path: PathBuf,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
}

impl NoteOutput {
    pub fn new(client: &Client, note: Note) -> Self {
        Self {
            absolute_path: client.vault().note_path(&note.path),
            path: note.path,
            id: note.id,
            title: note.title,
            aliases: note.aliases,
            tags: note.tags,
        }
    }
}

/// Create a new note.
pub fn new_note(client: &Client, args: &NewArgs, output: &Output) -> Result<()> {
    let note = client.create_note(NewNote {
        title: Some(args.title.clone()),
        id: args.id.clone(),
        dir: args.dir.clone(),
        template: args.template.clone(),
    })?;
    output.info(&format!("Created {}", note.path.display()));
    output.print(&NoteOutput::new(client, note))
}

/// Which daily note to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Day {
    Today,
    Yesterday,
    Tomorrow,
}

/// Open the daily note for `day`, creating it when missing.
pub fn daily(client: &Client, day: Day, output: &Output) -> Result<()> {
    let note = match day {
        Day::Today => client.today()?,
        Day::Yesterday => client.yesterday()?,
        Day::Tomorrow => client.tomorrow()?,
    };
    output.print(&NoteOutput::new(client, note))
}
