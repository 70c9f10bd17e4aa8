//! Template listing and rendering commands.

use crate::cli::args::TemplateArgs;
use crate::cli::output::Output;
use crate::client::Client;
use crate::error::Result;
use crate::templates::TemplateContext;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output for the templates command.
#[derive(Debug, Serialize)]
pub struct TemplatesOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<&'a Path>,
    pub templates: Vec<PathBuf>,
}

pub fn list(client: &Client, output: &Output) -> Result<()> {
    let templates = client.templates().list()?;
    output.print(&TemplatesOutput {
        folder: client.templates().classifier().dir(),
        templates,
    })
}

/// Render a template to stdout.
pub fn render(client: &Client, args: &TemplateArgs, output: &Output) -> Result<()> {
    let id = args.title.as_deref().map(|title| client.new_note_id(Some(title)));
    let ctx = TemplateContext::new(args.title.clone(), id);
    let text = client.render_template(&args.name, &ctx)?;
    output.print_raw(&text);
    Ok(())
}
