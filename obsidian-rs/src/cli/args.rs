//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "obsidian")]
#[command(author, version, about = "Frontmatter, links and daily notes for Markdown vaults", long_about = None)]
pub struct Cli {
    /// Vault directory (overrides configured workspaces)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Name of a configured workspace to use
    #[arg(short, long, global = true, conflicts_with = "vault")]
    pub workspace: Option<String>,

    /// Config file (defaults to ~/.config/obsidian/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output as JSON (default)
    #[arg(long, global = true, conflicts_with_all = ["yaml", "toml"])]
    pub json: bool,

    /// Output as YAML
    #[arg(long, global = true, conflicts_with_all = ["json", "toml"])]
    pub yaml: bool,

    /// Output as TOML
    #[arg(long, global = true, conflicts_with_all = ["json", "yaml"])]
    pub toml: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.yaml {
            OutputFormat::Yaml
        } else if self.toml {
            OutputFormat::Toml
        } else {
            OutputFormat::Json
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the active workspace and effective settings
    Workspace,

    /// Bring a note's frontmatter in line with its canonical form
    Sync(SyncArgs),

    /// Create a new note
    New(NewArgs),

    /// Open (or create) today's daily note
    Today,

    /// Open (or create) yesterday's daily note
    Yesterday,

    /// Open (or create) tomorrow's daily note
    Tomorrow,

    /// Resolve a path, id, file name or alias to a note
    Resolve(QueryArgs),

    /// Outgoing links of a note
    Links(QueryArgs),

    /// Notes linking to a note
    Backlinks(QueryArgs),

    /// Report links that resolve to no note
    Check,

    /// List available templates
    Templates,

    /// Render a template
    Template(TemplateArgs),

    /// Rename a note and rewrite links to it
    Rename(RenameArgs),
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Note path (relative to the vault or absolute)
    pub path: PathBuf,

    /// Show the new frontmatter without writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Note title; `dir/title` places the note in `dir`
    pub title: String,

    /// Explicit note id (file stem)
    #[arg(long)]
    pub id: Option<String>,

    /// Vault-relative directory for the note
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Template to apply
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Path, id, file name or alias
    pub query: String,
}

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template name (with or without .md)
    pub name: String,

    /// Value for {{title}}
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Note to rename
    pub query: String,

    /// New id (and file stem)
    pub new_id: String,

    /// Show what would change without modifying files
    #[arg(long)]
    pub dry_run: bool,
}
