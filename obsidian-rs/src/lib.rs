//! obsidian - notes, frontmatter and backlinks for Markdown vaults.
//!
//! # Overview
//!
//! A vault is a directory of Markdown notes. This crate provides:
//! - Note parsing: frontmatter block, id, aliases, tags, title, links
//! - A deterministic YAML frontmatter codec
//! - Frontmatter synchronization on save, with exclusion policy
//! - Workspace selection, templates, daily notes and note creation
//! - Link resolution, backlinks and link-preserving renames
//! - Editor event dispatch through an explicit [`events::Session`]
//!
//! # Example
//!
//! ```no_run
//! use obsidian::{ClientBuilder, Config};
//! use std::path::Path;
//!
//! let client = ClientBuilder::new(Config::default())
//!     .dir("/path/to/vault")
//!     .build()
//!     .unwrap();
//!
//! let outcome = client.sync_file(Path::new("notes/idea.md"), true).unwrap();
//! println!("{:?}", outcome);
//!
//! let index = client.link_index().unwrap();
//! for backlink in index.backlinks(Path::new("notes/idea.md")) {
//!     println!("{} -> line {}", backlink.source.display(), backlink.link.line);
//! }
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod note;
pub mod parser;
pub mod sync;
pub mod templates;
pub mod types;
pub mod vault;
pub mod workspace;

// Re-export main types at crate root
pub use client::{Client, ClientBuilder, NewNote};
pub use config::Config;
pub use error::{Error, Result};
pub use events::{Dispatcher, Event, Host, Session};
pub use note::Note;
pub use sync::{FrontmatterEdit, SyncOutcome};
pub use types::*;
pub use vault::Vault;
pub use workspace::Workspace;
