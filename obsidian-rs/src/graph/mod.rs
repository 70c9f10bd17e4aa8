//! Link resolution, backlinks and link-preserving renames.

mod link_index;
pub mod rename;
pub mod resolution;

pub use link_index::{Backlink, LinkIndex, OutgoingLink};
pub use rename::{rename_note, FileEdit, LinkChange, RenamePlan};
pub use resolution::NoteCatalog;
