//! Editor event dispatch.
//!
//! The host editor delivers discrete buffer events; each runs to completion
//! against an explicit [`Session`] before the next one is handled. Handlers
//! reach the editor only through the [`Host`] trait.

use crate::client::{Client, ClientBuilder, NewNote};
use crate::error::{Error, Result};
use crate::note::Note;
use crate::parser::text_lines;
use crate::sync::SyncOutcome;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Editor buffer handle.
pub type BufferId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BufferEntered {
        buffer: BufferId,
        path: PathBuf,
    },
    /// The buffer is about to be written; `text` is its current content.
    BufferWritePre {
        buffer: BufferId,
        path: PathBuf,
        text: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BufferEntered,
    BufferWritePre,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BufferEntered { .. } => EventKind::BufferEntered,
            Event::BufferWritePre { .. } => EventKind::BufferWritePre,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Event::BufferEntered { path, .. } | Event::BufferWritePre { path, .. } => path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
    Error,
}

/// What the core needs from the editor.
pub trait Host {
    /// Replace lines `[start, end)` of a buffer in one step.
    fn replace_lines(&mut self, buffer: BufferId, start: usize, end: usize, lines: &[String]) -> Result<()>;

    /// Show a message to the user.
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Mutable state shared by event handlers.
#[derive(Debug, Default)]
pub struct Session {
    client: Option<Client>,
    current_note: Option<PathBuf>,
}

impl Session {
    /// A session with no client yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client: Some(client),
            current_note: None,
        }
    }

    /// Build and install the client, replacing any previous one.
    pub fn setup(&mut self, builder: ClientBuilder) -> Result<()> {
        self.client = Some(builder.build()?);
        self.current_note = None;
        Ok(())
    }

    /// The active client; using a session before setup is a usage error.
    pub fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(Error::NoActiveClient)
    }

    /// Absolute path of the note most recently entered.
    pub fn current_note(&self) -> Option<&Path> {
        self.current_note.as_deref()
    }

    /// Create a note, placing it next to the current note when configured so.
    pub fn create_note(&self, mut new: NewNote) -> Result<Note> {
        let client = self.client()?;
        if new.dir.is_none() {
            new.dir = Some(client.default_note_dir(self.current_note()));
        }
        client.create_note(new)
    }
}

pub type Handler = fn(&mut Session, &Event, &mut dyn Host) -> Result<()>;

/// Handler table keyed by event kind.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<EventKind, Vec<Handler>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.handlers.iter().map(|(k, v)| (k, v.len())).collect();
        f.debug_struct("Dispatcher").field("handlers", &counts).finish()
    }
}

impl Dispatcher {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in handlers registered.
    pub fn with_defaults() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(EventKind::BufferEntered, on_buffer_entered);
        dispatcher.register(EventKind::BufferWritePre, on_buffer_write_pre);
        dispatcher
    }

    pub fn register(&mut self, kind: EventKind, handler: Handler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Run every handler for the event in registration order, stopping at
    /// the first error. Fatal errors are also shown to the user.
    pub fn dispatch(&self, session: &mut Session, event: &Event, host: &mut dyn Host) -> Result<()> {
        let Some(handlers) = self.handlers.get(&event.kind()) else {
            return Ok(());
        };
        for handler in handlers {
            if let Err(e) = handler(&mut *session, event, &mut *host) {
                if e.is_fatal() {
                    host.notify(NoticeLevel::Error, &e.to_string());
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Remember the entered note.
pub fn on_buffer_entered(session: &mut Session, event: &Event, _host: &mut dyn Host) -> Result<()> {
    let Event::BufferEntered { path, .. } = event else {
        return Ok(());
    };
    let client = session.client()?;
    if !is_note_path(path) || !client.vault().contains(path) {
        tracing::debug!(path = %path.display(), "ignoring buffer outside vault");
        return Ok(());
    }
    let absolute = client.vault().note_path(&client.vault().relative_path(path).unwrap_or_default());
    session.current_note = Some(absolute);
    Ok(())
}

/// Bring the buffer's frontmatter up to date before it is written.
pub fn on_buffer_write_pre(session: &mut Session, event: &Event, host: &mut dyn Host) -> Result<()> {
    let Event::BufferWritePre { buffer, path, text } = event else {
        return Ok(());
    };
    let client = session.client()?;
    let Some(relative) = client.vault().relative_path(path).filter(|_| is_note_path(path)) else {
        tracing::debug!(path = %path.display(), "ignoring write outside vault");
        return Ok(());
    };

    match client.sync_text(&relative, text) {
        Ok(SyncOutcome::Updated(edit)) => {
            host.replace_lines(*buffer, edit.start, edit.end, &edit.lines)?;
            host.notify(NoticeLevel::Info, "Updated frontmatter");
            tracing::info!(path = %relative.display(), "updated frontmatter");
            Ok(())
        }
        Ok(outcome) => {
            tracing::debug!(path = %relative.display(), ?outcome, "frontmatter left as is");
            Ok(())
        }
        Err(e @ Error::InvalidFrontmatter { .. }) => {
            tracing::warn!(path = %relative.display(), error = %e, "not updating frontmatter");
            host.notify(NoticeLevel::Warn, &e.to_string());
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn is_note_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Reference [`Host`]: buffers as line vectors plus a notice log.
///
/// Useful for embedding the core without an editor (batch tools, servers)
/// and for exercising handlers in tests. Editor integrations implement
/// [`Host`] over their own buffer API instead.
///
/// ```
/// use obsidian::config::Config;
/// use obsidian::events::{Dispatcher, Event, MemoryHost, Session};
/// use obsidian::ClientBuilder;
///
/// let dir = tempfile::TempDir::new().unwrap();
/// let mut session = Session::new();
/// session.setup(ClientBuilder::new(Config::default()).dir(dir.path())).unwrap();
///
/// let mut host = MemoryHost::new();
/// host.open(1, "# A");
/// let event = Event::BufferWritePre {
///     buffer: 1,
///     path: dir.path().join("a.md"),
///     text: host.text(1).unwrap(),
/// };
/// Dispatcher::with_defaults().dispatch(&mut session, &event, &mut host).unwrap();
/// assert_eq!(host.text(1).unwrap(), "---\nid: a\naliases: []\ntags: []\n---\n# A");
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    pub buffers: HashMap<BufferId, Vec<String>>,
    pub notices: Vec<(NoticeLevel, String)>,
    /// Number of `replace_lines` calls made.
    pub replacements: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a buffer with the given text.
    pub fn open(&mut self, buffer: BufferId, text: &str) {
        let lines = text_lines(text).into_iter().map(str::to_string).collect();
        self.buffers.insert(buffer, lines);
    }

    /// Current text of a buffer.
    pub fn text(&self, buffer: BufferId) -> Option<String> {
        self.buffers.get(&buffer).map(|lines| lines.join("\n"))
    }
}

impl Host for MemoryHost {
    fn replace_lines(&mut self, buffer: BufferId, start: usize, end: usize, lines: &[String]) -> Result<()> {
        let current = self
            .buffers
            .get_mut(&buffer)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, format!("unknown buffer {}", buffer))
            })?;
        let end = end.min(current.len());
        let start = start.min(end);
        current.splice(start..end, lines.iter().cloned());
        self.replacements += 1;
        Ok(())
    }

    fn notify(&mut self, level: NoticeLevel, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}
