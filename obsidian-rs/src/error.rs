//! Error types and exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes returned by the `obsidian` binary.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const NOTE_ALREADY_EXISTS: i32 = 3;
    pub const AMBIGUOUS_RESOLUTION: i32 = 4;
    pub const INVALID_FRONTMATTER: i32 = 5;
    pub const NO_ACTIVE_CLIENT: i32 = 6;
    pub const UNRESOLVED_LINKS_FOUND: i32 = 10;
}

/// Main error type for vault operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Vault not found: {0}")]
    VaultNotFound(PathBuf),

    #[error("Note not found: {0}")]
    NoteNotFound(PathBuf),

    #[error("Note already exists: {0}")]
    NoteAlreadyExists(PathBuf),

    #[error("Ambiguous resolution: {count} notes match '{query}'")]
    AmbiguousResolution {
        query: String,
        count: usize,
        matches: Vec<PathBuf>,
    },

    /// A leading `---` block exists but cannot be decoded.
    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Frontmatter cannot be serialized: {0}")]
    UnsupportedValue(String),

    #[error("No active client: setup has not completed")]
    NoActiveClient,

    #[error("No workspace configured and no vault directory given")]
    NoWorkspace,

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Templates folder is not configured or does not exist")]
    TemplatesDisabled,

    #[error("Invalid note id: '{0}'")]
    InvalidNoteId(String),

    #[error("Path is outside the vault: {0}")]
    OutsideVault(PathBuf),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl Error {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::NoteNotFound(_) | Error::TemplateNotFound(_) => exit_code::NOTE_NOT_FOUND,
            Error::NoteAlreadyExists(_) => exit_code::NOTE_ALREADY_EXISTS,
            Error::AmbiguousResolution { .. } => exit_code::AMBIGUOUS_RESOLUTION,
            Error::InvalidFrontmatter { .. } => exit_code::INVALID_FRONTMATTER,
            Error::NoActiveClient
            | Error::NoWorkspace
            | Error::WorkspaceNotFound(_)
            | Error::VaultNotFound(_) => {
                exit_code::NO_ACTIVE_CLIENT
            }
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether the error indicates a usage bug rather than a runtime condition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::NoActiveClient)
    }
}

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
    NoteNotFound,
    NoteAlreadyExists,
    AmbiguousResolution,
    InvalidFrontmatter,
    NoActiveClient,
    UnresolvedLinksFound,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
            ExitCode::NoteNotFound => exit_code::NOTE_NOT_FOUND,
            ExitCode::NoteAlreadyExists => exit_code::NOTE_ALREADY_EXISTS,
            ExitCode::AmbiguousResolution => exit_code::AMBIGUOUS_RESOLUTION,
            ExitCode::InvalidFrontmatter => exit_code::INVALID_FRONTMATTER,
            ExitCode::NoActiveClient => exit_code::NO_ACTIVE_CLIENT,
            ExitCode::UnresolvedLinksFound => exit_code::UNRESOLVED_LINKS_FOUND,
        }
    }
}
