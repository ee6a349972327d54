//! Error types for loading, converting and writing project documents
//!
//! Every fallible operation in this crate returns [`Error`]. Each variant maps to a single
//! [`ErrorKind`] and carries the offending path or value, so callers can branch on the kind
//! and still print a diagnostic that names exactly what failed.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The validation stage or operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path does not exist
    NotFound,
    /// Path exists but is a directory or special file
    NotAFile,
    /// File extension does not match the format
    InvalidFileType,
    /// Content is not well formed for the format
    ParseFailure,
    /// Version marker missing or mismatched
    UnsupportedVersion,
    /// Mapping configuration unreadable or corrupt
    MappingLoadFailure,
    /// Generic read/write failure
    IoFailure,
    /// Default output path already taken
    OutputExists,
    /// Format not found in registry
    FormatNotFound,
    /// Document could not be serialized
    SerializationFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::NotAFile => "not a file",
            ErrorKind::InvalidFileType => "invalid file type",
            ErrorKind::ParseFailure => "parse failure",
            ErrorKind::UnsupportedVersion => "unsupported version",
            ErrorKind::MappingLoadFailure => "mapping load failure",
            ErrorKind::IoFailure => "i/o failure",
            ErrorKind::OutputExists => "output exists",
            ErrorKind::FormatNotFound => "format not found",
            ErrorKind::SerializationFailure => "serialization failure",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while loading, converting or writing documents
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the provided path does not exist: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("the provided path is not a valid file: {}", .path.display())]
    NotAFile { path: PathBuf },

    #[error("the provided file is not a valid .{expected} file: {}", .path.display())]
    InvalidFileType { path: PathBuf, expected: String },

    #[error("failed to parse {}: {message}", .path.display())]
    ParseFailure { path: PathBuf, message: String },

    #[error(
        "unsupported version in {} (version {expected} required, got {})",
        .path.display(),
        .found.as_deref().unwrap_or("none")
    )]
    UnsupportedVersion {
        path: PathBuf,
        expected: String,
        found: Option<String>,
    },

    #[error("could not load mappings from {}: {message}", .path.display())]
    MappingLoadFailure { path: PathBuf, message: String },

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "refusing to overwrite {}; pass an explicit output path or allow overwriting",
        .path.display()
    )]
    OutputExists { path: PathBuf },

    #[error("format '{0}' not found")]
    FormatNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::NotAFile { .. } => ErrorKind::NotAFile,
            Error::InvalidFileType { .. } => ErrorKind::InvalidFileType,
            Error::ParseFailure { .. } => ErrorKind::ParseFailure,
            Error::UnsupportedVersion { .. } => ErrorKind::UnsupportedVersion,
            Error::MappingLoadFailure { .. } => ErrorKind::MappingLoadFailure,
            Error::Io { .. } => ErrorKind::IoFailure,
            Error::OutputExists { .. } => ErrorKind::OutputExists,
            Error::FormatNotFound(_) => ErrorKind::FormatNotFound,
            Error::Serialization(_) => ErrorKind::SerializationFailure,
        }
    }

    /// The path the error refers to, when there is one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::NotFound { path }
            | Error::NotAFile { path }
            | Error::InvalidFileType { path, .. }
            | Error::ParseFailure { path, .. }
            | Error::UnsupportedVersion { path, .. }
            | Error::MappingLoadFailure { path, .. }
            | Error::Io { path, .. }
            | Error::OutputExists { path } => Some(path),
            Error::FormatNotFound(_) | Error::Serialization(_) => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Error::ParseFailure {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
