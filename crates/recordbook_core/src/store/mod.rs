//! Persistence collaborator: whole-collection JSON documents.
//!
//! # Responsibility
//! - Translate a collection to and from a textual JSON document.
//! - Read and write that document on disk with all-or-nothing semantics.
//!
//! # Invariants
//! - Decoding never yields a collection that breaks id uniqueness or the
//!   declared id policy.
//! - A failed save never leaves a partial document at the target path.
//! - A failed load never touches the caller's in-memory collection.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

mod document;
mod json_file;

pub use document::{decode_collection, encode_collection, FORMAT_VERSION};
pub use json_file::JsonFileStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// External-resource failure raised by the persistence collaborator.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be read, written or renamed.
    Io { path: PathBuf, source: io::Error },
    /// Collection could not be serialized.
    Encode(serde_json::Error),
    /// Document is not well-formed JSON or does not match the schema.
    Malformed(serde_json::Error),
    /// Document was written by a newer/unknown format.
    UnsupportedVersion { found: u32, supported: u32 },
    /// Document parsed but violates collection invariants.
    InvalidDocument(String),
}

impl StoreError {
    /// Returns whether the backing file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Stable machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "store_io_failed",
            Self::Encode(_) => "store_encode_failed",
            Self::Malformed(_) => "store_malformed",
            Self::UnsupportedVersion { .. } => "store_unsupported_version",
            Self::InvalidDocument(_) => "store_invalid_document",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "`{}`: {source}", path.display()),
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
            Self::Malformed(err) => write!(f, "malformed collection document: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "collection document format {found} is newer than supported {supported}"
            ),
            Self::InvalidDocument(message) => write!(f, "invalid collection document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) | Self::Malformed(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::InvalidDocument(_) => None,
        }
    }
}
