//! Error types for satchel-sync.

use std::path::PathBuf;

use thiserror::Error;

use satchel_core::error::{ConfigError, MalformedCacheKey};
use satchel_client::RemoteError;

/// All errors that can arise from exchange operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// A configuration problem, fatal before any I/O.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A definite failure from the remote artifact service.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An unparsable cache directory name.
    #[error(transparent)]
    CacheKey(#[from] MalformedCacheKey),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fetch destination already exists and `replace` was not given.
    /// Silently overwriting a student's local edits is unacceptable.
    #[error("destination {path} already exists; pass --replace to fetch missing files into it")]
    LocalConflict { path: PathBuf },

    /// A transfer entry whose relative path would escape the destination.
    #[error("refusing to write outside the destination: {path:?}")]
    UnsafePath { path: String },

    /// The submitted file set is missing notebooks from the released set.
    /// Only raised under the `strict` flag; otherwise a warning.
    #[error("submission is missing released notebooks: {}", missing.join(", "))]
    MissingNotebooks { missing: Vec<String> },

    /// Releasing over an existing remote assignment or solution.
    #[error("{course}/{assignment} is already released; pass --force to replace it")]
    AlreadyReleased { course: String, assignment: String },

    /// A solution cannot be fetched before its assignment.
    #[error("assignment {assignment} has not been fetched; fetch it before its solution")]
    AssignmentNotFetched { assignment: String },

    /// A local source directory the operation needs does not exist.
    #[error("source directory {path} not found")]
    SourceMissing { path: PathBuf },
}

/// Convenience constructor for [`ExchangeError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ExchangeError {
    ExchangeError::Io {
        path: path.into(),
        source,
    }
}
