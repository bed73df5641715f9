//! Error types for satchel-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the exchange configuration.
///
/// These are fatal: nothing touches the network or the filesystem until the
/// configuration is sound.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.satchel/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// No remote service URL configured and `$SATCHEL_URL` is unset.
    #[error("remote service URL not configured; set `remote_url` in config.yaml or $SATCHEL_URL")]
    RemoteUrlNotConfigured,

    /// Could not derive a username from config or environment.
    #[error("username not configured; set `username` in config.yaml, $SATCHEL_USER or $USER")]
    UsernameNotFound,

    /// An operation that needs a concrete course was invoked without one.
    #[error("no course id specified; re-run with --course")]
    MissingCourseId,

    /// A literal student id contained glob metacharacters.
    #[error("invalid student id {student_id:?}: wildcard characters are not allowed")]
    InvalidStudentId { student_id: String },
}

/// A local cache directory name that does not follow the
/// `student+assignment+timestamp` scheme.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed cache key {name:?}: expected student+assignment+timestamp")]
pub struct MalformedCacheKey {
    pub name: String,
}
