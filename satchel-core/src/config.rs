//! Exchange configuration.
//!
//! One explicit struct, constructed once at process start and passed by
//! reference into every operation — there is no global or environment-derived
//! state past this point.
//!
//! # Storage layout
//!
//! ```text
//! ~/.satchel/
//!   config.yaml   (optional — every field has a default)
//!   cache/
//!     <course_id>/
//!       <student>+<assignment>+<timestamp>/   (cache entries)
//! ```
//!
//! # API pattern
//!
//! Loaders come in two forms:
//! - `load_at(home: &Path)` — explicit home; used in tests with `TempDir`
//! - `load()` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrapper; always use `_at`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::{AssignmentId, CourseId, StudentId};

/// On-disk config shape. Every field is optional; resolution happens in
/// [`ExchangeConfig::load_at`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    remote_url: Option<String>,
    auth_token: Option<String>,
    username: Option<String>,
    assignment_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    path_includes_course: Option<bool>,
    exclude: Option<Vec<String>>,
    include: Option<Vec<String>>,
    max_file_size_kb: Option<u64>,
    release_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    solution_dir: Option<PathBuf>,
    feedback_dir: Option<PathBuf>,
    submitted_dir: Option<PathBuf>,
    strict: Option<bool>,
    add_random_string: Option<bool>,
}

/// Fully resolved configuration for all exchange operations.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Base URL of the remote artifact service. Checked lazily via
    /// [`ExchangeConfig::remote_url`] so purely local operations work
    /// without one.
    pub remote_url: Option<String>,
    /// Optional bearer token sent as `Authorization: token <value>`.
    pub auth_token: Option<String>,
    /// The acting user; students submit and fetch feedback as this identity.
    pub username: StudentId,
    /// Root for per-user working copies of assignments.
    pub assignment_dir: PathBuf,
    /// Root of the local submission cache.
    pub cache_dir: PathBuf,
    /// Prefix working-copy paths with the course id.
    pub path_includes_course: bool,
    /// Filename globs excluded from every transfer.
    pub exclude: Vec<String>,
    /// When non-empty, only filenames matching one of these globs transfer.
    pub include: Vec<String>,
    /// Per-file size cap in kilobytes.
    pub max_file_size_kb: Option<u64>,
    /// Instructor-side directory of releasable assignments.
    pub release_dir: PathBuf,
    /// Instructor-side directory of assignment sources.
    pub source_dir: PathBuf,
    /// Instructor-side directory of releasable solutions.
    pub solution_dir: PathBuf,
    /// Instructor-side directory of graded feedback, per student.
    pub feedback_dir: PathBuf,
    /// Instructor-side directory that `collect` populates.
    pub submitted_dir: PathBuf,
    /// Promote missing-notebook warnings on submit to hard failures.
    pub strict: bool,
    /// Append a random suffix to submission names on shared storage.
    pub add_random_string: bool,
}

impl ExchangeConfig {
    /// `<home>/.satchel/config.yaml` — pure, no I/O.
    pub fn config_path_at(home: &Path) -> PathBuf {
        home.join(".satchel").join("config.yaml")
    }

    /// Load configuration rooted at `home`, filling defaults for anything
    /// the file (or a missing file) does not specify.
    pub fn load_at(home: &Path) -> Result<Self, ConfigError> {
        let path = Self::config_path_at(home);
        let raw = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            serde_yaml::from_str::<RawConfig>(&contents)
                .map_err(|e| ConfigError::Parse { path, source: e })?
        } else {
            RawConfig::default()
        };

        let username = raw
            .username
            .or_else(|| std::env::var("SATCHEL_USER").ok())
            .or_else(|| std::env::var("USER").ok())
            .ok_or(ConfigError::UsernameNotFound)?;

        Ok(Self {
            remote_url: raw
                .remote_url
                .or_else(|| std::env::var("SATCHEL_URL").ok()),
            auth_token: raw
                .auth_token
                .or_else(|| std::env::var("SATCHEL_TOKEN").ok()),
            username: StudentId(username),
            assignment_dir: raw.assignment_dir.unwrap_or_else(|| PathBuf::from(".")),
            cache_dir: raw
                .cache_dir
                .unwrap_or_else(|| home.join(".satchel").join("cache")),
            path_includes_course: raw.path_includes_course.unwrap_or(false),
            exclude: raw.exclude.unwrap_or_else(|| {
                vec![
                    ".ipynb_checkpoints".to_string(),
                    "*.pyc".to_string(),
                    "__pycache__".to_string(),
                    "feedback".to_string(),
                ]
            }),
            include: raw.include.unwrap_or_default(),
            max_file_size_kb: Some(raw.max_file_size_kb.unwrap_or(100_000)),
            release_dir: raw.release_dir.unwrap_or_else(|| PathBuf::from("release")),
            source_dir: raw.source_dir.unwrap_or_else(|| PathBuf::from("source")),
            solution_dir: raw.solution_dir.unwrap_or_else(|| PathBuf::from("solution")),
            feedback_dir: raw.feedback_dir.unwrap_or_else(|| PathBuf::from("feedback")),
            submitted_dir: raw
                .submitted_dir
                .unwrap_or_else(|| PathBuf::from("submitted")),
            strict: raw.strict.unwrap_or(false),
            add_random_string: raw.add_random_string.unwrap_or(false),
        })
    }

    /// `load_at` convenience wrapper.
    pub fn load() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Self::load_at(&home)
    }

    /// The configured remote URL, or a fatal configuration error.
    pub fn remote_url(&self) -> Result<&str, ConfigError> {
        self.remote_url
            .as_deref()
            .ok_or(ConfigError::RemoteUrlNotConfigured)
    }

    /// Working-copy root for an assignment:
    /// `<assignment_dir>[/<course>]/<assignment>`.
    pub fn assignment_root(&self, course: &CourseId, assignment: &AssignmentId) -> PathBuf {
        if self.path_includes_course {
            self.assignment_dir.join(&course.0).join(&assignment.0)
        } else {
            self.assignment_dir.join(&assignment.0)
        }
    }

    /// `<assignment root>/solution` — where fetched solutions land.
    pub fn solution_root(&self, course: &CourseId, assignment: &AssignmentId) -> PathBuf {
        self.assignment_root(course, assignment).join("solution")
    }

    /// `<assignment root>/feedback` — fetched feedback, one subdirectory per
    /// submission timestamp.
    pub fn feedback_root(&self, course: &CourseId, assignment: &AssignmentId) -> PathBuf {
        self.assignment_root(course, assignment).join("feedback")
    }
}

/// Reject literal student ids containing glob metacharacters. Wildcard scope
/// is expressed by omitting the id, never by embedding `*` in one.
pub fn validate_student_id(student: &StudentId) -> Result<(), ConfigError> {
    if student.0.chars().any(|c| matches!(c, '*' | '?' | '[' | ']')) {
        return Err(ConfigError::InvalidStudentId {
            student_id: student.0.clone(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(home: &Path, yaml: &str) {
        let path = ExchangeConfig::config_path_at(home);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, yaml).unwrap();
    }

    #[test]
    fn defaults_when_file_missing() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "username: ada\n");
        let config = ExchangeConfig::load_at(home.path()).expect("load");
        assert_eq!(config.assignment_dir, PathBuf::from("."));
        assert_eq!(config.cache_dir, home.path().join(".satchel").join("cache"));
        assert!(!config.path_includes_course);
        assert!(config.exclude.contains(&"*.pyc".to_string()));
        assert!(config.include.is_empty());
    }

    #[test]
    fn file_values_override_defaults() {
        let home = TempDir::new().unwrap();
        write_config(
            home.path(),
            "username: ada\nremote_url: http://localhost:9999\npath_includes_course: true\nmax_file_size_kb: 42\n",
        );
        let config = ExchangeConfig::load_at(home.path()).expect("load");
        assert_eq!(config.remote_url().unwrap(), "http://localhost:9999");
        assert!(config.path_includes_course);
        assert_eq!(config.max_file_size_kb, Some(42));
    }

    #[test]
    fn assignment_root_with_and_without_course() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "username: ada\nassignment_dir: /work\n");
        let mut config = ExchangeConfig::load_at(home.path()).expect("load");
        let course = CourseId::from("math101");
        let assignment = AssignmentId::from("ps1");

        assert_eq!(
            config.assignment_root(&course, &assignment),
            PathBuf::from("/work/ps1")
        );
        config.path_includes_course = true;
        assert_eq!(
            config.assignment_root(&course, &assignment),
            PathBuf::from("/work/math101/ps1")
        );
    }

    #[test]
    fn missing_remote_url_is_a_config_error() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), "username: ada\n");
        let config = ExchangeConfig::load_at(home.path()).expect("load");
        if std::env::var("SATCHEL_URL").is_err() {
            assert!(matches!(
                config.remote_url(),
                Err(ConfigError::RemoteUrlNotConfigured)
            ));
        }
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let home = TempDir::new().unwrap();
        write_config(home.path(), ": not yaml [");
        let err = ExchangeConfig::load_at(home.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn student_id_wildcards_rejected() {
        assert!(validate_student_id(&StudentId::from("ada")).is_ok());
        assert!(validate_student_id(&StudentId::from("ada+lovelace")).is_ok());
        assert!(validate_student_id(&StudentId::from("a*")).is_err());
        assert!(validate_student_id(&StudentId::from("a?b")).is_err());
    }
}
