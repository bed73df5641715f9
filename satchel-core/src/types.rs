//! Domain types for the Satchel exchange.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.
//! Identity fields (course/assignment/student ids, timestamps) are newtypes so
//! they cannot be swapped at a call site without the compiler noticing.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed course identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub String);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CourseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CourseId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed assignment identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub String);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AssignmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AssignmentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed student identifier.
///
/// Student usernames are free-form and may contain `+`; see
/// [`crate::cache`] for how that interacts with cache-key parsing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Fixed-width format used by the remote service. Lexicographic order of the
/// rendered string equals chronological order, which is what makes "latest
/// submission = max(timestamp)" work without parsing.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f %Z";

/// A server-assigned submission timestamp.
///
/// Kept as the original string so comparisons stay lexicographic and
/// round-trips through directory names are byte-exact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub String);

impl Timestamp {
    /// Current UTC time in the service's fixed-width format.
    pub fn now() -> Self {
        Self(chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string())
    }

    /// Heuristic shape check: `YYYY-MM-DD HH:MM:SS…`.
    ///
    /// Used to tell a timestamp segment apart from a trailing random suffix
    /// in a four-part cache key.
    pub fn looks_like(s: &str) -> bool {
        let bytes = s.as_bytes();
        if bytes.len() < 19 {
            return false;
        }
        let digit = |i: usize| bytes[i].is_ascii_digit();
        digit(0)
            && digit(1)
            && digit(2)
            && digit(3)
            && bytes[4] == b'-'
            && digit(5)
            && digit(6)
            && bytes[7] == b'-'
            && digit(8)
            && digit(9)
            && bytes[10] == b' '
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Timestamp {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One file in a directory-tree transfer: a relative, POSIX-separated path
/// and the raw bytes. The checksum is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// MD5 hex digest of the content — the remote service's addressing hash.
    pub fn checksum(&self) -> String {
        md5_hex(&self.content)
    }
}

/// MD5 hex digest of arbitrary bytes.
pub fn md5_hex(bytes: &[u8]) -> String {
    use md5::{Digest, Md5};
    let mut hasher = Md5::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// A file listing entry from a `list_only` query: path plus the remote
/// checksum, no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStub {
    pub path: String,
    pub checksum: Option<String>,
}

/// A released assignment, identified by its (course, assignment) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub course_id: CourseId,
    pub assignment_id: AssignmentId,
}

/// One notebook inside a submission. `feedback_checksum` is present iff
/// feedback has been released for that notebook at that timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookRef {
    pub notebook_id: String,
    pub feedback_checksum: Option<String>,
}

/// A single submission record. Submissions are append-only: the timestamp is
/// the version discriminator and records are never mutated or merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub course_id: CourseId,
    pub assignment_id: AssignmentId,
    pub student_id: StudentId,
    pub timestamp: Timestamp,
    pub notebooks: Vec<NotebookRef>,
}

/// The `(student, timestamp)` stub returned by the submissions listing
/// endpoint, before notebooks and feedback are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionStub {
    pub student_id: StudentId,
    pub timestamp: Timestamp,
}

/// Strip `ext` from the filename component of a relative path.
///
/// Returns `None` when the path does not end in `ext`, which is how
/// non-notebook files are filtered out of listings.
pub fn stem_with_extension<'a>(path: &'a str, ext: &str) -> Option<&'a str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(ext)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_display() {
        assert_eq!(CourseId::from("math101").to_string(), "math101");
        assert_eq!(AssignmentId::from("ps1").to_string(), "ps1");
        assert_eq!(StudentId::from("ada").to_string(), "ada");
    }

    #[test]
    fn timestamp_now_is_fixed_width_and_sortable() {
        let a = Timestamp::now();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = Timestamp::now();
        assert_eq!(a.0.len(), b.0.len(), "timestamps must be fixed-width");
        assert!(a < b, "later timestamp must sort after earlier one");
        assert!(Timestamp::looks_like(&a.0));
    }

    #[test]
    fn timestamp_shape_rejects_random_suffix() {
        assert!(Timestamp::looks_like("2024-03-01 12:00:05.000000 UTC"));
        assert!(!Timestamp::looks_like("aGVsbG8xMjM"));
        assert!(!Timestamp::looks_like("ps1"));
    }

    #[test]
    fn file_entry_checksum_is_md5_hex() {
        let entry = FileEntry::new("p1.ipynb", b"hello".to_vec());
        assert_eq!(entry.checksum(), "5d41402abc4b2a76b9719d911017c592");
    }

    #[test]
    fn stem_filters_by_extension() {
        assert_eq!(stem_with_extension("p1.ipynb", ".ipynb"), Some("p1"));
        assert_eq!(stem_with_extension("sub/dir/p2.ipynb", ".ipynb"), Some("p2"));
        assert_eq!(stem_with_extension("p1.html", ".ipynb"), None);
        assert_eq!(stem_with_extension("p1.html", ".html"), Some("p1"));
    }
}
