//! Cache addressing — the composite key tying local artifacts to remote
//! identities.
//!
//! A cache entry is a directory named
//! `student+assignment+timestamp[+random-suffix]` under
//! `<cache_root>/<course_id>/`. The `+` separator is reserved for assignment
//! ids and timestamps, but student usernames are free-form and may contain
//! it, so parsing always works from the *right*: the timestamp is the
//! rightmost field, the assignment id the second-rightmost, and everything
//! remaining is the student id.

use std::path::{Path, PathBuf};

use crate::error::MalformedCacheKey;
use crate::types::{AssignmentId, CourseId, StudentId, Timestamp};

/// The parsed identity of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyParts {
    pub student_id: StudentId,
    pub assignment_id: AssignmentId,
    pub timestamp: Timestamp,
}

/// Join identity fields into a cache directory name.
pub fn make_key(student: &StudentId, assignment: &AssignmentId, timestamp: &Timestamp) -> String {
    format!("{}+{}+{}", student.0, assignment.0, timestamp.0)
}

/// `make_key` with a trailing random suffix, used when submissions need a
/// collision-proof name on shared storage.
pub fn make_key_with_suffix(
    student: &StudentId,
    assignment: &AssignmentId,
    timestamp: &Timestamp,
    suffix: &str,
) -> String {
    format!("{}+{}+{}+{}", student.0, assignment.0, timestamp.0, suffix)
}

/// Parse a cache directory name back into its identity fields.
///
/// Splits on the last two `+` occurrences reading from the right. A fourth
/// trailing segment is accepted as a random suffix when the segment before it
/// has the fixed-width timestamp shape. Fails with [`MalformedCacheKey`] when
/// fewer than two separators are present.
pub fn parse_key(dir_name: &str) -> Result<CacheKeyParts, MalformedCacheKey> {
    let malformed = || MalformedCacheKey {
        name: dir_name.to_string(),
    };

    let mut parts = dir_name.rsplitn(3, '+');
    let mut timestamp = parts.next().ok_or_else(malformed)?;
    let mut assignment = parts.next().ok_or_else(malformed)?;
    let mut student = parts.next().ok_or_else(malformed)?;

    // Four-part form: `student+assignment+timestamp+suffix`. Only re-split
    // when the rightmost segment is clearly not a timestamp but the one
    // before it is, so three-part keys always round-trip unchanged.
    if !Timestamp::looks_like(timestamp) && Timestamp::looks_like(assignment) {
        let mut parts = dir_name.rsplitn(4, '+');
        let _suffix = parts.next().ok_or_else(malformed)?;
        timestamp = parts.next().ok_or_else(malformed)?;
        assignment = parts.next().ok_or_else(malformed)?;
        student = parts.next().ok_or_else(malformed)?;
    }

    if student.is_empty() {
        return Err(malformed());
    }

    Ok(CacheKeyParts {
        student_id: StudentId::from(student),
        assignment_id: AssignmentId::from(assignment),
        timestamp: Timestamp::from(timestamp),
    })
}

/// `<cache_root>/<course_id>/` — pure, no I/O.
pub fn course_cache_dir(cache_root: &Path, course: &CourseId) -> PathBuf {
    cache_root.join(&course.0)
}

/// `<cache_root>/<course_id>/<student+assignment+timestamp>/` — pure, no I/O.
pub fn entry_dir(
    cache_root: &Path,
    course: &CourseId,
    student: &StudentId,
    assignment: &AssignmentId,
    timestamp: &Timestamp,
) -> PathBuf {
    course_cache_dir(cache_root, course).join(make_key(student, assignment, timestamp))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ts() -> Timestamp {
        Timestamp::from("2024-03-01 12:00:05.000000 UTC")
    }

    #[rstest]
    #[case("ada")]
    #[case("ada+lovelace")]
    #[case("a+b+c")]
    fn round_trip_preserves_students_with_plus(#[case] student: &str) {
        let key = make_key(&StudentId::from(student), &AssignmentId::from("ps1"), &ts());
        let parts = parse_key(&key).expect("parse");
        assert_eq!(parts.student_id, StudentId::from(student));
        assert_eq!(parts.assignment_id, AssignmentId::from("ps1"));
        assert_eq!(parts.timestamp, ts());
    }

    #[test]
    fn four_part_key_drops_random_suffix() {
        let key = make_key_with_suffix(
            &StudentId::from("ada"),
            &AssignmentId::from("ps1"),
            &ts(),
            "aGVsbG8xMjM",
        );
        let parts = parse_key(&key).expect("parse");
        assert_eq!(parts.student_id, StudentId::from("ada"));
        assert_eq!(parts.assignment_id, AssignmentId::from("ps1"));
        assert_eq!(parts.timestamp, ts());
    }

    #[test]
    fn too_few_separators_is_malformed() {
        let err = parse_key("just-a-name").unwrap_err();
        assert_eq!(err.name, "just-a-name");
        assert!(parse_key("one+two").is_err());
    }

    #[test]
    fn empty_student_is_malformed() {
        assert!(parse_key("+ps1+2024-03-01 12:00:05.000000 UTC").is_err());
    }

    #[test]
    fn entry_dir_layout() {
        let dir = entry_dir(
            Path::new("/cache"),
            &CourseId::from("math101"),
            &StudentId::from("ada"),
            &AssignmentId::from("ps1"),
            &ts(),
        );
        assert_eq!(
            dir,
            PathBuf::from("/cache/math101/ada+ps1+2024-03-01 12:00:05.000000 UTC")
        );
    }
}
