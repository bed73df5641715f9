//! In-memory [`RemoteStore`] double for engine and operation tests.
//!
//! Mirrors the service's observable behavior: append-only submissions with
//! server-assigned monotonic timestamps, checksum-only `list_only` views,
//! and per-endpoint failure injection so per-candidate degradation paths can
//! be exercised without a network.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use satchel_core::types::{
    AssignmentId, CourseId, FileEntry, FileStub, StudentId, SubmissionStub, Timestamp,
    TIMESTAMP_FORMAT,
};

use crate::error::RemoteError;
use crate::store::RemoteStore;

#[derive(Debug, Clone)]
struct StoredSubmission {
    course: String,
    assignment: String,
    student: String,
    timestamp: Timestamp,
    files: Vec<FileEntry>,
}

#[derive(Debug, Default)]
struct State {
    courses: Vec<CourseId>,
    // course -> assignment -> files
    assignments: BTreeMap<String, BTreeMap<String, Vec<FileEntry>>>,
    solutions: BTreeMap<String, BTreeMap<String, Vec<FileEntry>>>,
    submissions: Vec<StoredSubmission>,
    // (course, assignment, student, timestamp) -> feedback files
    feedback: HashMap<(String, String, String, String), Vec<FileEntry>>,
    fail: HashSet<String>,
    deleted: Vec<String>,
    clock: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryRemoteStore {
    state: Mutex<State>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_course(&self, course: &CourseId) {
        let mut state = self.lock();
        if !state.courses.contains(course) {
            state.courses.push(course.clone());
        }
    }

    /// Seed a submission with an explicit timestamp, bypassing the clock.
    pub fn seed_submission(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
        files: Vec<FileEntry>,
    ) {
        self.lock().submissions.push(StoredSubmission {
            course: course.0.clone(),
            assignment: assignment.0.clone(),
            student: student.0.clone(),
            timestamp: timestamp.clone(),
            files,
        });
    }

    /// Seed released feedback for one submission timestamp.
    pub fn seed_feedback(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
        files: Vec<FileEntry>,
    ) {
        self.lock().feedback.insert(
            (
                course.0.clone(),
                assignment.0.clone(),
                student.0.clone(),
                timestamp.0.clone(),
            ),
            files,
        );
    }

    /// Make every call to `key` fail until cleared. Keys are
    /// `"<endpoint>/<course>[/...]"`, e.g. `"assignments/math101"` or
    /// `"feedback/math101/ps1/ada"`.
    pub fn fail_endpoint(&self, key: &str) {
        self.lock().fail.insert(key.to_string());
    }

    /// Paths deleted via the DELETE endpoints, in call order.
    pub fn deleted(&self) -> Vec<String> {
        self.lock().deleted.clone()
    }

    /// Timestamps recorded for a student's submissions, in append order.
    pub fn submission_timestamps(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
    ) -> Vec<Timestamp> {
        self.lock()
            .submissions
            .iter()
            .filter(|s| {
                s.course == course.0 && s.assignment == assignment.0 && s.student == student.0
            })
            .map(|s| s.timestamp.clone())
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("remote store state poisoned")
    }

    fn check_fail(&self, key: &str) -> Result<(), RemoteError> {
        if self.lock().fail.contains(key) {
            return Err(RemoteError::Failure {
                url: key.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn next_timestamp(state: &mut State) -> Timestamp {
        // Fixed base instant plus a strictly increasing offset keeps the
        // rendered timestamps fixed-width and lexicographically ordered.
        state.clock += 1;
        let instant: DateTime<Utc> = DateTime::from_timestamp(1_709_290_800 + state.clock, 0)
            .expect("valid test timestamp");
        Timestamp(instant.format(TIMESTAMP_FORMAT).to_string())
    }

    fn stubs(files: &[FileEntry]) -> Vec<FileStub> {
        files
            .iter()
            .map(|f| FileStub {
                path: f.path.clone(),
                checksum: Some(f.checksum()),
            })
            .collect()
    }

    fn missing(url: impl Into<String>) -> RemoteError {
        RemoteError::Failure {
            url: url.into(),
            message: "not found".to_string(),
        }
    }
}

impl RemoteStore for InMemoryRemoteStore {
    fn courses(&self) -> Result<Vec<CourseId>, RemoteError> {
        self.check_fail("courses")?;
        Ok(self.lock().courses.clone())
    }

    fn assignments(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError> {
        self.check_fail(&format!("assignments/{course}"))?;
        Ok(self
            .lock()
            .assignments
            .get(&course.0)
            .map(|m| m.keys().cloned().map(AssignmentId).collect())
            .unwrap_or_default())
    }

    fn solutions(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError> {
        self.check_fail(&format!("solutions/{course}"))?;
        Ok(self
            .lock()
            .solutions
            .get(&course.0)
            .map(|m| m.keys().cloned().map(AssignmentId).collect())
            .unwrap_or_default())
    }

    fn assignment_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.check_fail(&format!("assignment/{course}/{assignment}"))?;
        let state = self.lock();
        let files = state
            .assignments
            .get(&course.0)
            .and_then(|m| m.get(&assignment.0))
            .ok_or_else(|| Self::missing(format!("assignment/{course}/{assignment}")))?;
        Ok(Self::stubs(files))
    }

    fn assignment_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.check_fail(&format!("assignment/{course}/{assignment}"))?;
        let state = self.lock();
        state
            .assignments
            .get(&course.0)
            .and_then(|m| m.get(&assignment.0))
            .cloned()
            .ok_or_else(|| Self::missing(format!("assignment/{course}/{assignment}")))
    }

    fn solution_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.check_fail(&format!("solution/{course}/{assignment}"))?;
        let state = self.lock();
        let files = state
            .solutions
            .get(&course.0)
            .and_then(|m| m.get(&assignment.0))
            .ok_or_else(|| Self::missing(format!("solution/{course}/{assignment}")))?;
        Ok(Self::stubs(files))
    }

    fn solution_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.check_fail(&format!("solution/{course}/{assignment}"))?;
        let state = self.lock();
        state
            .solutions
            .get(&course.0)
            .and_then(|m| m.get(&assignment.0))
            .cloned()
            .ok_or_else(|| Self::missing(format!("solution/{course}/{assignment}")))
    }

    fn submissions(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: Option<&StudentId>,
    ) -> Result<Vec<SubmissionStub>, RemoteError> {
        self.check_fail(&format!("submissions/{course}/{assignment}"))?;
        Ok(self
            .lock()
            .submissions
            .iter()
            .filter(|s| s.course == course.0 && s.assignment == assignment.0)
            .filter(|s| student.map_or(true, |id| s.student == id.0))
            .map(|s| SubmissionStub {
                student_id: StudentId(s.student.clone()),
                timestamp: s.timestamp.clone(),
            })
            .collect())
    }

    fn submission_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.check_fail(&format!("submission/{course}/{assignment}/{student}"))?;
        let state = self.lock();
        state
            .submissions
            .iter()
            .find(|s| {
                s.course == course.0
                    && s.assignment == assignment.0
                    && s.student == student.0
                    && s.timestamp == *timestamp
            })
            .map(|s| Self::stubs(&s.files))
            .ok_or_else(|| Self::missing(format!("submission/{course}/{assignment}/{student}")))
    }

    fn submission_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.check_fail(&format!("submission/{course}/{assignment}/{student}"))?;
        let state = self.lock();
        state
            .submissions
            .iter()
            .find(|s| {
                s.course == course.0
                    && s.assignment == assignment.0
                    && s.student == student.0
                    && s.timestamp == *timestamp
            })
            .map(|s| s.files.clone())
            .ok_or_else(|| Self::missing(format!("submission/{course}/{assignment}/{student}")))
    }

    fn feedback_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.check_fail(&format!("feedback/{course}/{assignment}/{student}"))?;
        let state = self.lock();
        let key = (
            course.0.clone(),
            assignment.0.clone(),
            student.0.clone(),
            timestamp.0.clone(),
        );
        Ok(state
            .feedback
            .get(&key)
            .map(|files| Self::stubs(files))
            .unwrap_or_default())
    }

    fn feedback_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.check_fail(&format!("feedback/{course}/{assignment}/{student}"))?;
        let state = self.lock();
        let key = (
            course.0.clone(),
            assignment.0.clone(),
            student.0.clone(),
            timestamp.0.clone(),
        );
        Ok(state.feedback.get(&key).cloned().unwrap_or_default())
    }

    fn put_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        self.check_fail(&format!("put_assignment/{course}/{assignment}"))?;
        let mut state = self.lock();
        state
            .assignments
            .entry(course.0.clone())
            .or_default()
            .insert(assignment.0.clone(), files.to_vec());
        Ok(())
    }

    fn put_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        self.check_fail(&format!("put_solution/{course}/{assignment}"))?;
        let mut state = self.lock();
        state
            .solutions
            .entry(course.0.clone())
            .or_default()
            .insert(assignment.0.clone(), files.to_vec());
        Ok(())
    }

    fn post_submission(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<Option<Timestamp>, RemoteError> {
        self.check_fail(&format!("post_submission/{course}/{assignment}"))?;
        // The acting student is implied by authentication on the real
        // service; the double extracts it from a `student.txt` marker or
        // falls back to "student".
        let student = files
            .iter()
            .find(|f| f.path == "student.txt")
            .map(|f| String::from_utf8_lossy(&f.content).trim().to_string())
            .unwrap_or_else(|| "student".to_string());
        let mut state = self.lock();
        let timestamp = Self::next_timestamp(&mut state);
        state.submissions.push(StoredSubmission {
            course: course.0.clone(),
            assignment: assignment.0.clone(),
            student,
            timestamp: timestamp.clone(),
            files: files.to_vec(),
        });
        Ok(Some(timestamp))
    }

    fn post_feedback(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        self.check_fail(&format!("post_feedback/{course}/{assignment}/{student}"))?;
        self.seed_feedback(course, assignment, student, timestamp, files.to_vec());
        Ok(())
    }

    fn delete_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError> {
        self.check_fail(&format!("delete_assignment/{course}/{assignment}"))?;
        let mut state = self.lock();
        if let Some(map) = state.assignments.get_mut(&course.0) {
            map.remove(&assignment.0);
        }
        state
            .deleted
            .push(format!("assignment/{course}/{assignment}"));
        Ok(())
    }

    fn delete_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError> {
        self.check_fail(&format!("delete_solution/{course}/{assignment}"))?;
        let mut state = self.lock();
        if let Some(map) = state.solutions.get_mut(&course.0) {
            map.remove(&assignment.0);
        }
        state.deleted.push(format!("solution/{course}/{assignment}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_submission_assigns_increasing_timestamps() {
        let store = InMemoryRemoteStore::new();
        let course = CourseId::from("math101");
        let assignment = AssignmentId::from("ps1");
        let files = vec![FileEntry::new("p1.ipynb", b"v1".to_vec())];

        let first = store
            .post_submission(&course, &assignment, &files)
            .expect("post")
            .expect("timestamp");
        let second = store
            .post_submission(&course, &assignment, &files)
            .expect("post")
            .expect("timestamp");
        assert!(second > first);
        assert!(Timestamp::looks_like(&first.0));
    }

    #[test]
    fn injected_failure_surfaces_as_remote_error() {
        let store = InMemoryRemoteStore::new();
        store.fail_endpoint("courses");
        assert!(store.courses().is_err());
    }

    #[test]
    fn list_only_views_carry_checksums() {
        let store = InMemoryRemoteStore::new();
        let course = CourseId::from("math101");
        let assignment = AssignmentId::from("ps1");
        let files = vec![FileEntry::new("p1.ipynb", b"cells".to_vec())];
        store
            .put_assignment(&course, &assignment, &files)
            .expect("put");

        let stubs = store
            .assignment_file_list(&course, &assignment)
            .expect("list");
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].checksum.as_deref(), Some(files[0].checksum().as_str()));
    }
}
