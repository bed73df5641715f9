//! The Remote Store contract.
//!
//! One method per `(method, path)` pair of the artifact service. The engine
//! and the transfer operations depend only on this trait; the HTTP transport
//! lives in [`crate::http`] and an in-memory double in [`crate::testing`].

use satchel_core::types::{
    AssignmentId, CourseId, FileEntry, FileStub, StudentId, SubmissionStub, Timestamp,
};

use crate::error::RemoteError;

pub trait RemoteStore {
    /// `GET /courses` — all courses visible to the caller.
    fn courses(&self) -> Result<Vec<CourseId>, RemoteError>;

    /// `GET /assignments/{course}` — released assignment ids.
    fn assignments(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError>;

    /// `GET /solutions/{course}` — released solution ids.
    fn solutions(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError>;

    /// `GET /assignment/{course}/{assignment}?list_only=true`.
    fn assignment_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError>;

    /// `GET /assignment/{course}/{assignment}` — full content.
    fn assignment_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError>;

    /// `GET /solution/{course}/{assignment}?list_only=true`.
    fn solution_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError>;

    /// `GET /solution/{course}/{assignment}` — full content.
    fn solution_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError>;

    /// `GET /submissions/{course}/{assignment}[/{student}]`.
    fn submissions(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: Option<&StudentId>,
    ) -> Result<Vec<SubmissionStub>, RemoteError>;

    /// `GET /submission/{...}?list_only=true&timestamp=...`.
    fn submission_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError>;

    /// `GET /submission/{...}?timestamp=...` — full content.
    fn submission_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError>;

    /// `GET /feedback/{...}?list_only=true&timestamp=...` — feedback
    /// checksums, no content.
    fn feedback_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError>;

    /// `GET /feedback/{...}?timestamp=...` — full content.
    fn feedback_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError>;

    /// `POST /assignment/{course}/{assignment}`.
    fn put_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError>;

    /// `POST /solution/{course}/{assignment}`.
    fn put_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError>;

    /// `POST /submission/{course}/{assignment}` — appends a new submission.
    /// Returns the server-assigned timestamp when the service provides one.
    fn post_submission(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<Option<Timestamp>, RemoteError>;

    /// `POST /feedback/{course}/{assignment}/{student}` for one timestamp.
    fn post_feedback(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
        files: &[FileEntry],
    ) -> Result<(), RemoteError>;

    /// `DELETE /assignment/{course}/{assignment}`.
    fn delete_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError>;

    /// `DELETE /solution/{course}/{assignment}`.
    fn delete_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError>;
}
