//! HTTP implementation of [`RemoteStore`] over `ureq`.
//!
//! All calls are synchronous and issued one at a time; there is no retry or
//! timeout layer here — a failed call is terminal for its candidate and the
//! engine decides whether to degrade or abort.

use log::debug;

use satchel_core::config::ExchangeConfig;
use satchel_core::error::ConfigError;
use satchel_core::types::{
    AssignmentId, CourseId, FileEntry, FileStub, StudentId, SubmissionStub, Timestamp,
};

use crate::api::{
    check_envelope, encode_files, payload, AssignmentsPayload, CoursesPayload, FilesPayload,
    PostSubmissionPayload, SolutionsPayload, SubmissionsPayload,
};
use crate::error::RemoteError;
use crate::store::RemoteStore;

pub struct HttpRemoteStore {
    base_url: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    /// Build a store from the configured remote URL and auth token.
    pub fn from_config(config: &ExchangeConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.remote_url()?, config.auth_token.clone()))
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&encode_segment(segment));
        }
        url
    }

    fn prepare(&self, request: ureq::Request, params: &[(&str, &str)]) -> ureq::Request {
        let mut request = request;
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("token {token}"));
        }
        for (key, value) in params {
            request = request.query(key, value);
        }
        request
    }

    fn dispatch(&self, url: &str, request: ureq::Request) -> Result<serde_json::Value, RemoteError> {
        debug!("remote request: {url}");
        let response = request.call().map_err(|err| match err {
            ureq::Error::Status(status, _) => RemoteError::Status {
                url: url.to_string(),
                status,
            },
            other => RemoteError::Transport {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;
        let value: serde_json::Value = response
            .into_json()
            .map_err(|e| RemoteError::decode(url, e.to_string()))?;
        check_envelope(url, &value)?;
        Ok(value)
    }

    fn get(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, RemoteError> {
        let url = self.url(segments);
        let request = self.prepare(self.agent.get(&url), params);
        self.dispatch(&url, request)
    }

    fn post_form(
        &self,
        segments: &[&str],
        form: &[(&str, &str)],
    ) -> Result<serde_json::Value, RemoteError> {
        let url = self.url(segments);
        let request = self.prepare(self.agent.post(&url), &[]);
        debug!("remote request: POST {url}");
        let response = request.send_form(form).map_err(|err| match err {
            ureq::Error::Status(status, _) => RemoteError::Status {
                url: url.clone(),
                status,
            },
            other => RemoteError::Transport {
                url: url.clone(),
                source: Box::new(other),
            },
        })?;
        let value: serde_json::Value = response
            .into_json()
            .map_err(|e| RemoteError::decode(&url, e.to_string()))?;
        check_envelope(&url, &value)?;
        Ok(value)
    }

    fn delete(&self, segments: &[&str]) -> Result<serde_json::Value, RemoteError> {
        let url = self.url(segments);
        let request = self.prepare(self.agent.delete(&url), &[]);
        self.dispatch(&url, request)
    }

    fn file_entries(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Vec<FileEntry>, RemoteError> {
        let url = self.url(segments);
        let value = self.get(segments, params)?;
        let files: FilesPayload = payload(&url, value)?;
        files
            .files
            .into_iter()
            .map(|f| f.into_entry(&url))
            .collect()
    }

    fn file_stubs(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Vec<FileStub>, RemoteError> {
        let url = self.url(segments);
        let value = self.get(segments, params)?;
        let files: FilesPayload = payload(&url, value)?;
        Ok(files.files.into_iter().map(|f| f.into_stub()).collect())
    }
}

impl RemoteStore for HttpRemoteStore {
    fn courses(&self) -> Result<Vec<CourseId>, RemoteError> {
        let url = self.url(&["courses"]);
        let value = self.get(&["courses"], &[])?;
        let courses: CoursesPayload = payload(&url, value)?;
        Ok(courses.courses.into_iter().map(CourseId).collect())
    }

    fn assignments(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError> {
        let segments = ["assignments", course.0.as_str()];
        let url = self.url(&segments);
        let value = self.get(&segments, &[])?;
        let assignments: AssignmentsPayload = payload(&url, value)?;
        Ok(assignments
            .assignments
            .into_iter()
            .map(AssignmentId)
            .collect())
    }

    fn solutions(&self, course: &CourseId) -> Result<Vec<AssignmentId>, RemoteError> {
        let segments = ["solutions", course.0.as_str()];
        let url = self.url(&segments);
        let value = self.get(&segments, &[])?;
        let solutions: SolutionsPayload = payload(&url, value)?;
        Ok(solutions.solutions.into_iter().map(AssignmentId).collect())
    }

    fn assignment_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.file_stubs(
            &["assignment", &course.0, &assignment.0],
            &[("list_only", "true")],
        )
    }

    fn assignment_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.file_entries(&["assignment", &course.0, &assignment.0], &[])
    }

    fn solution_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.file_stubs(
            &["solution", &course.0, &assignment.0],
            &[("list_only", "true")],
        )
    }

    fn solution_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.file_entries(&["solution", &course.0, &assignment.0], &[])
    }

    fn submissions(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: Option<&StudentId>,
    ) -> Result<Vec<SubmissionStub>, RemoteError> {
        let mut segments = vec!["submissions", course.0.as_str(), assignment.0.as_str()];
        if let Some(student) = student {
            segments.push(student.0.as_str());
        }
        let url = self.url(&segments);
        let value = self.get(&segments, &[])?;
        let submissions: SubmissionsPayload = payload(&url, value)?;
        Ok(submissions
            .submissions
            .into_iter()
            .map(Into::into)
            .collect())
    }

    fn submission_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.file_stubs(
            &["submission", &course.0, &assignment.0, &student.0],
            &[("list_only", "true"), ("timestamp", &timestamp.0)],
        )
    }

    fn submission_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.file_entries(
            &["submission", &course.0, &assignment.0, &student.0],
            &[("timestamp", &timestamp.0)],
        )
    }

    fn feedback_file_list(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileStub>, RemoteError> {
        self.file_stubs(
            &["feedback", &course.0, &assignment.0, &student.0],
            &[("list_only", "true"), ("timestamp", &timestamp.0)],
        )
    }

    fn feedback_files(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Result<Vec<FileEntry>, RemoteError> {
        self.file_entries(
            &["feedback", &course.0, &assignment.0, &student.0],
            &[("list_only", "false"), ("timestamp", &timestamp.0)],
        )
    }

    fn put_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        let body = encode_files(files);
        self.post_form(
            &["assignment", &course.0, &assignment.0],
            &[("files", body.as_str())],
        )?;
        Ok(())
    }

    fn put_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        let body = encode_files(files);
        self.post_form(
            &["solution", &course.0, &assignment.0],
            &[("files", body.as_str())],
        )?;
        Ok(())
    }

    fn post_submission(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        files: &[FileEntry],
    ) -> Result<Option<Timestamp>, RemoteError> {
        let segments = ["submission", course.0.as_str(), assignment.0.as_str()];
        let url = self.url(&segments);
        let body = encode_files(files);
        let value = self.post_form(&segments, &[("files", body.as_str())])?;
        let posted: PostSubmissionPayload = payload(&url, value)?;
        Ok(posted.timestamp.map(Timestamp))
    }

    fn post_feedback(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
        files: &[FileEntry],
    ) -> Result<(), RemoteError> {
        let body = encode_files(files);
        self.post_form(
            &["feedback", &course.0, &assignment.0, &student.0],
            &[("files", body.as_str()), ("timestamp", &timestamp.0)],
        )?;
        Ok(())
    }

    fn delete_assignment(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError> {
        self.delete(&["assignment", &course.0, &assignment.0])?;
        Ok(())
    }

    fn delete_solution(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
    ) -> Result<(), RemoteError> {
        self.delete(&["solution", &course.0, &assignment.0])?;
        Ok(())
    }
}

/// Percent-encode a single path segment (RFC 3986 unreserved set passes
/// through). Course and assignment ids are controlled, but student usernames
/// are free-form.
fn encode_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char);
            }
            other => {
                out.push('%');
                out.push_str(&format!("{other:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_and_encodes_segments() {
        let store = HttpRemoteStore::new("http://ngx.test/api/", None);
        assert_eq!(
            store.url(&["assignment", "math101", "ps1"]),
            "http://ngx.test/api/assignment/math101/ps1"
        );
        assert_eq!(
            store.url(&["submission", "math101", "ps1", "ada lovelace+x"]),
            "http://ngx.test/api/submission/math101/ps1/ada%20lovelace%2Bx"
        );
    }

    #[test]
    fn encode_segment_passes_unreserved() {
        assert_eq!(encode_segment("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }
}
