//! Wire payload types for the remote artifact service.
//!
//! Every response is decoded exactly once, here, into typed values. Nothing
//! downstream re-inspects JSON by key: the engine and the operations only
//! ever see `Result<T, RemoteError>`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;

use satchel_core::types::{FileEntry, FileStub, StudentId, SubmissionStub, Timestamp};

use crate::error::RemoteError;

/// The `{success, message}` envelope every endpoint carries.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reject the envelope when `success=false`, surfacing the server message.
pub(crate) fn check_envelope(url: &str, value: &serde_json::Value) -> Result<(), RemoteError> {
    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(|e| RemoteError::decode(url, e.to_string()))?;
    if !envelope.success {
        return Err(RemoteError::Failure {
            url: url.to_string(),
            message: envelope
                .message
                .unwrap_or_else(|| "no error message".to_string()),
        });
    }
    Ok(())
}

/// Decode the payload portion of an already-validated envelope.
pub(crate) fn payload<T: serde::de::DeserializeOwned>(
    url: &str,
    value: serde_json::Value,
) -> Result<T, RemoteError> {
    serde_json::from_value(value).map_err(|e| RemoteError::decode(url, e.to_string()))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoursesPayload {
    pub courses: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignmentsPayload {
    pub assignments: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SolutionsPayload {
    pub solutions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilesPayload {
    pub files: Vec<FilePayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionsPayload {
    pub submissions: Vec<SubmissionPayload>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionPayload {
    pub student_id: String,
    pub timestamp: String,
}

impl From<SubmissionPayload> for SubmissionStub {
    fn from(p: SubmissionPayload) -> Self {
        SubmissionStub {
            student_id: StudentId(p.student_id),
            timestamp: Timestamp(p.timestamp),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostSubmissionPayload {
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One file on the wire: path plus base64 content (full transfers) or
/// checksum (`list_only` transfers).
#[derive(Debug, Deserialize)]
pub(crate) struct FilePayload {
    pub path: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub checksum: Option<String>,
}

impl FilePayload {
    pub fn into_entry(self, url: &str) -> Result<FileEntry, RemoteError> {
        let encoded = self.content.ok_or_else(|| {
            RemoteError::decode(url, format!("file {:?} has no content", self.path))
        })?;
        let content = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| RemoteError::decode(url, format!("file {:?}: {e}", self.path)))?;
        Ok(FileEntry {
            path: self.path,
            content,
        })
    }

    pub fn into_stub(self) -> FileStub {
        FileStub {
            path: self.path,
            checksum: self.checksum,
        }
    }
}

/// Serialize entries into the `files` form field the service expects:
/// a JSON array of `{path, content}` with base64 content.
pub(crate) fn encode_files(entries: &[FileEntry]) -> String {
    let encoded: Vec<serde_json::Value> = entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "path": entry.path,
                "content": BASE64.encode(&entry.content),
            })
        })
        .collect();
    serde_json::Value::Array(encoded).to_string()
}
