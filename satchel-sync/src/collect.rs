//! Instructor-side harvest of submissions.

use std::fs;

use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId, StudentId, Timestamp};
use satchel_core::ExchangeConfig;

use crate::codec::decode_dir;
use crate::error::{io_err, ExchangeError};
use crate::TIMESTAMP_FILE;

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
    /// Restrict the harvest to one student.
    pub student: Option<StudentId>,
    /// Re-collect a student when the remote store has a newer submission
    /// than the one already on disk.
    pub update: bool,
}

/// Download the latest submission per student into
/// `<submitted_dir>/<student>/<assignment>`. Returns the number of
/// submissions written.
pub fn collect(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &CollectRequest,
) -> Result<usize, ExchangeError> {
    let stubs = store.submissions(&request.course, &request.assignment, request.student.as_ref())?;

    // latest per student; timestamps sort lexicographically = chronologically
    let mut latest: BTreeMap<StudentId, Timestamp> = BTreeMap::new();
    for stub in stubs {
        let slot = latest.entry(stub.student_id).or_insert_with(|| stub.timestamp.clone());
        if stub.timestamp > *slot {
            *slot = stub.timestamp;
        }
    }

    let mut collected = 0;
    for (student, timestamp) in latest {
        let dest = config
            .submitted_dir
            .join(&student.0)
            .join(&request.assignment.0);

        if let Some(existing) = existing_timestamp(&dest) {
            if !request.update {
                tracing::info!(
                    "already collected {} (pass --update to re-collect)",
                    student
                );
                continue;
            }
            if existing >= timestamp {
                tracing::debug!("{} is up to date at {}", student, existing);
                continue;
            }
        }

        let files = match store.submission_files(
            &request.course,
            &request.assignment,
            &student,
            &timestamp,
        ) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("cannot download submission from {}: {}", student, e);
                continue;
            }
        };

        // replace wholesale so stale files from an older collection vanish
        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| io_err(&dest, e))?;
        }
        decode_dir(&files, &dest, None, false)?;
        if !dest.join(TIMESTAMP_FILE).exists() {
            let path = dest.join(TIMESTAMP_FILE);
            fs::write(&path, timestamp.0.as_bytes()).map_err(|e| io_err(&path, e))?;
        }

        tracing::info!(
            "collected {}/{} from {} @ {}",
            request.course,
            request.assignment,
            student,
            timestamp
        );
        collected += 1;
    }
    Ok(collected)
}

/// The timestamp recorded by a previous collection, if any.
fn existing_timestamp(dest: &std::path::Path) -> Option<Timestamp> {
    let raw = fs::read_to_string(dest.join(TIMESTAMP_FILE)).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Timestamp(trimmed.to_string()))
    }
}
