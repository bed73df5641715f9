//! Feedback transfer, both directions.
//!
//! Students fetch feedback for timestamps discovered in their local cache;
//! instructors release graded HTML staged under
//! `<feedback_dir>/<student>/<assignment>/`.

use std::fs;

use satchel_client::RemoteStore;
use satchel_core::cache::{course_cache_dir, parse_key};
use satchel_core::types::{AssignmentId, CourseId, FileEntry, StudentId, Timestamp};
use satchel_core::ExchangeConfig;

use crate::codec::decode_dir;
use crate::error::{io_err, ExchangeError};
use crate::TIMESTAMP_FILE;

#[derive(Debug, Clone)]
pub struct FetchFeedbackRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
}

/// Fetch feedback for every cached submission of `(username, assignment)`.
///
/// Each cache entry names one submission timestamp; feedback lands in
/// `<assignment root>/feedback/<timestamp>/`. Per-timestamp remote failures
/// are logged and skipped. Returns the timestamps that produced files.
pub fn fetch_feedback(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &FetchFeedbackRequest,
) -> Result<Vec<Timestamp>, ExchangeError> {
    let timestamps = cached_timestamps(config, &request.course, &request.assignment)?;
    if timestamps.is_empty() {
        tracing::warn!(
            "no cached submissions for {}/{}; nothing to fetch feedback for",
            request.course,
            request.assignment
        );
        return Ok(Vec::new());
    }

    let feedback_root = config.feedback_root(&request.course, &request.assignment);
    let mut fetched = Vec::new();
    for timestamp in timestamps {
        let files = match store.feedback_files(
            &request.course,
            &request.assignment,
            &config.username,
            &timestamp,
        ) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("feedback for timestamp {} unavailable: {}", timestamp, e);
                continue;
            }
        };
        if files.is_empty() {
            tracing::debug!("no feedback released yet for timestamp {}", timestamp);
            continue;
        }
        let dest = feedback_root.join(&timestamp.0);
        decode_dir(&files, &dest, None, false)?;
        tracing::info!(
            "fetched feedback for {}/{} @ {} into {}",
            request.course,
            request.assignment,
            timestamp,
            dest.display()
        );
        fetched.push(timestamp);
    }
    Ok(fetched)
}

/// Submission timestamps recorded in the local cache for the acting user,
/// sorted ascending. Malformed entry names are skipped with a warning.
fn cached_timestamps(
    config: &ExchangeConfig,
    course: &CourseId,
    assignment: &AssignmentId,
) -> Result<Vec<Timestamp>, ExchangeError> {
    let dir = course_cache_dir(&config.cache_dir, course);
    let pattern = format!(
        "{}/{}+{}+*",
        dir.display(),
        config.username.0,
        assignment.0
    );
    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            tracing::error!("bad cache pattern {:?}: {}", pattern, e);
            return Ok(Vec::new());
        }
    };

    let mut timestamps = Vec::new();
    for path in paths.flatten() {
        if !path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match parse_key(&name) {
            Ok(parts) => timestamps.push(parts.timestamp),
            Err(e) => tracing::warn!("skipping cache entry: {}", e),
        }
    }
    timestamps.sort();
    timestamps.dedup();
    Ok(timestamps)
}

#[derive(Debug, Clone)]
pub struct ReleaseFeedbackRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
}

/// Release staged feedback for every student directory under
/// `<feedback_dir>`. Each stage is `<feedback_dir>/<student>/<assignment>/`
/// holding graded `*.html` plus the submission's `timestamp.txt`. Per-student
/// failures are logged and skipped. Returns how many students were posted.
pub fn release_feedback(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &ReleaseFeedbackRequest,
) -> Result<usize, ExchangeError> {
    if !config.feedback_dir.is_dir() {
        return Err(ExchangeError::SourceMissing {
            path: config.feedback_dir.clone(),
        });
    }
    let students = fs::read_dir(&config.feedback_dir)
        .map_err(|e| io_err(&config.feedback_dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(&config.feedback_dir, e))?;

    let mut released = 0;
    for entry in students {
        if !entry.path().is_dir() {
            continue;
        }
        let student = StudentId(entry.file_name().to_string_lossy().into_owned());
        let stage = entry.path().join(&request.assignment.0);
        if !stage.is_dir() {
            continue;
        }

        let timestamp_path = stage.join(TIMESTAMP_FILE);
        let timestamp = match fs::read_to_string(&timestamp_path) {
            Ok(raw) => Timestamp(raw.trim().to_string()),
            Err(e) => {
                tracing::warn!(
                    "skipping feedback for {}: no readable {} ({})",
                    student,
                    timestamp_path.display(),
                    e
                );
                continue;
            }
        };

        let files = match staged_html(&stage) {
            Ok(files) if files.is_empty() => {
                tracing::warn!("no feedback HTML staged for {} in {}", student, stage.display());
                continue;
            }
            Ok(files) => files,
            Err(e) => {
                tracing::error!("cannot read staged feedback for {}: {}", student, e);
                continue;
            }
        };

        match store.post_feedback(
            &request.course,
            &request.assignment,
            &student,
            &timestamp,
            &files,
        ) {
            Ok(()) => {
                tracing::info!(
                    "released feedback for {}/{}/{} @ {}",
                    request.course,
                    request.assignment,
                    student,
                    timestamp
                );
                released += 1;
            }
            Err(e) => {
                tracing::error!("failed to release feedback for {}: {}", student, e);
            }
        }
    }
    Ok(released)
}

fn staged_html(stage: &std::path::Path) -> Result<Vec<FileEntry>, ExchangeError> {
    let mut children = fs::read_dir(stage)
        .map_err(|e| io_err(stage, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_err(stage, e))?;
    children.sort_by_key(|entry| entry.file_name());

    let mut files = Vec::new();
    for child in children {
        let name = child.file_name().to_string_lossy().into_owned();
        if !name.ends_with(".html") {
            continue;
        }
        let path = child.path();
        let content = fs::read(&path).map_err(|e| io_err(&path, e))?;
        files.push(FileEntry::new(name, content));
    }
    Ok(files)
}
