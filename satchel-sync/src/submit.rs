//! Submitting a working copy.
//!
//! A submission is the encoded working directory plus a `timestamp.txt`
//! marker. After the remote store accepts it, the same file set is mirrored
//! into the local cache under the composite key so later feedback fetches
//! and cached listings can find it without the network.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rand::distributions::Alphanumeric;
use rand::Rng;

use satchel_client::RemoteStore;
use satchel_core::cache::{course_cache_dir, make_key, make_key_with_suffix};
use satchel_core::types::{stem_with_extension, AssignmentId, CourseId, FileEntry, Timestamp};
use satchel_core::ExchangeConfig;

use crate::codec::{decode_dir, encode_dir};
use crate::error::ExchangeError;
use crate::ignore::IgnoreRules;
use crate::TIMESTAMP_FILE;

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
}

/// What a successful submit produced.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    pub timestamp: Timestamp,
    pub cache_entry: PathBuf,
    pub file_count: usize,
}

/// Encode the working copy, post it, and mirror it into the cache.
pub fn submit(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &SubmitRequest,
) -> Result<SubmitReceipt, ExchangeError> {
    let src = config.assignment_root(&request.course, &request.assignment);
    if !src.is_dir() {
        return Err(ExchangeError::SourceMissing { path: src });
    }

    let rules = IgnoreRules::from_config(config);
    let mut files = encode_dir(&src, &rules)?;
    check_missing_notebooks(store, config, request, &files)?;

    let local_timestamp = Timestamp::now();
    files.retain(|f| f.path != TIMESTAMP_FILE);
    files.push(FileEntry::new(
        TIMESTAMP_FILE,
        local_timestamp.0.as_bytes().to_vec(),
    ));

    let posted = store.post_submission(&request.course, &request.assignment, &files)?;
    // the service's clock wins when it reports one
    let timestamp = posted.unwrap_or(local_timestamp);

    let key = if config.add_random_string {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        make_key_with_suffix(&config.username, &request.assignment, &timestamp, &suffix)
    } else {
        make_key(&config.username, &request.assignment, &timestamp)
    };
    let cache_entry = course_cache_dir(&config.cache_dir, &request.course).join(key);

    files.retain(|f| f.path != TIMESTAMP_FILE);
    files.push(FileEntry::new(
        TIMESTAMP_FILE,
        timestamp.0.as_bytes().to_vec(),
    ));
    decode_dir(&files, &cache_entry, None, false)?;

    tracing::info!(
        "submitted {}/{} @ {} ({} files), cached at {}",
        request.course,
        request.assignment,
        timestamp,
        files.len(),
        cache_entry.display()
    );
    Ok(SubmitReceipt {
        timestamp,
        cache_entry,
        file_count: files.len(),
    })
}

/// Compare the submitted notebook set against the released one. Missing
/// notebooks are a warning, or fatal under `strict`. An unavailable release
/// listing skips the check.
fn check_missing_notebooks(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &SubmitRequest,
    files: &[FileEntry],
) -> Result<(), ExchangeError> {
    let released = match store.assignment_file_list(&request.course, &request.assignment) {
        Ok(stubs) => stubs,
        Err(e) => {
            tracing::warn!(
                "cannot verify notebook set for {}/{}: {}",
                request.course,
                request.assignment,
                e
            );
            return Ok(());
        }
    };

    let submitted: BTreeSet<&str> = files
        .iter()
        .filter_map(|f| stem_with_extension(&f.path, ".ipynb"))
        .collect();
    let missing: Vec<String> = released
        .iter()
        .filter_map(|s| stem_with_extension(&s.path, ".ipynb"))
        .filter(|id| !submitted.contains(id))
        .map(|id| id.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    if config.strict {
        return Err(ExchangeError::MissingNotebooks { missing });
    }
    for id in &missing {
        tracing::warn!(
            "submission for {}/{} is missing released notebook {}",
            request.course,
            request.assignment,
            id
        );
    }
    Ok(())
}
