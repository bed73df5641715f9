//! Fetching a released assignment into the working directory.

use std::path::PathBuf;

use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId};
use satchel_core::ExchangeConfig;

use crate::codec::decode_dir;
use crate::error::ExchangeError;
use crate::ignore::IgnoreRules;

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
    /// Allow fetching into an existing working copy. Existing files are
    /// never overwritten; only missing files are restored.
    pub replace: bool,
}

/// Download an assignment and materialize it under the working directory.
/// Returns the destination root.
pub fn fetch_assignment(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &FetchRequest,
) -> Result<PathBuf, ExchangeError> {
    let dest = config.assignment_root(&request.course, &request.assignment);
    if dest.exists() && !request.replace {
        return Err(ExchangeError::LocalConflict { path: dest });
    }

    let files = store.assignment_files(&request.course, &request.assignment)?;
    tracing::info!(
        "fetching {}/{}: {} files into {}",
        request.course,
        request.assignment,
        files.len(),
        dest.display()
    );

    let rules = IgnoreRules::from_config(config);
    decode_dir(&files, &dest, Some(&rules), request.replace)?;
    Ok(dest)
}
