//! Fetching a released solution into a fetched assignment's working copy.

use std::path::PathBuf;

use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId};
use satchel_core::ExchangeConfig;

use crate::codec::decode_dir;
use crate::error::ExchangeError;
use crate::ignore::IgnoreRules;

#[derive(Debug, Clone)]
pub struct FetchSolutionRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
}

/// Download a solution into `<assignment root>/solution`.
///
/// Blocked until the assignment itself has a local working copy; a solution
/// without its assignment has nowhere meaningful to land. Existing local
/// files are never overwritten.
pub fn fetch_solution(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &FetchSolutionRequest,
) -> Result<PathBuf, ExchangeError> {
    let assignment_root = config.assignment_root(&request.course, &request.assignment);
    if !assignment_root.is_dir() {
        return Err(ExchangeError::AssignmentNotFetched {
            assignment: request.assignment.0.clone(),
        });
    }

    let files = store.solution_files(&request.course, &request.assignment)?;
    let dest = config.solution_root(&request.course, &request.assignment);
    tracing::info!(
        "fetching solution {}/{}: {} files into {}",
        request.course,
        request.assignment,
        files.len(),
        dest.display()
    );

    let rules = IgnoreRules::from_config(config);
    decode_dir(&files, &dest, Some(&rules), true)?;
    Ok(dest)
}
