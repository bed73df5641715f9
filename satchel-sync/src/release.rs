//! Instructor-side release of assignments and solutions.
//!
//! Both follow the same shape: probe the remote listing for an existing
//! release, refuse to replace it unless forced, then encode the instructor's
//! directory and post it.

use satchel_client::RemoteStore;
use satchel_core::types::{AssignmentId, CourseId};
use satchel_core::ExchangeConfig;

use crate::codec::encode_dir;
use crate::error::ExchangeError;
use crate::ignore::IgnoreRules;

#[derive(Debug, Clone)]
pub struct ReleaseRequest {
    pub course: CourseId,
    pub assignment: AssignmentId,
    /// Delete an existing remote release and replace it.
    pub force: bool,
}

/// Release `<release_dir>/<assignment>` to the remote store. Returns the
/// number of files posted.
pub fn release_assignment(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &ReleaseRequest,
) -> Result<usize, ExchangeError> {
    let src = config.release_dir.join(&request.assignment.0);
    if !src.is_dir() {
        return Err(ExchangeError::SourceMissing { path: src });
    }

    let existing = store.assignments(&request.course)?;
    if existing.contains(&request.assignment) {
        if !request.force {
            return Err(ExchangeError::AlreadyReleased {
                course: request.course.0.clone(),
                assignment: request.assignment.0.clone(),
            });
        }
        tracing::info!(
            "replacing released assignment {}/{}",
            request.course,
            request.assignment
        );
        store.delete_assignment(&request.course, &request.assignment)?;
    }

    let rules = IgnoreRules::from_config(config);
    let files = encode_dir(&src, &rules)?;
    store.put_assignment(&request.course, &request.assignment, &files)?;
    tracing::info!(
        "released {}/{} ({} files)",
        request.course,
        request.assignment,
        files.len()
    );
    Ok(files.len())
}

/// Release `<solution_dir>/<assignment>` to the remote store. Returns the
/// number of files posted.
pub fn release_solution(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &ReleaseRequest,
) -> Result<usize, ExchangeError> {
    let src = config.solution_dir.join(&request.assignment.0);
    if !src.is_dir() {
        return Err(ExchangeError::SourceMissing { path: src });
    }

    let existing = store.solutions(&request.course)?;
    if existing.contains(&request.assignment) {
        if !request.force {
            return Err(ExchangeError::AlreadyReleased {
                course: request.course.0.clone(),
                assignment: request.assignment.0.clone(),
            });
        }
        tracing::info!(
            "replacing released solution {}/{}",
            request.course,
            request.assignment
        );
        store.delete_solution(&request.course, &request.assignment)?;
    }

    let rules = IgnoreRules::from_config(config);
    let files = encode_dir(&src, &rules)?;
    store.put_solution(&request.course, &request.assignment, &files)?;
    tracing::info!(
        "released solution {}/{} ({} files)",
        request.course,
        request.assignment,
        files.len()
    );
    Ok(files.len())
}
