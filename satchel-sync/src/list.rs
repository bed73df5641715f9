//! The reconciliation engine.
//!
//! A listing is a pure function of the remote store and the local filesystem
//! at call time: resolve the scope to candidates, classify each candidate's
//! status, enumerate its notebooks, and (for submissions) compute per-notebook
//! feedback freshness. Nothing is persisted between runs.
//!
//! Failure isolation: the initial course query is fatal, everything after it
//! is per-candidate. A candidate whose remote data cannot be fetched is
//! logged and skipped (or degraded to an empty feedback map); a partial
//! report always beats no report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use satchel_client::RemoteStore;
use satchel_core::cache::{course_cache_dir, parse_key};
use satchel_core::config::validate_student_id;
use satchel_core::types::{
    md5_hex, stem_with_extension, AssignmentId, CourseId, StudentId, Timestamp,
};
use satchel_core::ExchangeConfig;

use crate::error::ExchangeError;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// What kind of artifacts to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Released assignments, from the caller's point of view as a student.
    Outbound,
    /// Submissions on the remote store, from the instructor's point of view.
    Inbound,
    /// Submissions mirrored in the local cache.
    Cached,
    /// Released solutions.
    Solution,
}

/// Scope selectors. `None` means wildcard.
#[derive(Debug, Clone, Default)]
pub struct ListScope {
    pub course: Option<CourseId>,
    pub assignment: Option<AssignmentId>,
    pub student: Option<StudentId>,
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub mode: ListMode,
    pub scope: ListScope,
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Derived per-candidate status. Never stored anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    Released,
    Fetched,
    Submitted,
    Removed,
    ReleasedSolution,
    FetchedSolution,
    /// The solution exists but its assignment has no local copy yet; a
    /// blocking precondition, not an error.
    FetchAssignment,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Released => "released",
            AssignmentStatus::Fetched => "fetched",
            AssignmentStatus::Submitted => "submitted",
            AssignmentStatus::Removed => "removed",
            AssignmentStatus::ReleasedSolution => "released_solution",
            AssignmentStatus::FetchedSolution => "fetched_solution",
            AssignmentStatus::FetchAssignment => "fetch_assignment",
        }
    }
}

/// One notebook's feedback-freshness verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookInfo {
    pub notebook_id: String,
    pub has_local_feedback: bool,
    pub has_exchange_feedback: bool,
    pub feedback_updated: bool,
}

/// One classified candidate: an assignment for outbound/solution modes, a
/// single submission for inbound/cached modes.
#[derive(Debug, Clone)]
pub struct ListingEntry {
    pub course_id: CourseId,
    pub assignment_id: AssignmentId,
    pub student_id: Option<StudentId>,
    pub timestamp: Option<Timestamp>,
    pub status: AssignmentStatus,
    pub notebooks: Vec<NotebookInfo>,
    /// AND over notebooks; vacuously false when there are none.
    pub has_local_feedback: bool,
    /// AND over notebooks; vacuously false when there are none.
    pub has_exchange_feedback: bool,
    /// OR over notebooks: one changed notebook is enough to refetch.
    pub feedback_updated: bool,
    /// The directory a cached-mode removal deletes.
    pub local_path: Option<PathBuf>,
}

/// Submissions for one `(course, student, assignment)` key, sorted ascending
/// by timestamp. `status` is anchored on the earliest submission, not
/// aggregated over the group.
#[derive(Debug, Clone)]
pub struct SubmissionGroup {
    pub course_id: CourseId,
    pub student_id: StudentId,
    pub assignment_id: AssignmentId,
    pub status: AssignmentStatus,
    pub submissions: Vec<ListingEntry>,
}

#[derive(Debug, Clone)]
pub enum ListReport {
    /// Outbound and solution modes: one entry per assignment.
    Assignments(Vec<ListingEntry>),
    /// Inbound and cached modes: grouped per (course, student, assignment).
    Groups(Vec<SubmissionGroup>),
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Run a full reconciliation pass and produce the report.
pub fn list(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &ListRequest,
) -> Result<ListReport, ExchangeError> {
    if let Some(student) = &request.scope.student {
        validate_student_id(student)?;
    }
    let lister = Lister { store, config };

    match request.mode {
        ListMode::Outbound | ListMode::Solution => {
            let entries = lister.list_assignments(request)?;
            Ok(ListReport::Assignments(entries))
        }
        ListMode::Inbound => {
            let entries = lister.list_inbound(request)?;
            Ok(ListReport::Groups(group_submissions(entries)))
        }
        ListMode::Cached => {
            let entries = lister.list_cached(request)?;
            Ok(ListReport::Groups(group_submissions(entries)))
        }
    }
}

/// Classify, then act: remote deletes for outbound/solution candidates,
/// local cache deletes for cached candidates. Inbound removal is unsupported
/// by the remote service and is reported without acting. Every entry that
/// was actually removed is re-stamped [`AssignmentStatus::Removed`].
pub fn remove(
    store: &dyn RemoteStore,
    config: &ExchangeConfig,
    request: &ListRequest,
) -> Result<ListReport, ExchangeError> {
    let report = list(store, config, request)?;

    match (request.mode, report) {
        (ListMode::Outbound, ListReport::Assignments(mut entries)) => {
            for entry in &mut entries {
                tracing::info!(
                    "removing assignment {}/{} ({})",
                    entry.course_id,
                    entry.assignment_id,
                    entry.status.as_str()
                );
                match store.delete_assignment(&entry.course_id, &entry.assignment_id) {
                    Ok(()) => entry.status = AssignmentStatus::Removed,
                    Err(e) => tracing::error!(
                        "failed to remove {}/{}: {}",
                        entry.course_id,
                        entry.assignment_id,
                        e
                    ),
                }
            }
            Ok(ListReport::Assignments(entries))
        }
        (ListMode::Solution, ListReport::Assignments(mut entries)) => {
            for entry in &mut entries {
                tracing::info!(
                    "removing solution {}/{} ({})",
                    entry.course_id,
                    entry.assignment_id,
                    entry.status.as_str()
                );
                match store.delete_solution(&entry.course_id, &entry.assignment_id) {
                    Ok(()) => entry.status = AssignmentStatus::Removed,
                    Err(e) => tracing::error!(
                        "failed to remove solution {}/{}: {}",
                        entry.course_id,
                        entry.assignment_id,
                        e
                    ),
                }
            }
            Ok(ListReport::Assignments(entries))
        }
        (ListMode::Cached, ListReport::Groups(mut groups)) => {
            for group in &mut groups {
                let mut all_removed = true;
                for submission in &mut group.submissions {
                    let Some(path) = &submission.local_path else {
                        all_removed = false;
                        continue;
                    };
                    tracing::info!("removing cached submission {}", path.display());
                    match fs::remove_dir_all(path) {
                        Ok(()) => submission.status = AssignmentStatus::Removed,
                        Err(e) => {
                            all_removed = false;
                            tracing::error!("failed to remove {}: {}", path.display(), e);
                        }
                    }
                }
                if all_removed {
                    group.status = AssignmentStatus::Removed;
                }
            }
            Ok(ListReport::Groups(groups))
        }
        (ListMode::Inbound, report) => {
            tracing::warn!("removing inbound submissions is not supported; listing only");
            Ok(report)
        }
        // list() pairs outbound/solution with Assignments and inbound/cached
        // with Groups; the remaining combinations cannot occur.
        (_, report) => Ok(report),
    }
}

struct Lister<'a> {
    store: &'a dyn RemoteStore,
    config: &'a ExchangeConfig,
}

impl Lister<'_> {
    /// The course set. A wildcard queries the remote store and a failure
    /// there is fatal: with no course list there is nothing to report.
    fn courses(&self, scope: &ListScope) -> Result<Vec<CourseId>, ExchangeError> {
        match &scope.course {
            Some(course) => Ok(vec![course.clone()]),
            None => Ok(self.store.courses()?),
        }
    }

    /// Cross product of courses and their assignment (or solution) listings,
    /// in course-major, assignment-minor order. A failing per-course listing
    /// drops that course only.
    fn candidates(
        &self,
        request: &ListRequest,
    ) -> Result<Vec<(CourseId, AssignmentId)>, ExchangeError> {
        let mut pairs = Vec::new();
        for course in self.courses(&request.scope)? {
            let assignments = match &request.scope.assignment {
                Some(assignment) => vec![assignment.clone()],
                None => {
                    let listed = if request.mode == ListMode::Solution {
                        self.store.solutions(&course)
                    } else {
                        self.store.assignments(&course)
                    };
                    match listed {
                        Ok(mut ids) => {
                            ids.sort();
                            ids
                        }
                        Err(e) => {
                            tracing::error!("skipping course {}: {}", course, e);
                            continue;
                        }
                    }
                }
            };
            pairs.extend(assignments.into_iter().map(|a| (course.clone(), a)));
        }
        pairs.sort();
        Ok(pairs)
    }

    fn list_assignments(&self, request: &ListRequest) -> Result<Vec<ListingEntry>, ExchangeError> {
        let solution = request.mode == ListMode::Solution;
        let mut entries = Vec::new();

        for (course, assignment) in self.candidates(request)? {
            let assignment_root = self.config.assignment_root(&course, &assignment);
            let status = if solution {
                if !assignment_root.is_dir() {
                    AssignmentStatus::FetchAssignment
                } else if self.config.solution_root(&course, &assignment).is_dir() {
                    AssignmentStatus::FetchedSolution
                } else {
                    AssignmentStatus::ReleasedSolution
                }
            } else if assignment_root.is_dir() {
                AssignmentStatus::Fetched
            } else {
                AssignmentStatus::Released
            };

            let notebooks = self.assignment_notebooks(&course, &assignment, status);
            if notebooks.is_empty() {
                tracing::warn!("no notebooks found for {}/{}", course, assignment);
            }
            let notebooks = notebooks
                .into_iter()
                .map(|notebook_id| NotebookInfo {
                    notebook_id,
                    has_local_feedback: false,
                    has_exchange_feedback: false,
                    feedback_updated: false,
                })
                .collect();

            let local_path = match status {
                AssignmentStatus::Fetched => Some(assignment_root),
                AssignmentStatus::FetchedSolution => {
                    Some(self.config.solution_root(&course, &assignment))
                }
                _ => None,
            };
            entries.push(ListingEntry {
                course_id: course,
                assignment_id: assignment,
                student_id: None,
                timestamp: None,
                status,
                notebooks,
                has_local_feedback: false,
                has_exchange_feedback: false,
                feedback_updated: false,
                local_path,
            });
        }
        Ok(entries)
    }

    /// Notebook ids for an outbound/solution candidate: a local glob when a
    /// local copy exists, a remote `list_only` query otherwise.
    fn assignment_notebooks(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        status: AssignmentStatus,
    ) -> Vec<String> {
        match status {
            AssignmentStatus::Fetched => {
                local_notebooks(&self.config.assignment_root(course, assignment))
            }
            AssignmentStatus::FetchedSolution => {
                local_notebooks(&self.config.solution_root(course, assignment))
            }
            AssignmentStatus::Released => match self.store.assignment_file_list(course, assignment)
            {
                Ok(stubs) => remote_notebooks(stubs.iter().map(|s| s.path.as_str())),
                Err(e) => {
                    tracing::error!("file listing for {}/{} failed: {}", course, assignment, e);
                    Vec::new()
                }
            },
            // fetch_assignment still has no local copy, so the remote
            // solution listing is the only notebook source
            AssignmentStatus::ReleasedSolution | AssignmentStatus::FetchAssignment => {
                match self.store.solution_file_list(course, assignment) {
                    Ok(stubs) => remote_notebooks(stubs.iter().map(|s| s.path.as_str())),
                    Err(e) => {
                        tracing::error!(
                            "solution listing for {}/{} failed: {}",
                            course,
                            assignment,
                            e
                        );
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    fn list_inbound(&self, request: &ListRequest) -> Result<Vec<ListingEntry>, ExchangeError> {
        let mut entries = Vec::new();
        for (course, assignment) in self.candidates(request)? {
            let stubs = match self
                .store
                .submissions(&course, &assignment, request.scope.student.as_ref())
            {
                Ok(stubs) => stubs,
                Err(e) => {
                    tracing::error!("submissions for {}/{} unavailable: {}", course, assignment, e);
                    continue;
                }
            };
            for stub in stubs {
                let notebooks = self.submission_notebooks(
                    &course,
                    &assignment,
                    &stub.student_id,
                    &stub.timestamp,
                );
                entries.push(self.submission_entry(
                    course.clone(),
                    assignment.clone(),
                    stub.student_id,
                    stub.timestamp,
                    notebooks,
                    None,
                ));
            }
        }
        Ok(entries)
    }

    fn list_cached(&self, request: &ListRequest) -> Result<Vec<ListingEntry>, ExchangeError> {
        let student_pat = request
            .scope
            .student
            .as_ref()
            .map_or("*", |s| s.0.as_str());
        let assignment_pat = request
            .scope
            .assignment
            .as_ref()
            .map_or("*", |a| a.0.as_str());

        let mut entries = Vec::new();
        for course in self.courses(&request.scope)? {
            let dir = course_cache_dir(&self.config.cache_dir, &course);
            let pattern = format!(
                "{}/{}+{}+*",
                dir.display(),
                student_pat,
                assignment_pat
            );
            let paths = match glob::glob(&pattern) {
                Ok(paths) => paths,
                Err(e) => {
                    tracing::error!("bad cache pattern {:?}: {}", pattern, e);
                    continue;
                }
            };
            for path in paths.flatten() {
                if !path.is_dir() {
                    continue;
                }
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let parts = match parse_key(&name) {
                    Ok(parts) => parts,
                    Err(e) => {
                        tracing::warn!("skipping cache entry: {}", e);
                        continue;
                    }
                };
                let notebooks = local_notebooks(&path);
                entries.push(self.submission_entry(
                    course.clone(),
                    parts.assignment_id,
                    parts.student_id,
                    parts.timestamp,
                    notebooks,
                    Some(path),
                ));
            }
        }
        entries.sort_by(|a, b| {
            (&a.course_id, &a.student_id, &a.assignment_id, &a.timestamp).cmp(&(
                &b.course_id,
                &b.student_id,
                &b.assignment_id,
                &b.timestamp,
            ))
        });
        Ok(entries)
    }

    /// Notebook ids for one inbound submission, from a remote `list_only`
    /// query. Unavailable listings degrade to empty.
    fn submission_notebooks(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> Vec<String> {
        match self
            .store
            .submission_file_list(course, assignment, student, timestamp)
        {
            Ok(stubs) => remote_notebooks(stubs.iter().map(|s| s.path.as_str())),
            Err(e) => {
                tracing::error!(
                    "submission listing for {}/{}/{} failed: {}",
                    course,
                    assignment,
                    student,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Build a submitted-status entry with its feedback-freshness verdicts.
    fn submission_entry(
        &self,
        course: CourseId,
        assignment: AssignmentId,
        student: StudentId,
        timestamp: Timestamp,
        notebook_ids: Vec<String>,
        local_path: Option<PathBuf>,
    ) -> ListingEntry {
        if notebook_ids.is_empty() {
            tracing::warn!(
                "no notebooks in submission {}/{}/{} @ {}",
                course,
                assignment,
                student,
                timestamp
            );
        }
        let checksums = self.feedback_checksums(&course, &assignment, &student, &timestamp);
        let feedback_dir = self
            .config
            .feedback_root(&course, &assignment)
            .join(&timestamp.0);

        let notebooks: Vec<NotebookInfo> = notebook_ids
            .into_iter()
            .map(|notebook_id| {
                let local_file = feedback_dir.join(format!("{notebook_id}.html"));
                let remote_checksum = checksums
                    .get(&notebook_id)
                    .filter(|c| !c.is_empty())
                    .cloned();
                let has_local_feedback = local_file.is_file();
                let has_exchange_feedback = remote_checksum.is_some();
                let feedback_updated = match (&remote_checksum, has_local_feedback) {
                    (Some(remote), true) => match fs::read(&local_file) {
                        Ok(bytes) => md5_hex(&bytes) != *remote,
                        Err(e) => {
                            tracing::warn!(
                                "cannot read local feedback {}: {}",
                                local_file.display(),
                                e
                            );
                            false
                        }
                    },
                    _ => false,
                };
                NotebookInfo {
                    notebook_id,
                    has_local_feedback,
                    has_exchange_feedback,
                    feedback_updated,
                }
            })
            .collect();

        // AND/AND/OR: "fully fetched" needs every notebook local, but one
        // changed notebook is enough to report an update.
        let has_local_feedback =
            !notebooks.is_empty() && notebooks.iter().all(|n| n.has_local_feedback);
        let has_exchange_feedback =
            !notebooks.is_empty() && notebooks.iter().all(|n| n.has_exchange_feedback);
        let feedback_updated = notebooks.iter().any(|n| n.feedback_updated);

        ListingEntry {
            course_id: course,
            assignment_id: assignment,
            student_id: Some(student),
            timestamp: Some(timestamp),
            status: AssignmentStatus::Submitted,
            notebooks,
            has_local_feedback,
            has_exchange_feedback,
            feedback_updated,
            local_path,
        }
    }

    /// Remote feedback checksums for one submission, keyed by notebook id.
    /// Degrades to empty on failure: the listing still renders, just without
    /// exchange-side feedback.
    fn feedback_checksums(
        &self,
        course: &CourseId,
        assignment: &AssignmentId,
        student: &StudentId,
        timestamp: &Timestamp,
    ) -> BTreeMap<String, String> {
        match self
            .store
            .feedback_file_list(course, assignment, student, timestamp)
        {
            Ok(stubs) => stubs
                .into_iter()
                .filter_map(|stub| {
                    let id = stem_with_extension(&stub.path, ".html")?.to_string();
                    Some((id, stub.checksum?))
                })
                .collect(),
            Err(e) => {
                tracing::error!(
                    "feedback listing for {}/{}/{} failed: {}",
                    course,
                    assignment,
                    student,
                    e
                );
                BTreeMap::new()
            }
        }
    }
}

/// Partition flat submission entries by `(course, student, assignment)` and
/// sort each group ascending by timestamp. Group status comes from the
/// earliest submission.
fn group_submissions(entries: Vec<ListingEntry>) -> Vec<SubmissionGroup> {
    let mut buckets: BTreeMap<(CourseId, StudentId, AssignmentId), Vec<ListingEntry>> =
        BTreeMap::new();
    for entry in entries {
        let Some(student) = entry.student_id.clone() else {
            continue;
        };
        buckets
            .entry((entry.course_id.clone(), student, entry.assignment_id.clone()))
            .or_default()
            .push(entry);
    }

    buckets
        .into_iter()
        .map(|((course_id, student_id, assignment_id), mut submissions)| {
            submissions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
            let status = submissions
                .first()
                .map_or(AssignmentStatus::Submitted, |s| s.status);
            SubmissionGroup {
                course_id,
                student_id,
                assignment_id,
                status,
                submissions,
            }
        })
        .collect()
}

/// Sorted `*.ipynb` stems directly inside `dir`. Missing or unreadable
/// directories are an empty listing, not an error.
fn local_notebooks(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut ids: Vec<String> = entries
        .flatten()
        .filter(|e| e.path().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            stem_with_extension(&name, ".ipynb").map(|s| s.to_string())
        })
        .collect();
    ids.sort();
    ids
}

fn remote_notebooks<'a>(paths: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut ids: Vec<String> = paths
        .filter_map(|p| stem_with_extension(p, ".ipynb").map(|s| s.to_string()))
        .collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// One-line rendering of an outbound/solution entry.
pub fn format_assignment(entry: &ListingEntry) -> String {
    let mut line = format!("{} {}", entry.course_id, entry.assignment_id);
    if matches!(
        entry.status,
        AssignmentStatus::Fetched | AssignmentStatus::FetchedSolution
    ) {
        line.push_str(" (already downloaded)");
    }
    line
}

/// One-line rendering of a submission entry, with the feedback suffix
/// derived from the submission-level aggregates. "Already fetched" wins over
/// "ready to be fetched" when local feedback exists and nothing changed.
pub fn format_submission(entry: &ListingEntry) -> String {
    let student = entry.student_id.as_ref().map_or("", |s| s.0.as_str());
    let timestamp = entry.timestamp.as_ref().map_or("", |t| t.0.as_str());
    let mut line = format!(
        "{} {} {} {}",
        entry.course_id, student, entry.assignment_id, timestamp
    );
    line.push_str(feedback_suffix(entry));
    line
}

fn feedback_suffix(entry: &ListingEntry) -> &'static str {
    if entry.has_local_feedback && !entry.feedback_updated {
        " (feedback already fetched)"
    } else if entry.has_exchange_feedback {
        " (feedback ready to be fetched)"
    } else {
        " (no feedback available)"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        has_local: bool,
        has_exchange: bool,
        updated: bool,
        status: AssignmentStatus,
    ) -> ListingEntry {
        ListingEntry {
            course_id: CourseId::from("math101"),
            assignment_id: AssignmentId::from("ps1"),
            student_id: Some(StudentId::from("ada")),
            timestamp: Some(Timestamp::from("2024-03-01 12:00:05.000000 UTC")),
            status,
            notebooks: Vec::new(),
            has_local_feedback: has_local,
            has_exchange_feedback: has_exchange,
            feedback_updated: updated,
            local_path: None,
        }
    }

    #[test]
    fn outbound_format_marks_downloaded() {
        let released = entry(false, false, false, AssignmentStatus::Released);
        assert_eq!(format_assignment(&released), "math101 ps1");
        let fetched = entry(false, false, false, AssignmentStatus::Fetched);
        assert_eq!(format_assignment(&fetched), "math101 ps1 (already downloaded)");
    }

    #[test]
    fn submission_format_is_course_student_assignment_timestamp() {
        let ready = entry(false, true, false, AssignmentStatus::Submitted);
        assert_eq!(
            format_submission(&ready),
            "math101 ada ps1 2024-03-01 12:00:05.000000 UTC (feedback ready to be fetched)"
        );
    }

    #[test]
    fn feedback_suffix_priorities() {
        // fetched and unchanged beats ready-to-fetch
        let fetched = entry(true, true, false, AssignmentStatus::Submitted);
        assert!(format_submission(&fetched).ends_with("(feedback already fetched)"));

        // remote feedback, nothing local yet
        let ready = entry(false, true, false, AssignmentStatus::Submitted);
        assert!(format_submission(&ready).ends_with("(feedback ready to be fetched)"));

        // local copy exists but the remote content changed
        let updated = entry(true, true, true, AssignmentStatus::Submitted);
        assert!(format_submission(&updated).ends_with("(feedback ready to be fetched)"));

        let none = entry(false, false, false, AssignmentStatus::Submitted);
        assert!(format_submission(&none).ends_with("(no feedback available)"));
    }

    #[test]
    fn grouping_sorts_ascending_and_anchors_earliest_status() {
        let mut late = entry(false, false, false, AssignmentStatus::Submitted);
        late.timestamp = Some(Timestamp::from("2024-03-02 09:00:00.000000 UTC"));
        let mut early = entry(false, false, false, AssignmentStatus::Submitted);
        early.timestamp = Some(Timestamp::from("2024-03-01 12:00:05.000000 UTC"));
        early.status = AssignmentStatus::Removed;

        let groups = group_submissions(vec![late, early]);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.submissions.len(), 2);
        assert!(group.submissions[0].timestamp < group.submissions[1].timestamp);
        // anchored on the earliest submission, not aggregated
        assert_eq!(group.status, AssignmentStatus::Removed);
    }

    #[test]
    fn groups_are_keyed_per_student_and_assignment() {
        let a = entry(false, false, false, AssignmentStatus::Submitted);
        let mut b = entry(false, false, false, AssignmentStatus::Submitted);
        b.student_id = Some(StudentId::from("grace"));
        let mut c = entry(false, false, false, AssignmentStatus::Submitted);
        c.assignment_id = AssignmentId::from("ps2");

        let groups = group_submissions(vec![a, b, c]);
        assert_eq!(groups.len(), 3);
    }
}
