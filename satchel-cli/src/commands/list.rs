//! `satchel list` — the reconciliation report.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use satchel_core::types::{AssignmentId, StudentId};
use satchel_sync::list::{
    list, remove, AssignmentStatus, ListReport, ListingEntry, SubmissionGroup,
};
use satchel_sync::{ListMode, ListRequest, ListScope};

use super::CourseArg;

/// Arguments for `satchel list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub course: CourseArg,

    /// Restrict to one assignment id.
    #[arg(long)]
    pub assignment: Option<String>,

    /// Restrict to one student id (inbound/cached listings).
    #[arg(long)]
    pub student: Option<String>,

    /// List submissions on the remote store instead of released assignments.
    #[arg(long, conflicts_with_all = ["cached", "solutions"])]
    pub inbound: bool,

    /// List submissions mirrored in the local cache.
    #[arg(long, conflicts_with_all = ["inbound", "solutions"])]
    pub cached: bool,

    /// List released solutions.
    #[arg(long, conflicts_with_all = ["inbound", "cached"])]
    pub solutions: bool,

    /// Remove what the listing matches instead of just reporting it.
    #[arg(long)]
    pub remove: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = super::open_exchange()?;
        let request = ListRequest {
            mode: self.mode(),
            scope: ListScope {
                course: self.course.course.as_deref().map(Into::into),
                assignment: self.assignment.as_deref().map(AssignmentId::from),
                student: self.student.as_deref().map(StudentId::from),
            },
        };

        let report = if self.remove {
            remove(&store, &config, &request).context("remove failed")?
        } else {
            list(&store, &config, &request).context("listing failed")?
        };

        if self.json {
            print_json(report)?;
        } else {
            print_report(report);
        }
        Ok(())
    }

    fn mode(&self) -> ListMode {
        if self.inbound {
            ListMode::Inbound
        } else if self.cached {
            ListMode::Cached
        } else if self.solutions {
            ListMode::Solution
        } else {
            ListMode::Outbound
        }
    }
}

// ---------------------------------------------------------------------------
// Table output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct AssignmentRow {
    #[tabled(rename = "course")]
    course: String,
    #[tabled(rename = "assignment")]
    assignment: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "notebooks")]
    notebooks: String,
}

#[derive(Tabled)]
struct SubmissionRow {
    #[tabled(rename = "course")]
    course: String,
    #[tabled(rename = "assignment")]
    assignment: String,
    #[tabled(rename = "student")]
    student: String,
    #[tabled(rename = "timestamp")]
    timestamp: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "feedback")]
    feedback: String,
}

fn print_report(report: ListReport) {
    match report {
        ListReport::Assignments(entries) => {
            if entries.is_empty() {
                println!("No assignments found.");
                return;
            }
            let rows: Vec<AssignmentRow> = entries
                .iter()
                .map(|entry| AssignmentRow {
                    course: entry.course_id.to_string(),
                    assignment: entry.assignment_id.to_string(),
                    status: status_label(entry.status),
                    notebooks: notebook_summary(entry),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        ListReport::Groups(groups) => {
            if groups.is_empty() {
                println!("No submissions found.");
                return;
            }
            let rows: Vec<SubmissionRow> = groups
                .iter()
                .flat_map(|group| group.submissions.iter())
                .map(|entry| SubmissionRow {
                    course: entry.course_id.to_string(),
                    assignment: entry.assignment_id.to_string(),
                    student: entry
                        .student_id
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                    timestamp: entry
                        .timestamp
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                    status: status_label(entry.status),
                    feedback: feedback_label(entry).to_string(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
    }
}

fn status_label(status: AssignmentStatus) -> String {
    let label = status.as_str();
    match status {
        AssignmentStatus::Released | AssignmentStatus::ReleasedSolution => label.green(),
        AssignmentStatus::Fetched | AssignmentStatus::FetchedSolution => label.cyan(),
        AssignmentStatus::Submitted => label.blue(),
        AssignmentStatus::Removed => label.red(),
        AssignmentStatus::FetchAssignment => label.yellow(),
    }
    .to_string()
}

fn feedback_label(entry: &ListingEntry) -> &'static str {
    if entry.has_local_feedback && !entry.feedback_updated {
        "fetched"
    } else if entry.has_exchange_feedback {
        "ready to fetch"
    } else {
        "none"
    }
}

fn notebook_summary(entry: &ListingEntry) -> String {
    if entry.notebooks.is_empty() {
        return "-".to_string();
    }
    entry
        .notebooks
        .iter()
        .map(|n| n.notebook_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct NotebookJson {
    notebook_id: String,
    has_local_feedback: bool,
    has_exchange_feedback: bool,
    feedback_updated: bool,
}

#[derive(Serialize)]
struct EntryJson {
    course_id: String,
    assignment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    status: String,
    notebooks: Vec<NotebookJson>,
    has_local_feedback: bool,
    has_exchange_feedback: bool,
    feedback_updated: bool,
}

#[derive(Serialize)]
struct GroupJson {
    course_id: String,
    student_id: String,
    assignment_id: String,
    status: String,
    submissions: Vec<EntryJson>,
}

fn entry_json(entry: &ListingEntry) -> EntryJson {
    EntryJson {
        course_id: entry.course_id.to_string(),
        assignment_id: entry.assignment_id.to_string(),
        student_id: entry.student_id.as_ref().map(ToString::to_string),
        timestamp: entry.timestamp.as_ref().map(ToString::to_string),
        status: entry.status.as_str().to_string(),
        notebooks: entry
            .notebooks
            .iter()
            .map(|n| NotebookJson {
                notebook_id: n.notebook_id.clone(),
                has_local_feedback: n.has_local_feedback,
                has_exchange_feedback: n.has_exchange_feedback,
                feedback_updated: n.feedback_updated,
            })
            .collect(),
        has_local_feedback: entry.has_local_feedback,
        has_exchange_feedback: entry.has_exchange_feedback,
        feedback_updated: entry.feedback_updated,
    }
}

fn group_json(group: &SubmissionGroup) -> GroupJson {
    GroupJson {
        course_id: group.course_id.to_string(),
        student_id: group.student_id.to_string(),
        assignment_id: group.assignment_id.to_string(),
        status: group.status.as_str().to_string(),
        submissions: group.submissions.iter().map(entry_json).collect(),
    }
}

fn print_json(report: ListReport) -> Result<()> {
    let value = match report {
        ListReport::Assignments(entries) => {
            serde_json::to_value(entries.iter().map(entry_json).collect::<Vec<_>>())
        }
        ListReport::Groups(groups) => {
            serde_json::to_value(groups.iter().map(group_json).collect::<Vec<_>>())
        }
    }
    .context("failed to serialize listing JSON")?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
