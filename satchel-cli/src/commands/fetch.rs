//! `satchel fetch` — download an assignment or its solution.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use satchel_core::types::AssignmentId;
use satchel_sync::fetch::{fetch_assignment, FetchRequest};
use satchel_sync::solution::{fetch_solution, FetchSolutionRequest};

use super::CourseArg;

/// Arguments for `satchel fetch`.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Assignment id to fetch.
    pub assignment: String,

    #[command(flatten)]
    pub course: CourseArg,

    /// Fetch into an existing working copy, restoring missing files without
    /// touching local edits.
    #[arg(long)]
    pub replace: bool,

    /// Fetch the released solution instead of the assignment.
    #[arg(long, conflicts_with = "replace")]
    pub solution: bool,
}

impl FetchArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = super::open_exchange()?;
        let course = self.course.resolve()?;
        let assignment = AssignmentId::from(self.assignment.as_str());

        let dest = if self.solution {
            fetch_solution(
                &store,
                &config,
                &FetchSolutionRequest {
                    course: course.clone(),
                    assignment: assignment.clone(),
                },
            )
            .with_context(|| format!("failed to fetch solution {course}/{assignment}"))?
        } else {
            fetch_assignment(
                &store,
                &config,
                &FetchRequest {
                    course: course.clone(),
                    assignment: assignment.clone(),
                    replace: self.replace,
                },
            )
            .with_context(|| format!("failed to fetch {course}/{assignment}"))?
        };

        println!("{} {}", "Fetched into".green().bold(), dest.display());
        Ok(())
    }
}
