//! `satchel release` — publish an assignment or solution.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use satchel_core::types::AssignmentId;
use satchel_sync::release::{release_assignment, release_solution, ReleaseRequest};

use super::CourseArg;

/// Arguments for `satchel release`.
#[derive(Args, Debug)]
pub struct ReleaseArgs {
    /// Assignment id to release.
    pub assignment: String,

    #[command(flatten)]
    pub course: CourseArg,

    /// Replace an existing remote release.
    #[arg(long)]
    pub force: bool,

    /// Release `<solution_dir>/<assignment>` as the solution instead of
    /// `<release_dir>/<assignment>` as the assignment.
    #[arg(long)]
    pub solution: bool,
}

impl ReleaseArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = super::open_exchange()?;
        let course = self.course.resolve()?;
        let request = ReleaseRequest {
            course: course.clone(),
            assignment: AssignmentId::from(self.assignment.as_str()),
            force: self.force,
        };

        let (what, count) = if self.solution {
            let count = release_solution(&store, &config, &request)
                .with_context(|| format!("failed to release solution {course}/{}", request.assignment))?;
            ("solution", count)
        } else {
            let count = release_assignment(&store, &config, &request)
                .with_context(|| format!("failed to release {course}/{}", request.assignment))?;
            ("assignment", count)
        };

        println!(
            "{} {} {}/{} ({} files)",
            "Released".green().bold(),
            what,
            course,
            request.assignment,
            count,
        );
        Ok(())
    }
}
