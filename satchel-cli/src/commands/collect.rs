//! `satchel collect` — harvest the latest submissions.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use satchel_core::types::{AssignmentId, StudentId};
use satchel_sync::collect::{collect, CollectRequest};

use super::CourseArg;

/// Arguments for `satchel collect`.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Assignment id to collect.
    pub assignment: String,

    #[command(flatten)]
    pub course: CourseArg,

    /// Collect only this student.
    #[arg(long)]
    pub student: Option<String>,

    /// Re-collect students whose latest submission is newer than the one
    /// already collected.
    #[arg(long)]
    pub update: bool,
}

impl CollectArgs {
    pub fn run(self) -> Result<()> {
        let (config, store) = super::open_exchange()?;
        let course = self.course.resolve()?;
        let assignment = AssignmentId::from(self.assignment.as_str());

        let collected = collect(
            &store,
            &config,
            &CollectRequest {
                course: course.clone(),
                assignment: assignment.clone(),
                student: self.student.as_deref().map(StudentId::from),
                update: self.update,
            },
        )
        .with_context(|| format!("failed to collect {course}/{assignment}"))?;

        println!(
            "{} {} submission{} into {}",
            "Collected".green().bold(),
            collected,
            if collected == 1 { "" } else { "s" },
            config.submitted_dir.display(),
        );
        Ok(())
    }
}
