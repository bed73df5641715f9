//! `satchel submit` — post the working copy as a new submission.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use satchel_core::types::AssignmentId;
use satchel_sync::submit::{submit, SubmitRequest};

use super::CourseArg;

/// Arguments for `satchel submit`.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Assignment id to submit.
    pub assignment: String,

    #[command(flatten)]
    pub course: CourseArg,

    /// Fail when the submission is missing released notebooks instead of
    /// warning.
    #[arg(long)]
    pub strict: bool,
}

impl SubmitArgs {
    pub fn run(self) -> Result<()> {
        let (mut config, store) = super::open_exchange()?;
        if self.strict {
            config.strict = true;
        }
        let course = self.course.resolve()?;
        let assignment = AssignmentId::from(self.assignment.as_str());

        let receipt = submit(
            &store,
            &config,
            &SubmitRequest {
                course: course.clone(),
                assignment: assignment.clone(),
            },
        )
        .with_context(|| format!("failed to submit {course}/{assignment}"))?;

        println!(
            "{} {}/{} at {} ({} files)",
            "Submitted".green().bold(),
            course,
            assignment,
            receipt.timestamp,
            receipt.file_count,
        );
        Ok(())
    }
}
