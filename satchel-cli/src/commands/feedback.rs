//! `satchel feedback` — fetch or release graded feedback.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use satchel_core::types::AssignmentId;
use satchel_sync::feedback::{
    fetch_feedback, release_feedback, FetchFeedbackRequest, ReleaseFeedbackRequest,
};

use super::CourseArg;

#[derive(Subcommand, Debug)]
pub enum FeedbackCommand {
    /// Fetch feedback for every cached submission of an assignment.
    Fetch(FeedbackArgs),

    /// Release staged feedback for every student of an assignment.
    Release(FeedbackArgs),
}

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    /// Assignment id.
    pub assignment: String,

    #[command(flatten)]
    pub course: CourseArg,
}

pub fn run(command: FeedbackCommand) -> Result<()> {
    match command {
        FeedbackCommand::Fetch(args) => fetch(args),
        FeedbackCommand::Release(args) => release(args),
    }
}

fn fetch(args: FeedbackArgs) -> Result<()> {
    let (config, store) = super::open_exchange()?;
    let course = args.course.resolve()?;
    let assignment = AssignmentId::from(args.assignment.as_str());

    let fetched = fetch_feedback(
        &store,
        &config,
        &FetchFeedbackRequest {
            course: course.clone(),
            assignment: assignment.clone(),
        },
    )
    .with_context(|| format!("failed to fetch feedback for {course}/{assignment}"))?;

    if fetched.is_empty() {
        println!("No feedback available yet.");
    } else {
        for timestamp in fetched {
            println!("{} feedback for {}", "Fetched".green().bold(), timestamp);
        }
    }
    Ok(())
}

fn release(args: FeedbackArgs) -> Result<()> {
    let (config, store) = super::open_exchange()?;
    let course = args.course.resolve()?;
    let assignment = AssignmentId::from(args.assignment.as_str());

    let released = release_feedback(
        &store,
        &config,
        &ReleaseFeedbackRequest {
            course: course.clone(),
            assignment: assignment.clone(),
        },
    )
    .with_context(|| format!("failed to release feedback for {course}/{assignment}"))?;

    println!(
        "{} feedback for {} student{}",
        "Released".green().bold(),
        released,
        if released == 1 { "" } else { "s" },
    );
    Ok(())
}
