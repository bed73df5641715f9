//! Satchel — course-assignment exchange CLI.
//!
//! # Usage
//!
//! ```text
//! satchel list [--course <id>] [--assignment <id>] [--student <id>]
//!              [--inbound|--cached|--solutions] [--remove] [--json]
//! satchel fetch <assignment> --course <id> [--replace] [--solution]
//! satchel submit <assignment> --course <id>
//! satchel release <assignment> --course <id> [--force] [--solution]
//! satchel feedback fetch <assignment> --course <id>
//! satchel feedback release <assignment> --course <id>
//! satchel collect <assignment> --course <id> [--student <id>] [--update]
//! ```
//!
//! Configuration lives in `~/.satchel/config.yaml`; the remote URL, auth
//! token, and username can also come from `SATCHEL_URL`, `SATCHEL_TOKEN`,
//! and `SATCHEL_USER`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    collect::CollectArgs, feedback::FeedbackCommand, fetch::FetchArgs, list::ListArgs,
    release::ReleaseArgs, submit::SubmitArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "satchel",
    version,
    about = "Exchange course assignments, submissions, and feedback",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List released assignments, submissions, cached entries, or solutions.
    List(ListArgs),

    /// Fetch a released assignment (or its solution) into the working
    /// directory.
    Fetch(FetchArgs),

    /// Submit the working copy of an assignment.
    Submit(SubmitArgs),

    /// Release an assignment (or solution) to the remote store.
    Release(ReleaseArgs),

    /// Fetch or release graded feedback.
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommand,
    },

    /// Collect the latest submission of every student.
    Collect(CollectArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::List(args) => args.run(),
        Commands::Fetch(args) => args.run(),
        Commands::Submit(args) => args.run(),
        Commands::Release(args) => args.run(),
        Commands::Feedback { command } => commands::feedback::run(command),
        Commands::Collect(args) => args.run(),
    }
}
