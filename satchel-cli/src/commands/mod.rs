//! Subcommand implementations.

pub mod collect;
pub mod feedback;
pub mod fetch;
pub mod list;
pub mod release;
pub mod submit;

use anyhow::{Context, Result};
use clap::Args;

use satchel_client::HttpRemoteStore;
use satchel_core::error::ConfigError;
use satchel_core::types::CourseId;
use satchel_core::ExchangeConfig;

/// `--course` shared by every subcommand that targets one course.
#[derive(Args, Debug)]
pub struct CourseArg {
    /// Course id on the remote store.
    #[arg(long)]
    pub course: Option<String>,
}

impl CourseArg {
    pub fn resolve(&self) -> Result<CourseId> {
        match &self.course {
            Some(course) => Ok(CourseId::from(course.as_str())),
            None => Err(ConfigError::MissingCourseId.into()),
        }
    }
}

/// Load the config and connect the remote store, the preamble of every
/// subcommand.
pub fn open_exchange() -> Result<(ExchangeConfig, HttpRemoteStore)> {
    let config = ExchangeConfig::load().context("failed to load ~/.satchel/config.yaml")?;
    let store = HttpRemoteStore::from_config(&config)
        .context("no remote store configured — set remote_url or SATCHEL_URL")?;
    Ok((config, store))
}
