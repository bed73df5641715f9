//! # satchel-core
//!
//! Domain types, configuration and cache addressing for the Satchel
//! course-assignment exchange. Everything here is pure or filesystem-local;
//! the remote service boundary lives in `satchel-client` and the
//! reconciliation engine in `satchel-sync`.

pub mod cache;
pub mod config;
pub mod error;
pub mod types;

pub use config::ExchangeConfig;
pub use error::{ConfigError, MalformedCacheKey};
