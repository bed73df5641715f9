//! # satchel-sync
//!
//! The exchange core: the directory-tree codec, the reconciliation/listing
//! engine, and the transfer operations (fetch, submit, release, solution,
//! feedback, collect).
//!
//! Every operation is a pure function of `(remote store, local filesystem,
//! config, request)`; nothing holds state between calls.

pub mod codec;
pub mod collect;
pub mod error;
pub mod feedback;
pub mod fetch;
pub mod ignore;
pub mod list;
pub mod release;
pub mod solution;
pub mod submit;

pub use error::ExchangeError;
pub use ignore::IgnoreRules;
pub use list::{ListMode, ListReport, ListRequest, ListScope};

/// Marker file recording a submission's timestamp inside every submitted,
/// cached, and collected file set.
pub const TIMESTAMP_FILE: &str = "timestamp.txt";
