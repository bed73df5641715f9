//! Error types for satchel-client.

use thiserror::Error;

/// A definite failure from the remote artifact service.
///
/// The reconciliation engine never distinguishes *why* a call failed beyond
/// logging it; every variant means "this candidate's data is unavailable".
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// Non-200 status line.
    #[error("{url} returned HTTP status {status}")]
    Status { url: String, status: u16 },

    /// The response body was not the JSON we expected.
    #[error("{url} returned undecodable content: {detail}")]
    Decode { url: String, detail: String },

    /// HTTP 200 with `success=false`.
    #[error("{url} returned failure: {message}")]
    Failure { url: String, message: String },
}

impl RemoteError {
    pub(crate) fn decode(url: impl Into<String>, detail: impl Into<String>) -> Self {
        RemoteError::Decode {
            url: url.into(),
            detail: detail.into(),
        }
    }
}
