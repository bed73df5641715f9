//! satchel-client: typed access to the remote artifact service.
//!
//! [`RemoteStore`] is the seam: [`HttpRemoteStore`] speaks the real HTTP
//! protocol, [`testing::InMemoryRemoteStore`] stands in for it in tests.

pub(crate) mod api;
pub mod error;
pub mod http;
pub mod store;
pub mod testing;

pub use error::RemoteError;
pub use http::HttpRemoteStore;
pub use store::RemoteStore;
