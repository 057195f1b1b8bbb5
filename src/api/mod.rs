//! HTTP/JSON API for the browser client.
//!
//! The browser front end is stateless: it posts document photos to
//! `/api/analyze`, receives a session snapshot, and drives all further
//! interaction through the session endpoints, each of which answers with
//! the refreshed snapshot.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::build_router;
pub use types::ApiContext;
