//! HTTP client library for the cartrack backend API.
//!
//! The backend itself (REST endpoints, persistence, reminder scheduling)
//! is an external service; this crate owns the client side of the
//! contract:
//!
//! - [`ApiClient`] -- typed endpoint methods over `reqwest`, with local
//!   payload validation before anything hits the wire.
//! - [`Session`] -- the explicit bearer-token holder handed to the client
//!   at construction (set on login, cleared on logout).
//! - [`Sequenced`] -- request-sequence tokens that keep a stale in-flight
//!   response from overwriting fresher state.
//! - [`CarOverview`] -- the fetch / classify / refetch-after-write cycle
//!   for one car's compliance tracks.

pub mod client;
pub mod error;
pub mod overview;
pub mod session;
pub mod sync;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use overview::CarOverview;
pub use session::Session;
pub use sync::{SequenceToken, Sequenced};
