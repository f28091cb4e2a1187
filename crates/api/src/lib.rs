//! HTTP API layer for Who's On Pole.
//!
//! - **Endpoints**: feed, spotlight, current race, poll results and voting
//! - **Extractors**: the session user forwarded by the auth provider
//! - **Middleware**: bearer session parsing
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
