//! Feed composition for Who's On Pole.
//!
//! Turns rows from the store into the view model the feed renders:
//! the closest race weekend, the spotlight carousel, poll tallies and
//! enriched posts and grids.

pub mod services;

pub use services::*;

/// Generate a unique, time-ordered ID.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::now_v7().simple().to_string()
}
