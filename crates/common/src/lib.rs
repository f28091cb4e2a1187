//! Common utilities and shared types for the Who's On Pole feed service.
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//!
//! # Example
//!
//! ```no_run
//! use pole_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Feed shows {} posts", config.feed.post_limit);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;

pub use config::{Config, FeedConfig};
pub use error::{AppError, AppResult};
