// readme-stats library.
// GitHub profile statistics with an incremental lines-of-code cache.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod loc;
pub mod render;

pub use config::Config;
pub use error::{Result, StatsError};
