//! Run configuration and orchestration

/// Validated run configuration and view declarations
pub mod config;
/// Sequential load, orient, fuse and write driver
pub mod runner;

pub use config::{RunConfig, ViewSpec};
pub use runner::{FusionRunner, RunSummary};
