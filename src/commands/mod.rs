//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod config;
pub mod notify;
pub mod run;

pub use check::run_check;
pub use config::run_config;
pub use notify::run_notify_test;
pub use run::run_daemon;

use crate::config::ConfigBuilder;
use crate::error::Result;

/// File and environment layers shared by every command
fn layered_config(path: Option<&str>) -> Result<ConfigBuilder> {
    Ok(ConfigBuilder::new().with_file(path)?.with_env()?)
}
