//! Check command implementation
//!
//! Polls the host once and prints the values the testers would see.

use super::layered_config;
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, CheckReport};
use crate::domain::StatModule;
use crate::error::{AppError, Result};
use crate::stats::{PollDispatcher, SysinfoSource};

/// Execute the check command
pub fn run_check(format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = layered_config(config_path)?.build()?;

    let mut dispatcher = PollDispatcher::new(SysinfoSource::new())
        .register(&config.general.modules)
        .register(&[StatModule::Cpu, StatModule::System]);

    let snapshot = dispatcher.poll().ok_or_else(|| AppError::Job {
        name: "check".to_string(),
        message: "no snapshot collected".to_string(),
    })?;

    print_output(&CheckReport::new(snapshot, &config.thresholds), format)?;

    Ok(())
}
