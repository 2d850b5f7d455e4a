//! Config command implementation
//!
//! Prints the effective configuration after every layer is applied.

use super::layered_config;
use crate::cli::args::OutputFormat;
use crate::cli::output::print_output;
use crate::error::Result;

/// Execute the config command
pub fn run_config(format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = layered_config(config_path)?.build()?;
    print_output(&config.redacted(), format)?;
    Ok(())
}
