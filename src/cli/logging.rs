//! Logger setup shared by the binary

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Build the logger, forcing debug output when `verbose` is set
pub fn logger_builder(env: Env<'_>, verbose: bool) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder
}
