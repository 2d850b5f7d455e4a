//! Configuration builder
//!
//! Merges configuration from defaults, files, the environment and CLI
//! arguments, in that order of precedence (later wins).

use crate::alerts::GatePolicy;
use crate::config::{env, Config, ConfigFile};
use crate::error::ConfigError;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist and parse; without one the default
    /// locations are searched and silently skipped when absent.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with process environment variables
    pub fn with_env(mut self) -> Result<Self, ConfigError> {
        env::apply_process_env(&mut self.config)?;
        Ok(self)
    }

    /// Override with a custom variable lookup
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        env::apply_env(&mut self.config, lookup)?;
        Ok(self)
    }

    /// Override with CLI poll frequency (milliseconds)
    pub fn with_poll_freq(mut self, millis: Option<u64>) -> Self {
        if let Some(ms) = millis {
            self.config.general.poll_freq_ms = ms;
        }
        self
    }

    /// Override with CLI minimum message interval (minutes)
    pub fn with_min_interval(mut self, minutes: Option<u64>) -> Self {
        if let Some(m) = minutes {
            self.config.general.min_message_interval_minutes = m;
        }
        self
    }

    /// Override with CLI gate policy
    pub fn with_gate_policy(mut self, policy: Option<GatePolicy>) -> Self {
        if let Some(p) = policy {
            self.config.general.gate_policy = p;
        }
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
