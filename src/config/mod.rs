//! Configuration system
//!
//! Handles TOML config file parsing, environment variables and CLI argument
//! merging.

pub mod builder;
pub mod env;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::alerts::{GatePolicy, GateSettings, Priority, ThresholdLevels};
use crate::domain::StatModule;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const REDACTED: &str = "********";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Alert thresholds
    pub thresholds: ThresholdsConfig,
    /// Email (Mailgun) settings
    pub email: EmailConfig,
    /// Push (Pushover) settings
    pub push: PushConfig,
}

impl Config {
    /// Validate values that serde cannot check
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.poll_freq_ms == 0 {
            return Err(ConfigError::invalid(
                "general.poll_freq_ms",
                "must be greater than zero",
            ));
        }
        if self.general.min_message_interval_minutes.checked_mul(60).is_none() {
            return Err(ConfigError::invalid(
                "general.min_message_interval_minutes",
                "interval is too large",
            ));
        }
        if self.general.modules.is_empty() {
            return Err(ConfigError::invalid(
                "general.modules",
                "at least one module must be enabled",
            ));
        }
        self.thresholds.memory.validate("thresholds.memory")?;
        self.thresholds.disk.validate("thresholds.disk")?;
        self.thresholds.temperature.validate("thresholds.temperature")?;
        Ok(())
    }

    /// Copy with credentials masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |v: &Option<String>| v.as_ref().map(|_| REDACTED.to_string());
        let mut config = self.clone();
        config.email.api_key = mask(&self.email.api_key);
        config.push.token = mask(&self.push.token);
        config.push.user = mask(&self.push.user);
        config
    }

    /// Gate settings shared by every tester
    pub fn gate_settings(&self) -> GateSettings {
        GateSettings::new(self.general.min_message_interval(), self.general.gate_policy)
    }
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Poll frequency in milliseconds
    pub poll_freq_ms: u64,
    /// Window for the gated recovery branches, in minutes
    pub min_message_interval_minutes: u64,
    /// How the recovery window is applied
    pub gate_policy: GatePolicy,
    /// Stat modules to collect
    pub modules: Vec<StatModule>,
}

impl GeneralConfig {
    /// Poll frequency as a duration
    pub fn poll_freq(&self) -> Duration {
        Duration::from_millis(self.poll_freq_ms)
    }

    /// Minimum message interval as a duration
    pub fn min_message_interval(&self) -> Duration {
        Duration::from_secs(self.min_message_interval_minutes.saturating_mul(60))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            poll_freq_ms: 10_000,
            min_message_interval_minutes: 60,
            gate_policy: GatePolicy::Recency,
            modules: StatModule::MONITORED.to_vec(),
        }
    }
}

/// Threshold configuration
///
/// Memory and disk levels are used ratios (0-1); temperature is in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub memory: ThresholdLevels,
    pub disk: ThresholdLevels,
    pub temperature: ThresholdLevels,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            memory: ThresholdLevels {
                warning: 0.8,
                danger: 0.9,
            },
            disk: ThresholdLevels {
                warning: 0.8,
                danger: 0.9,
            },
            temperature: ThresholdLevels {
                warning: 70.0,
                danger: 85.0,
            },
        }
    }
}

/// Mailgun email configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub domain: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// API base URL (use https://api.eu.mailgun.net/v3 for EU domains)
    pub api_base: String,
}

impl EmailConfig {
    /// Whether every field needed to send is present
    pub fn is_complete(&self) -> bool {
        self.api_key.is_some() && self.domain.is_some() && self.from.is_some() && self.to.is_some()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: None,
            from: None,
            to: None,
            api_base: "https://api.mailgun.net/v3".to_string(),
        }
    }
}

/// Pushover push configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub user: Option<String>,
    pub token: Option<String>,
    pub api_url: String,
    /// File that failed deliveries are appended to
    pub failure_log: PathBuf,
    /// Also send threshold alerts as push messages (job failures always are)
    pub forward_alerts: bool,
    /// Priority of job failure messages
    pub exception_priority: Priority,
}

impl PushConfig {
    /// Whether every field needed to send is present
    pub fn is_complete(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            api_url: "https://api.pushover.net/1/messages.json".to_string(),
            failure_log: PathBuf::from("log.txt"),
            forward_alerts: false,
            exception_priority: Priority::Normal,
        }
    }
}
