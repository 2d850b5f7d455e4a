//! Alert system domain types
//!
//! Defines validated types for thresholds, alert transitions and push priorities.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant, SystemTime};

/// Alert severity tier of a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Normal,
    Warning,
    Danger,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Warning => write!(f, "WARNING"),
            Self::Danger => write!(f, "DANGER"),
        }
    }
}

/// Push notification priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Silent,
    Quiet,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    /// Numeric value understood by the push API
    pub fn as_i8(&self) -> i8 {
        match self {
            Self::Silent => -2,
            Self::Quiet => -1,
            Self::Normal => 0,
            Self::High => 1,
            Self::Urgent => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => write!(f, "silent"),
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::High => write!(f, "high"),
            Self::Urgent => write!(f, "urgent"),
        }
    }
}

/// When the gated recovery branches are allowed to fire
///
/// `Recency` fires only while the last notification is younger than the
/// minimum message interval. `Cooldown` fires only once it is at least that old
/// (or when nothing was sent yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GatePolicy {
    #[default]
    Recency,
    Cooldown,
}

impl GatePolicy {
    /// Evaluate the gate for a tester's last notification time
    pub fn allows(&self, last_notified: Option<Instant>, now: Instant, interval: Duration) -> bool {
        match (self, last_notified) {
            (Self::Recency, None) => false,
            (Self::Recency, Some(at)) => now.saturating_duration_since(at) < interval,
            (Self::Cooldown, None) => true,
            (Self::Cooldown, Some(at)) => now.saturating_duration_since(at) >= interval,
        }
    }
}

impl fmt::Display for GatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recency => write!(f, "recency"),
            Self::Cooldown => write!(f, "cooldown"),
        }
    }
}

/// Warning and danger levels for a numeric metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevels {
    pub warning: f64,
    pub danger: f64,
}

impl ThresholdLevels {
    /// Create validated levels
    pub fn new(warning: f64, danger: f64) -> Result<Self, ConfigError> {
        let levels = Self { warning, danger };
        levels.validate("thresholds")?;
        Ok(levels)
    }

    /// Check both levels are finite and ordered
    pub fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if !self.warning.is_finite() || !self.danger.is_finite() {
            return Err(ConfigError::invalid(key, "levels must be finite numbers"));
        }
        if self.warning > self.danger {
            return Err(ConfigError::invalid(
                key,
                format!(
                    "warning level {} exceeds danger level {}",
                    self.warning, self.danger
                ),
            ));
        }
        Ok(())
    }

    /// Tier a single sample falls in, ignoring hysteresis
    pub fn classify(&self, value: f64) -> Tier {
        if value >= self.danger {
            Tier::Danger
        } else if value >= self.warning {
            Tier::Warning
        } else {
            Tier::Normal
        }
    }
}

impl fmt::Display for ThresholdLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "warn >= {}, danger >= {}", self.warning, self.danger)
    }
}

/// Kind of transition an alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Entered the danger tier
    TooHigh,
    /// Entered the warning tier
    GettingHigh,
    /// Dropped from danger back to warning
    Recovering,
    /// Dropped below warning
    Recovered,
    /// Discrete value became the bad value
    Bad,
    /// Discrete value left the bad value
    Good,
}

impl AlertKind {
    /// Push priority for this kind of transition
    pub fn priority(&self) -> Priority {
        match self {
            Self::TooHigh | Self::Bad => Priority::High,
            Self::GettingHigh => Priority::Normal,
            Self::Recovering | Self::Recovered | Self::Good => Priority::Quiet,
        }
    }

    /// Whether the transition moves toward trouble
    pub fn is_raise(&self) -> bool {
        matches!(self, Self::TooHigh | Self::GettingHigh | Self::Bad)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooHigh => write!(f, "too_high"),
            Self::GettingHigh => write!(f, "getting_high"),
            Self::Recovering => write!(f, "recovering"),
            Self::Recovered => write!(f, "recovered"),
            Self::Bad => write!(f, "bad"),
            Self::Good => write!(f, "good"),
        }
    }
}

/// A single alert transition ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// Metric identity (e.g. "RAM" or a filesystem name)
    pub metric: String,
    pub kind: AlertKind,
    pub subject: String,
    pub body: String,
    /// Numeric sample that caused the transition, if any
    pub value: Option<f64>,
    pub raised_at: SystemTime,
}

impl Alert {
    /// Create an alert stamped with the current wall-clock time
    pub fn new(
        metric: impl Into<String>,
        kind: AlertKind,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            metric: metric.into(),
            kind,
            subject: subject.into(),
            body: body.into(),
            value: None,
            raised_at: SystemTime::now(),
        }
    }

    /// Attach the sample value
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Push priority derived from the kind
    pub fn priority(&self) -> Priority {
        self.kind.priority()
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body.is_empty() {
            write!(f, "{}", self.subject)
        } else {
            write!(f, "{} ({})", self.subject, self.body)
        }
    }
}
