//! Threshold testers
//!
//! Per-metric state machines that turn a stream of samples into alert
//! transitions. Testers never deliver anything themselves; they return the
//! alert (if any) and leave dispatch to the caller.

use super::types::{Alert, AlertKind, GatePolicy, ThresholdLevels, Tier};
use std::time::{Duration, Instant};

/// Settings shared by every tester in the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSettings {
    /// Window used by the gated recovery branches
    pub min_message_interval: Duration,
    pub policy: GatePolicy,
}

impl GateSettings {
    /// Create gate settings
    pub fn new(min_message_interval: Duration, policy: GatePolicy) -> Self {
        Self {
            min_message_interval,
            policy,
        }
    }

    fn allows(&self, last_notified: Option<Instant>, now: Instant) -> bool {
        self.policy
            .allows(last_notified, now, self.min_message_interval)
    }
}

impl Default for GateSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(60 * 60), GatePolicy::Recency)
    }
}

/// Numeric threshold tester with warning and danger levels
///
/// Tracks the warning and danger flags independently: entering danger does not
/// set the warning flag, and "recovering" only clears the danger flag.
#[derive(Debug, Clone)]
pub struct NumericTester {
    name: String,
    levels: ThresholdLevels,
    gate: GateSettings,
    warning: bool,
    danger: bool,
    last_notified: Option<Instant>,
}

impl NumericTester {
    /// Create a tester in the normal tier
    pub fn new(name: impl Into<String>, levels: ThresholdLevels, gate: GateSettings) -> Self {
        Self {
            name: name.into(),
            levels,
            gate,
            warning: false,
            danger: false,
            last_notified: None,
        }
    }

    /// Test a sample observed now
    pub fn test(&mut self, value: f64) -> Option<Alert> {
        self.test_at(value, Instant::now())
    }

    /// Test a sample observed at `now`
    pub fn test_at(&mut self, value: f64, now: Instant) -> Option<Alert> {
        if !value.is_finite() {
            return None;
        }

        let ThresholdLevels { warning, danger } = self.levels;

        if value >= danger {
            if self.danger {
                return None;
            }
            self.danger = true;
            self.last_notified = Some(now);
            return Some(self.alert(
                AlertKind::TooHigh,
                format!("☠ {} is too damn high!", self.name),
                format!("{} >= {}", value, danger),
                value,
            ));
        }

        if value >= warning {
            if self.danger && self.gate.allows(self.last_notified, now) {
                self.danger = false;
                self.last_notified = Some(now);
                return Some(self.alert(
                    AlertKind::Recovering,
                    format!("⚠ {} is recovering", self.name),
                    format!("{} >= {}", value, warning),
                    value,
                ));
            }
            if !self.warning {
                self.warning = true;
                return Some(self.alert(
                    AlertKind::GettingHigh,
                    format!("⚠ {} is getting high!", self.name),
                    format!("{} >= {}", value, warning),
                    value,
                ));
            }
            return None;
        }

        if self.warning && self.gate.allows(self.last_notified, now) {
            self.warning = false;
            self.danger = false;
            return Some(self.alert(
                AlertKind::Recovered,
                format!("👍 {} has recovered", self.name),
                format!("{} < {}", value, warning),
                value,
            ));
        }

        None
    }

    fn alert(&self, kind: AlertKind, subject: String, body: String, value: f64) -> Alert {
        Alert::new(self.name.clone(), kind, subject, body).with_value(value)
    }

    /// Metric name used in alert subjects
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configured levels
    pub fn levels(&self) -> ThresholdLevels {
        self.levels
    }

    /// Current tier derived from the flags
    pub fn tier(&self) -> Tier {
        if self.danger {
            Tier::Danger
        } else if self.warning {
            Tier::Warning
        } else {
            Tier::Normal
        }
    }

    /// Time of the last recorded notification
    pub fn last_notified(&self) -> Option<Instant> {
        self.last_notified
    }
}

/// Tester for a discrete value entering or leaving a bad value
#[derive(Debug, Clone)]
pub struct MatchTester<T> {
    name: String,
    bad_value: T,
    bad_message: String,
    good_message: String,
    gate: GateSettings,
    was_bad: bool,
    last_notified: Option<Instant>,
}

impl<T: PartialEq> MatchTester<T> {
    /// Create a tester that is not in the bad state
    pub fn new(
        name: impl Into<String>,
        bad_value: T,
        bad_message: impl Into<String>,
        good_message: impl Into<String>,
        gate: GateSettings,
    ) -> Self {
        Self {
            name: name.into(),
            bad_value,
            bad_message: bad_message.into(),
            good_message: good_message.into(),
            gate,
            was_bad: false,
            last_notified: None,
        }
    }

    /// Test a value observed now
    pub fn test(&mut self, value: &T) -> Option<Alert> {
        self.test_at(value, Instant::now())
    }

    /// Test a value observed at `now`
    pub fn test_at(&mut self, value: &T, now: Instant) -> Option<Alert> {
        let is_bad = *value == self.bad_value;
        if is_bad == self.was_bad || !self.gate.allows(self.last_notified, now) {
            return None;
        }

        self.was_bad = is_bad;
        self.last_notified = Some(now);

        let (kind, subject) = if is_bad {
            (AlertKind::Bad, self.bad_message.clone())
        } else {
            (AlertKind::Good, self.good_message.clone())
        };
        Some(Alert::new(self.name.clone(), kind, subject, ""))
    }

    /// Whether the last reported transition was into the bad value
    pub fn is_bad(&self) -> bool {
        self.was_bad
    }

    /// Time of the last recorded notification
    pub fn last_notified(&self) -> Option<Instant> {
        self.last_notified
    }
}
