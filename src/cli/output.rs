//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::alerts::{Alert, AlertKind, Tier};
use crate::cli::args::OutputFormat;
use crate::config::{Config, ThresholdsConfig};
use crate::domain::extract::{
    disk_identity, disk_usage, mean_temperature, memory_usage, power_status,
};
use crate::domain::{PowerStatus, Snapshot};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// A derived sample and the tier it falls in
#[derive(Debug, Clone, Serialize)]
pub struct MetricReading {
    pub metric: String,
    pub value: f64,
    pub tier: Tier,
}

/// Result of a single poll with derived values
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub readings: Vec<MetricReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerStatus>,
    pub snapshot: Snapshot,
}

impl CheckReport {
    /// Derive every testable value from a snapshot
    pub fn new(snapshot: Snapshot, thresholds: &ThresholdsConfig) -> Self {
        let mut readings = Vec::new();

        if let Some(value) = snapshot.memory.as_ref().and_then(memory_usage) {
            readings.push(MetricReading {
                metric: "RAM".to_string(),
                value,
                tier: thresholds.memory.classify(value),
            });
        }

        for disk in snapshot.disks.iter().flatten() {
            if let Some(value) = disk_usage(disk) {
                readings.push(MetricReading {
                    metric: disk_identity(disk),
                    value,
                    tier: thresholds.disk.classify(value),
                });
            }
        }

        if let Some(value) = snapshot.temperature.as_ref().and_then(mean_temperature) {
            readings.push(MetricReading {
                metric: "Temperature".to_string(),
                value,
                tier: thresholds.temperature.classify(value),
            });
        }

        Self {
            hostname: snapshot.system.as_ref().map(|s| s.hostname.clone()),
            power: snapshot.power.as_deref().and_then(power_status),
            readings,
            snapshot,
        }
    }
}

impl TableDisplay for CheckReport {
    fn to_table(&self) -> String {
        let mut output = match &self.hostname {
            Some(host) => format!("Host: {}\n", host),
            None => String::new(),
        };

        if let Some(cpu) = &self.snapshot.cpu {
            output.push_str(&format!(
                "CPU: {:.1}% (load {:.2} {:.2} {:.2})\n",
                cpu.usage, cpu.load[0], cpu.load[1], cpu.load[2]
            ));
        }

        if let Some(power) = self.power {
            output.push_str(&format!("Power: {}\n", power));
        }

        if self.readings.is_empty() {
            output.push_str("No testable metrics in this poll\n");
            return output;
        }

        output.push_str("\n  Metric               Value       Tier\n");
        output.push_str("  ──────────────────────────────────────────\n");
        for reading in &self.readings {
            output.push_str(&format!(
                "  {:<20} {:<11} {}\n",
                reading.metric,
                format!("{:.2}", reading.value),
                reading.tier
            ));
        }

        output
    }

    fn to_compact(&self) -> String {
        self.readings
            .iter()
            .map(|r| format!("{}={:.2}({})", r.metric, r.value, r.tier))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Alert entry for display
#[derive(Debug, Clone, Serialize)]
pub struct AlertEntry {
    pub metric: String,
    pub kind: AlertKind,
    pub subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl From<&Alert> for AlertEntry {
    fn from(alert: &Alert) -> Self {
        Self {
            metric: alert.metric.clone(),
            kind: alert.kind,
            subject: alert.subject.clone(),
            body: alert.body.clone(),
            value: alert.value,
        }
    }
}

/// Alerts raised by one poll
#[derive(Debug, Clone, Serialize)]
pub struct PollSummary {
    pub alerts: Vec<AlertEntry>,
}

impl TableDisplay for PollSummary {
    fn to_table(&self) -> String {
        if self.alerts.is_empty() {
            return "No alerts raised".to_string();
        }

        let mut output = format!("Alerts raised: {}\n", self.alerts.len());
        for alert in &self.alerts {
            if alert.body.is_empty() {
                output.push_str(&format!("  {}\n", alert.subject));
            } else {
                output.push_str(&format!("  {} ({})\n", alert.subject, alert.body));
            }
        }
        output
    }

    fn to_compact(&self) -> String {
        format!("{} alert(s)", self.alerts.len())
    }
}

impl TableDisplay for Config {
    fn to_table(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|e| format!("<unrenderable: {}>", e))
    }

    fn to_compact(&self) -> String {
        format!(
            "poll={}ms interval={}min gate={} email={} push={}",
            self.general.poll_freq_ms,
            self.general.min_message_interval_minutes,
            self.general.gate_policy,
            self.email.is_complete(),
            self.push.is_complete()
        )
    }
}

/// Delivery outcome of one notification channel
#[derive(Debug, Clone, Serialize)]
pub struct ChannelResult {
    pub channel: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a test notification
#[derive(Debug, Clone, Serialize)]
pub struct NotifyReport {
    pub channels: Vec<ChannelResult>,
}

impl NotifyReport {
    /// Whether every channel delivered
    pub fn all_delivered(&self) -> bool {
        self.channels.iter().all(|c| c.success)
    }
}

impl TableDisplay for NotifyReport {
    fn to_table(&self) -> String {
        let mut output = String::new();
        for channel in &self.channels {
            match &channel.error {
                None => output.push_str(&format!("✓ {}\n", channel.channel)),
                Some(e) => output.push_str(&format!("✗ {}: {}\n", channel.channel, e)),
            }
        }
        output
    }

    fn to_compact(&self) -> String {
        self.channels
            .iter()
            .map(|c| format!("{}:{}", c.channel, if c.success { "ok" } else { "failed" }))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Battery, Disk, MemoryStats, SystemInfo, TemperatureStats};

    fn snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default()
            .with_memory(MemoryStats {
                used: 75,
                total: 100,
                ..Default::default()
            })
            .with_disks(vec![
                Disk {
                    filesystem: "/dev/sda1".to_string(),
                    fs_type: "ext4".to_string(),
                    used: 95,
                    free: 5,
                    mount: "/".to_string(),
                },
                Disk {
                    filesystem: "none".to_string(),
                    fs_type: "tmpfs".to_string(),
                    used: 1,
                    free: 1,
                    mount: "/run".to_string(),
                },
            ])
            .with_power(vec![Battery::new("BAT0", PowerStatus::Discharging)])
            .with_temperature(TemperatureStats {
                main: None,
                cores: vec![40.0, 50.0, 60.0],
            });
        snapshot.system = Some(SystemInfo {
            arch: "x86_64".to_string(),
            hostname: "box".to_string(),
            uptime: 10,
            platform: "linux".to_string(),
        });
        snapshot
    }

    #[test]
    fn test_check_report_derives_values() {
        let report = CheckReport::new(snapshot(), &ThresholdsConfig::default());

        assert_eq!(report.hostname.as_deref(), Some("box"));
        assert_eq!(report.power, Some(PowerStatus::Discharging));
        assert_eq!(report.readings.len(), 3);

        assert_eq!(report.readings[0].metric, "RAM");
        assert_eq!(report.readings[0].tier, Tier::Normal);
        assert_eq!(report.readings[1].metric, "/dev/sda1");
        assert_eq!(report.readings[1].tier, Tier::Danger);
        assert_eq!(report.readings[2].value, 50.0);
    }

    #[test]
    fn test_check_report_table() {
        let report = CheckReport::new(snapshot(), &ThresholdsConfig::default());
        let table = report.to_table();
        assert!(table.contains("Host: box"));
        assert!(table.contains("Power: discharging"));
        assert!(table.contains("DANGER"));
    }

    #[test]
    fn test_empty_check_report() {
        let report = CheckReport::new(Snapshot::default(), &ThresholdsConfig::default());
        assert!(report.to_table().contains("No testable metrics"));
        assert_eq!(report.to_compact(), "");
    }

    #[test]
    fn test_poll_summary() {
        let alert = Alert::new("RAM", AlertKind::TooHigh, "☠ RAM is too damn high!", "0.95 >= 0.9");
        let summary = PollSummary {
            alerts: vec![AlertEntry::from(&alert)],
        };
        assert!(summary.to_table().contains("(0.95 >= 0.9)"));
        assert_eq!(summary.to_compact(), "1 alert(s)");
    }

    #[test]
    fn test_config_table_is_toml() {
        let table = Config::default().to_table();
        assert!(table.contains("[general]"));
        assert!(table.contains("poll_freq_ms = 10000"));
    }

    #[test]
    fn test_notify_report() {
        let report = NotifyReport {
            channels: vec![
                ChannelResult {
                    channel: "terminal".to_string(),
                    success: true,
                    error: None,
                },
                ChannelResult {
                    channel: "mailgun".to_string(),
                    success: false,
                    error: Some("rejected".to_string()),
                },
            ],
        };
        assert!(!report.all_delivered());
        assert_eq!(report.to_compact(), "terminal:ok, mailgun:failed");
    }

    #[test]
    fn test_message_display() {
        let msg = Message {
            message: "Operation completed".to_string(),
            success: true,
        };

        assert!(msg.to_table().starts_with('✓'));
    }
}
