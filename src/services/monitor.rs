//! Stat monitor
//!
//! Owns every threshold tester and the notification channels, and turns each
//! delivered snapshot into alert transitions.

use crate::alerts::{
    Alert, GateSettings, MatchTester, NotificationManager, NumericTester, TesterRegistry,
};
use crate::config::{Config, ThresholdsConfig};
use crate::domain::extract::{
    disk_identity, disk_usage, mean_temperature, memory_usage, power_status,
};
use crate::domain::{Disk, PowerStatus, Snapshot};
use crate::stats::SnapshotHandler;

use std::time::Instant;

/// Metric name used for memory alerts
pub const MEMORY_METRIC: &str = "RAM";
/// Metric name used for temperature alerts
pub const TEMPERATURE_METRIC: &str = "Temperature";
/// Metric name used for power alerts
pub const POWER_METRIC: &str = "Power";

/// Poll handler holding all per-metric state
pub struct StatMonitor {
    memory: NumericTester,
    disks: TesterRegistry<Disk>,
    power: MatchTester<PowerStatus>,
    temperature: NumericTester,
    notifier: NotificationManager,
    alerts_raised: u64,
}

impl StatMonitor {
    /// Create a monitor with fresh testers
    pub fn new(
        thresholds: &ThresholdsConfig,
        gate: GateSettings,
        notifier: NotificationManager,
    ) -> Self {
        Self {
            memory: NumericTester::new(MEMORY_METRIC, thresholds.memory, gate),
            disks: TesterRegistry::new(thresholds.disk, gate, disk_identity, disk_usage),
            power: MatchTester::new(
                POWER_METRIC,
                PowerStatus::Discharging,
                "🔌 Began discharging",
                "🔋 Power restored",
                gate,
            ),
            temperature: NumericTester::new(TEMPERATURE_METRIC, thresholds.temperature, gate),
            notifier,
            alerts_raised: 0,
        }
    }

    /// Create a monitor from the full configuration
    pub fn from_config(config: &Config, notifier: NotificationManager) -> Self {
        Self::new(&config.thresholds, config.gate_settings(), notifier)
    }

    /// Evaluate a snapshot observed now and dispatch its alerts
    pub fn process(&mut self, snapshot: &Snapshot) -> Vec<Alert> {
        self.process_at(snapshot, Instant::now())
    }

    /// Evaluate a snapshot observed at `now` and dispatch its alerts
    pub fn process_at(&mut self, snapshot: &Snapshot, now: Instant) -> Vec<Alert> {
        let alerts = self.evaluate_at(snapshot, now);

        for alert in &alerts {
            if alert.kind.is_raise() {
                log::warn!("{}", alert);
            } else {
                log::info!("{}", alert);
            }
        }

        self.notifier.notify_batch(&alerts);
        self.alerts_raised += alerts.len() as u64;
        alerts
    }

    /// Evaluate a snapshot without dispatching anything
    ///
    /// Absent sections are skipped for this cycle.
    pub fn evaluate_at(&mut self, snapshot: &Snapshot, now: Instant) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if let Some(disks) = &snapshot.disks {
            alerts.extend(self.disks.test_at(disks, now));
        }

        if let Some(value) = snapshot.memory.as_ref().and_then(memory_usage) {
            alerts.extend(self.memory.test_at(value, now));
        }

        if let Some(status) = snapshot.power.as_deref().and_then(power_status) {
            alerts.extend(self.power.test_at(&status, now));
        }

        if let Some(value) = snapshot.temperature.as_ref().and_then(mean_temperature) {
            alerts.extend(self.temperature.test_at(value, now));
        }

        alerts
    }

    /// Memory tester
    pub fn memory(&self) -> &NumericTester {
        &self.memory
    }

    /// Per-filesystem disk testers
    pub fn disks(&self) -> &TesterRegistry<Disk> {
        &self.disks
    }

    /// Power tester
    pub fn power(&self) -> &MatchTester<PowerStatus> {
        &self.power
    }

    /// Temperature tester
    pub fn temperature(&self) -> &NumericTester {
        &self.temperature
    }

    /// Total alerts dispatched since start
    pub fn alerts_raised(&self) -> u64 {
        self.alerts_raised
    }
}

impl SnapshotHandler for StatMonitor {
    fn on_update(&mut self, snapshot: &Snapshot) {
        let alerts = self.process(snapshot);
        log::debug!("Poll evaluated, {} alert(s)", alerts.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::{AlertKind, GatePolicy, Tier};
    use crate::domain::{Battery, MemoryStats, TemperatureStats};
    use crate::mock::RecordingNotifier;
    use std::time::Duration;

    fn monitor(policy: GatePolicy) -> (StatMonitor, RecordingNotifier) {
        let recorder = RecordingNotifier::new();
        let mut notifier = NotificationManager::new();
        notifier.add_notifier(Box::new(recorder.clone()));
        let gate = GateSettings::new(Duration::from_secs(3600), policy);
        let monitor = StatMonitor::new(&ThresholdsConfig::default(), gate, notifier);
        (monitor, recorder)
    }

    fn memory(used: u64, total: u64) -> MemoryStats {
        MemoryStats {
            used,
            total,
            ..Default::default()
        }
    }

    fn disk(filesystem: &str, used: u64, free: u64) -> Disk {
        Disk {
            filesystem: filesystem.to_string(),
            fs_type: "ext4".to_string(),
            used,
            free,
            mount: "/".to_string(),
        }
    }

    #[test]
    fn test_empty_snapshot_is_skipped() {
        let (mut monitor, recorder) = monitor(GatePolicy::Recency);
        assert!(monitor.process(&Snapshot::default()).is_empty());
        assert!(recorder.alerts().is_empty());
        assert!(monitor.disks().is_empty());
    }

    #[test]
    fn test_memory_alert_is_dispatched() {
        let (mut monitor, recorder) = monitor(GatePolicy::Recency);
        let snapshot = Snapshot::default().with_memory(memory(95, 100));

        let alerts = monitor.process(&snapshot);
        assert_eq!(alerts.len(), 1);
        assert_eq!(recorder.subjects(), vec!["☠ RAM is too damn high!"]);
        assert_eq!(monitor.memory().tier(), Tier::Danger);
        assert_eq!(monitor.alerts_raised(), 1);
    }

    #[test]
    fn test_zero_total_memory_is_skipped() {
        let (mut monitor, recorder) = monitor(GatePolicy::Recency);
        monitor.process(&Snapshot::default().with_memory(memory(0, 0)));
        assert!(recorder.alerts().is_empty());
        assert_eq!(monitor.memory().tier(), Tier::Normal);
    }

    #[test]
    fn test_temperature_uses_core_mean() {
        let (mut monitor, _recorder) = monitor(GatePolicy::Recency);
        let snapshot = Snapshot::default().with_temperature(TemperatureStats {
            main: Some(100.0),
            cores: vec![60.0, 70.0, 80.0],
        });

        let alerts = monitor.evaluate_at(&snapshot, Instant::now());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::GettingHigh);
        assert_eq!(alerts[0].value, Some(70.0));
        assert_eq!(alerts[0].subject, "⚠ Temperature is getting high!");
    }

    #[test]
    fn test_disks_tracked_per_filesystem() {
        let (mut monitor, recorder) = monitor(GatePolicy::Recency);
        let snapshot = Snapshot::default().with_disks(vec![
            disk("/dev/sda1", 95, 5),
            disk("none", 100, 0),
            disk("/dev/sdb1", 10, 90),
        ]);

        monitor.process(&snapshot);
        monitor.process(&snapshot);
        assert_eq!(monitor.disks().len(), 2);
        assert!(!monitor.disks().contains("none"));
        assert_eq!(recorder.subjects(), vec!["☠ /dev/sda1 is too damn high!"]);
    }

    #[test]
    fn test_power_only_first_entry_counts() {
        let (mut monitor, recorder) = monitor(GatePolicy::Cooldown);
        let snapshot = Snapshot::default().with_power(vec![
            Battery::new("BAT0", PowerStatus::Charging),
            Battery::new("BAT1", PowerStatus::Discharging),
        ]);
        monitor.process(&snapshot);
        assert!(recorder.alerts().is_empty());

        let snapshot = Snapshot::default().with_power(vec![Battery::new(
            "BAT0",
            PowerStatus::Discharging,
        )]);
        monitor.process(&snapshot);
        assert_eq!(recorder.subjects(), vec!["🔌 Began discharging"]);
        assert!(monitor.power().is_bad());
    }

    #[test]
    fn test_power_never_fires_with_recency_gate() {
        let (mut monitor, recorder) = monitor(GatePolicy::Recency);
        for status in [
            PowerStatus::Charging,
            PowerStatus::Discharging,
            PowerStatus::Discharging,
            PowerStatus::Charging,
        ] {
            monitor.process(&Snapshot::default().with_power(vec![Battery::new("BAT0", status)]));
        }
        assert!(recorder.alerts().is_empty());
    }

    #[test]
    fn test_empty_power_list_is_skipped() {
        let (mut monitor, recorder) = monitor(GatePolicy::Cooldown);
        monitor.process(&Snapshot::default().with_power(Vec::new()));
        assert!(recorder.alerts().is_empty());
        assert!(monitor.power().last_notified().is_none());
    }
}
