//! Tester registry
//!
//! Tracks a growing set of sub-metrics (one per filesystem, for example),
//! each with its own [`NumericTester`] sharing the same levels.

use super::tester::{GateSettings, NumericTester};
use super::types::{Alert, ThresholdLevels};
use std::collections::HashMap;
use std::time::Instant;

type Identifier<T> = Box<dyn Fn(&T) -> String + Send>;
type Parser<T> = Box<dyn Fn(&T) -> Option<f64> + Send>;

/// Lazily populated map from metric identity to tester
pub struct TesterRegistry<T> {
    levels: ThresholdLevels,
    gate: GateSettings,
    identifier: Identifier<T>,
    parser: Parser<T>,
    testers: HashMap<String, NumericTester>,
}

impl<T> TesterRegistry<T> {
    /// Create an empty registry
    ///
    /// `identifier` names the tester an item belongs to; `parser` derives the
    /// sample, returning `None` for items that should not be tested.
    pub fn new<I, P>(levels: ThresholdLevels, gate: GateSettings, identifier: I, parser: P) -> Self
    where
        I: Fn(&T) -> String + Send + 'static,
        P: Fn(&T) -> Option<f64> + Send + 'static,
    {
        Self {
            levels,
            gate,
            identifier: Box::new(identifier),
            parser: Box::new(parser),
            testers: HashMap::new(),
        }
    }

    /// Test every item observed now
    pub fn test(&mut self, items: &[T]) -> Vec<Alert> {
        self.test_at(items, Instant::now())
    }

    /// Test every item observed at `now`
    pub fn test_at(&mut self, items: &[T], now: Instant) -> Vec<Alert> {
        let mut alerts = Vec::new();

        for item in items {
            let Some(value) = (self.parser)(item) else {
                continue;
            };
            let id = (self.identifier)(item);

            let (levels, gate) = (self.levels, self.gate);
            let tester = self.testers.entry(id).or_insert_with_key(|id| {
                log::debug!("Tracking new metric '{}'", id);
                NumericTester::new(id.clone(), levels, gate)
            });

            if let Some(alert) = tester.test_at(value, now) {
                alerts.push(alert);
            }
        }

        alerts
    }

    /// Tester for an identity, if one was created
    pub fn get(&self, id: &str) -> Option<&NumericTester> {
        self.testers.get(id)
    }

    /// Whether a tester exists for an identity
    pub fn contains(&self, id: &str) -> bool {
        self.testers.contains_key(id)
    }

    /// Number of tracked identities
    pub fn len(&self) -> usize {
        self.testers.len()
    }

    /// Whether no identity has been tracked yet
    pub fn is_empty(&self) -> bool {
        self.testers.is_empty()
    }

    /// All tracked testers
    pub fn testers(&self) -> impl Iterator<Item = &NumericTester> {
        self.testers.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::types::{AlertKind, Tier};
    use crate::domain::extract::{disk_identity, disk_usage};
    use crate::domain::Disk;

    fn disk(filesystem: &str, used: u64, free: u64) -> Disk {
        Disk {
            filesystem: filesystem.to_string(),
            fs_type: "ext4".to_string(),
            used,
            free,
            mount: format!("/mnt/{}", filesystem.trim_start_matches("/dev/")),
        }
    }

    fn registry() -> TesterRegistry<Disk> {
        TesterRegistry::new(
            ThresholdLevels::new(0.8, 0.9).unwrap(),
            GateSettings::default(),
            disk_identity,
            disk_usage,
        )
    }

    #[test]
    fn test_one_tester_per_filesystem() {
        let mut registry = registry();
        let disks = vec![disk("/dev/sda1", 10, 90), disk("/dev/sdb1", 20, 80)];

        for _ in 0..5 {
            registry.test(&disks);
        }
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("/dev/sda1"));
        assert!(registry.contains("/dev/sdb1"));

        registry.test(&[disk("/dev/sdc1", 1, 1)]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_pseudo_filesystem_never_tracked() {
        let mut registry = registry();
        let alerts = registry.test(&[disk("none", 99, 1), disk("none", 100, 0)]);
        assert!(alerts.is_empty());
        assert!(registry.is_empty());
        assert!(!registry.contains("none"));
    }

    #[test]
    fn test_alerts_are_per_filesystem() {
        let mut registry = registry();
        let now = Instant::now();

        let alerts = registry.test_at(&[disk("/dev/sda1", 95, 5), disk("/dev/sdb1", 10, 90)], now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "/dev/sda1");
        assert_eq!(alerts[0].kind, AlertKind::TooHigh);

        let alerts = registry.test_at(&[disk("/dev/sda1", 96, 4), disk("/dev/sdb1", 95, 5)], now);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].metric, "/dev/sdb1");

        assert_eq!(registry.get("/dev/sda1").map(|t| t.tier()), Some(Tier::Danger));
    }
}
