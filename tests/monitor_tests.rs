//! End-to-end tests driving the stat monitor through the poll dispatcher

use hostwatch::alerts::{AlertKind, GatePolicy, GateSettings, NotificationManager, Tier};
use hostwatch::config::{ConfigBuilder, ThresholdsConfig};
use hostwatch::domain::{Disk, MemoryStats, Snapshot, StatModule, TemperatureStats};
use hostwatch::error::CollectError;
use hostwatch::mock::{MockStatSource, RecordingNotifier};
use hostwatch::services::StatMonitor;
use hostwatch::stats::{PollDispatcher, SnapshotHandler};

use std::time::{Duration, Instant};

fn monitor_with(outbox: &RecordingNotifier, thresholds: &ThresholdsConfig) -> StatMonitor {
    let mut notifier = NotificationManager::new();
    notifier.add_notifier(Box::new(outbox.clone()));
    StatMonitor::new(
        thresholds,
        GateSettings::new(Duration::from_secs(3600), GatePolicy::Recency),
        notifier,
    )
}

/// Memory levels 0.7/0.9
fn memory_monitor(outbox: &RecordingNotifier) -> StatMonitor {
    let mut thresholds = ThresholdsConfig::default();
    thresholds.memory.warning = 0.7;
    monitor_with(outbox, &thresholds)
}

fn memory(used: u64) -> Snapshot {
    Snapshot::default().with_memory(MemoryStats {
        used,
        total: 100,
        ..Default::default()
    })
}

#[test]
fn memory_sequence_within_interval() {
    let outbox = RecordingNotifier::new();
    let mut monitor = memory_monitor(&outbox);
    let start = Instant::now();

    for (i, used) in [50, 75, 95, 96, 50].into_iter().enumerate() {
        monitor.process_at(&memory(used), start + Duration::from_secs(i as u64 * 10));
    }

    assert_eq!(
        outbox.subjects(),
        vec![
            "⚠ RAM is getting high!",
            "☠ RAM is too damn high!",
            "👍 RAM has recovered",
        ]
    );
    assert_eq!(monitor.memory().tier(), Tier::Normal);
}

#[test]
fn memory_sequence_outside_interval() {
    let outbox = RecordingNotifier::new();
    let mut monitor = memory_monitor(&outbox);
    let start = Instant::now();

    monitor.process_at(&memory(50), start);
    monitor.process_at(&memory(75), start);
    monitor.process_at(&memory(95), start);
    monitor.process_at(&memory(96), start);
    monitor.process_at(&memory(50), start + Duration::from_secs(2 * 3600));

    assert_eq!(
        outbox.subjects(),
        vec!["⚠ RAM is getting high!", "☠ RAM is too damn high!"]
    );
    assert_eq!(monitor.memory().tier(), Tier::Danger);
}

#[test]
fn dispatcher_feeds_monitor() {
    let outbox = RecordingNotifier::new();
    let mut monitor = monitor_with(&outbox, &ThresholdsConfig::default());

    let disks = vec![
        Disk {
            filesystem: "/dev/nvme0n1p2".to_string(),
            fs_type: "ext4".to_string(),
            used: 85,
            free: 15,
            mount: "/".to_string(),
        },
        Disk {
            filesystem: "none".to_string(),
            fs_type: "tmpfs".to_string(),
            used: 0,
            free: 0,
            mount: "/dev/shm".to_string(),
        },
    ];
    // Memory is not registered, so the source drops it before the monitor sees it
    let source = MockStatSource::new([
        Snapshot::default()
            .with_disks(disks.clone())
            .with_memory(MemoryStats {
                used: 95,
                total: 100,
                ..Default::default()
            }),
        Snapshot::default()
            .with_disks(disks)
            .with_temperature(TemperatureStats {
                main: None,
                cores: vec![40.0, 50.0, 60.0],
            }),
    ]);

    let mut dispatcher = PollDispatcher::new(source)
        .set_poll_freq(250)
        .register(&[StatModule::Disks, StatModule::Temperature]);

    assert!(dispatcher.tick(&mut monitor).is_some());
    assert!(dispatcher.tick(&mut monitor).is_some());
    assert!(dispatcher.tick(&mut monitor).is_none());

    assert_eq!(outbox.subjects(), vec!["⚠ /dev/nvme0n1p2 is getting high!"]);
    assert_eq!(monitor.disks().len(), 1);
    assert!(!monitor.disks().contains("none"));
    assert_eq!(monitor.temperature().tier(), Tier::Normal);
    assert_eq!(dispatcher.poll_freq(), Duration::from_millis(250));
    assert_eq!(monitor.memory().tier(), Tier::Normal);
    assert_eq!(dispatcher.source().polls(), 3);
}

#[test]
fn custom_handler_sees_updates_and_errors() {
    #[derive(Default)]
    struct Tally {
        updates: usize,
        errors: usize,
        debug: usize,
    }

    impl SnapshotHandler for Tally {
        fn on_update(&mut self, _snapshot: &Snapshot) {
            self.updates += 1;
        }

        fn on_error(&mut self, _err: &CollectError) {
            self.errors += 1;
        }

        fn on_debug(&mut self, _message: &str) {
            self.debug += 1;
        }
    }

    let mut tally = Tally::default();
    let source = MockStatSource::new([Snapshot::default()]).with_failure("meminfo");
    let mut dispatcher = PollDispatcher::new(source).register(&[StatModule::Memory]);

    assert!(dispatcher.tick(&mut tally).is_some());
    assert!(dispatcher.tick(&mut tally).is_none());
    assert!(dispatcher.tick(&mut tally).is_none());

    assert_eq!(tally.updates, 1);
    assert_eq!(tally.errors, 2);
    assert_eq!(tally.debug, 0);
}

#[test]
fn cooldown_policy_from_config() {
    let config = ConfigBuilder::new()
        .with_env_lookup(|key| match key {
            "MIN_MESSAGE_INTERVAL" => Some("1".to_string()),
            "MEMORY_WARN" => Some("0.7".to_string()),
            _ => None,
        })
        .unwrap()
        .with_gate_policy(Some(GatePolicy::Cooldown))
        .build()
        .unwrap();

    let outbox = RecordingNotifier::new();
    let mut notifier = NotificationManager::new();
    notifier.add_notifier(Box::new(outbox.clone()));
    let mut monitor = StatMonitor::from_config(&config, notifier);
    let start = Instant::now();

    let alerts = monitor.process_at(&memory(75), start);
    assert_eq!(alerts[0].kind, AlertKind::GettingHigh);
    let alerts = monitor.process_at(&memory(95), start);
    assert_eq!(alerts[0].kind, AlertKind::TooHigh);

    // Still inside the one minute cooldown
    assert!(monitor
        .process_at(&memory(75), start + Duration::from_secs(30))
        .is_empty());

    let alerts = monitor.process_at(&memory(75), start + Duration::from_secs(90));
    assert_eq!(alerts[0].kind, AlertKind::Recovering);
    assert_eq!(monitor.alerts_raised(), 3);
}
