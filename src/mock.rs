//! Mock implementations for testing
//!
//! Provides a scripted stat source and a recording notifier so the monitor
//! can be exercised without real hardware or network access.

use crate::alerts::{Alert, Notifier, PushMessage, PushSink};
use crate::domain::{Snapshot, StatModule};
use crate::error::{CollectError, NotifyError};
use crate::stats::StatSource;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Stat source replaying a fixed list of snapshots
#[derive(Debug, Default)]
pub struct MockStatSource {
    snapshots: VecDeque<Result<Snapshot, String>>,
    polls: usize,
}

impl MockStatSource {
    /// Create a source replaying `snapshots` in order
    pub fn new(snapshots: impl IntoIterator<Item = Snapshot>) -> Self {
        Self {
            snapshots: snapshots.into_iter().map(Ok).collect(),
            polls: 0,
        }
    }

    /// Builder: queue a read failure
    pub fn with_failure(mut self, what: impl Into<String>) -> Self {
        self.snapshots.push_back(Err(what.into()));
        self
    }

    /// Number of polls served so far
    pub fn polls(&self) -> usize {
        self.polls
    }
}

impl StatSource for MockStatSource {
    fn poll(&mut self, modules: &[StatModule]) -> Result<Snapshot, CollectError> {
        self.polls += 1;
        match self.snapshots.pop_front() {
            Some(Ok(snapshot)) => Ok(filter_modules(snapshot, modules)),
            Some(Err(what)) => Err(CollectError::Read {
                what,
                source: std::io::Error::other("scripted failure"),
            }),
            None => Err(CollectError::Exhausted),
        }
    }
}

fn filter_modules(mut snapshot: Snapshot, modules: &[StatModule]) -> Snapshot {
    let enabled = |m: StatModule| modules.contains(&m);
    if !enabled(StatModule::Cpu) {
        snapshot.cpu = None;
    }
    if !enabled(StatModule::Disks) {
        snapshot.disks = None;
    }
    if !enabled(StatModule::Files) {
        snapshot.files = None;
    }
    if !enabled(StatModule::Io) {
        snapshot.io = None;
    }
    if !enabled(StatModule::Memory) {
        snapshot.memory = None;
    }
    if !enabled(StatModule::Power) {
        snapshot.power = None;
    }
    if !enabled(StatModule::System) {
        snapshot.system = None;
    }
    if !enabled(StatModule::Temperature) {
        snapshot.temperature = None;
    }
    snapshot
}

/// Notifier that records everything it is asked to send
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<Alert>>>,
    pushes: Arc<Mutex<Vec<PushMessage>>>,
    fail: bool,
}

impl RecordingNotifier {
    /// Create a recording notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier whose deliveries always fail (nothing is recorded)
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Alerts delivered so far
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    /// Push messages received so far
    pub fn pushes(&self) -> Vec<PushMessage> {
        self.pushes.lock().unwrap().clone()
    }

    /// Subjects of delivered alerts
    pub fn subjects(&self) -> Vec<String> {
        self.alerts().into_iter().map(|a| a.subject).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::NotConfigured("recording"));
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

impl PushSink for RecordingNotifier {
    fn push(&self, message: PushMessage) {
        self.pushes.lock().unwrap().push(message);
    }
}
