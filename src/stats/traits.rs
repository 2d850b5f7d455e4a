//! Trait definitions for stat collection
//!
//! These traits abstract over the host so the monitor can be driven by
//! scripted snapshots in tests while using sysinfo in production.

use crate::domain::{Snapshot, StatModule};
use crate::error::CollectError;

/// Source of host telemetry snapshots
pub trait StatSource {
    /// Collect one snapshot containing only the requested modules
    fn poll(&mut self, modules: &[StatModule]) -> Result<Snapshot, CollectError>;

    /// Fail-soft notes gathered during the last poll (missing sensors, etc.)
    fn take_debug_messages(&mut self) -> Vec<String> {
        Vec::new()
    }
}

/// Receiver of poll events
///
/// Only `on_update` is required; errors and debug notes are logged by default.
pub trait SnapshotHandler {
    /// A poll completed
    fn on_update(&mut self, snapshot: &Snapshot);

    /// A poll failed
    fn on_error(&mut self, err: &CollectError) {
        log::error!("Stat collection error: {}", err);
    }

    /// A module could only partially do its job
    fn on_debug(&mut self, message: &str) {
        log::debug!("Stat collection: {}", message);
    }
}
