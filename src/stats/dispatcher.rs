//! Poll dispatcher
//!
//! Polls a [`StatSource`] for the enabled modules and forwards the result to a
//! [`SnapshotHandler`] as update, error or debug events.

use super::traits::{SnapshotHandler, StatSource};
use crate::domain::{Snapshot, StatModule};

use std::time::Duration;

/// Drives one stat source on a fixed frequency
pub struct PollDispatcher<S> {
    source: S,
    modules: Vec<StatModule>,
    poll_freq: Duration,
}

impl<S: StatSource> PollDispatcher<S> {
    /// Create a dispatcher with no modules registered
    pub fn new(source: S) -> Self {
        Self {
            source,
            modules: Vec::new(),
            poll_freq: Duration::from_secs(1),
        }
    }

    /// Set the polling frequency in milliseconds
    pub fn set_poll_freq(mut self, millis: u64) -> Self {
        self.poll_freq = Duration::from_millis(millis);
        self
    }

    /// Register submodules to collect
    pub fn register(mut self, modules: &[StatModule]) -> Self {
        for module in modules {
            if !self.modules.contains(module) {
                self.modules.push(*module);
            }
        }
        self
    }

    /// Poll once and emit events to `handler`
    ///
    /// Returns the snapshot when the poll succeeded.
    pub fn tick<H: SnapshotHandler + ?Sized>(&mut self, handler: &mut H) -> Option<Snapshot> {
        let result = self.source.poll(&self.modules);

        for message in self.source.take_debug_messages() {
            handler.on_debug(&message);
        }

        match result {
            Ok(snapshot) => {
                handler.on_update(&snapshot);
                Some(snapshot)
            }
            Err(e) => {
                handler.on_error(&e);
                None
            }
        }
    }

    /// Poll once without a handler
    pub fn poll(&mut self) -> Option<Snapshot> {
        struct Discard;
        impl SnapshotHandler for Discard {
            fn on_update(&mut self, _snapshot: &Snapshot) {}
        }
        self.tick(&mut Discard)
    }

    /// Interval between polls
    pub fn poll_freq(&self) -> Duration {
        self.poll_freq
    }

    /// Registered modules
    pub fn modules(&self) -> &[StatModule] {
        &self.modules
    }

    /// Underlying source
    pub fn source(&self) -> &S {
        &self.source
    }
}
