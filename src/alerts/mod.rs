//! Alert and notification system
//!
//! Provides hysteresis threshold testers with multiple notification channels.

mod notifier;
mod registry;
mod tester;
mod types;

pub use notifier::{
    append_failure, MailgunNotifier, NotificationManager, Notifier, PushMessage, PushSink,
    PushoverNotifier, TerminalNotifier,
};
pub use registry::TesterRegistry;
pub use tester::{GateSettings, MatchTester, NumericTester};
pub use types::{Alert, AlertKind, GatePolicy, Priority, ThresholdLevels, Tier};
