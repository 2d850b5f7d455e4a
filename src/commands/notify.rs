//! Notify-test command implementation
//!
//! Sends one test alert through every configured channel and waits for each
//! delivery outcome.

use super::layered_config;
use crate::alerts::{Alert, AlertKind, NotificationManager, PushoverNotifier, TerminalNotifier};
use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, ChannelResult, NotifyReport};
use crate::error::Result;

/// Execute the notify-test command
pub fn run_notify_test(format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = layered_config(config_path)?.build()?;

    let mut manager = NotificationManager::from_config(&config)?;
    if config.push.is_complete() && !config.push.forward_alerts {
        manager.add_notifier(Box::new(PushoverNotifier::new(config.push.clone())?));
    }
    manager.add_notifier(Box::new(TerminalNotifier::new()));

    let alert = Alert::new(
        "hostwatch",
        AlertKind::Good,
        "✅ hostwatch test notification",
        "Notification channels are working",
    );

    let mut first_error = None;
    let mut channels = Vec::new();
    for (channel, result) in manager.deliver_all(&alert) {
        let error = match result {
            Ok(()) => None,
            Err(e) => {
                let message = e.to_string();
                first_error.get_or_insert(e);
                Some(message)
            }
        };
        channels.push(ChannelResult {
            channel,
            success: error.is_none(),
            error,
        });
    }

    print_output(&NotifyReport { channels }, format)?;

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
