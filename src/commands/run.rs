//! Run command implementation
//!
//! Starts the polling daemon: one scheduled job polls the host and feeds the
//! stat monitor.

use super::layered_config;
use crate::alerts::{NotificationManager, PushSink, PushoverNotifier};
use crate::cli::args::{OutputFormat, RunArgs};
use crate::cli::output::{print_output, AlertEntry, PollSummary};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::{Scheduler, StatMonitor};
use crate::stats::{PollDispatcher, SysinfoSource};

use std::time::Instant;

/// Execute the run command
pub fn run_daemon(args: &RunArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = layered_config(config_path)?
        .with_poll_freq(args.poll_freq)
        .with_min_interval(args.min_interval)
        .with_gate_policy(args.gate_policy.map(Into::into))
        .build()?;

    let notifier = NotificationManager::from_config(&config)?;
    if notifier.notifier_count() == 0 {
        log::warn!("No remote notification channels configured, alerts will only be logged");
    } else {
        log::info!("Notification channels: {}", notifier.names().join(", "));
    }

    let mut dispatcher = PollDispatcher::new(SysinfoSource::new())
        .set_poll_freq(config.general.poll_freq_ms)
        .register(&config.general.modules);

    if args.once {
        return poll_once(&config, &mut dispatcher, &notifier, format);
    }

    let mut monitor = StatMonitor::from_config(&config, notifier);

    log::info!("Starting poll loop");
    log::info!("  Poll frequency: {:?}", dispatcher.poll_freq());
    log::info!(
        "  Message interval: {:?} ({})",
        config.general.min_message_interval(),
        config.general.gate_policy
    );
    log::info!("  Modules: {:?}", dispatcher.modules());

    let mut scheduler = build_scheduler(&config)?;
    scheduler.add_job(
        "poll",
        dispatcher.poll_freq(),
        config.push.exception_priority,
        move || {
            dispatcher.tick(&mut monitor);
            Ok(())
        },
    );
    scheduler.run();

    Ok(())
}

/// Poll a single time and wait for every delivery before returning
fn poll_once(
    config: &Config,
    dispatcher: &mut PollDispatcher<SysinfoSource>,
    notifier: &NotificationManager,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = dispatcher.poll().ok_or_else(|| AppError::Job {
        name: "poll".to_string(),
        message: "no snapshot collected".to_string(),
    })?;

    let mut monitor = StatMonitor::from_config(config, NotificationManager::new());
    let alerts = monitor.evaluate_at(&snapshot, Instant::now());

    for alert in &alerts {
        for (channel, result) in notifier.deliver_all(alert) {
            if let Err(e) = result {
                log::error!("Failed to notify via {}: {}", channel, e);
            }
        }
    }

    let summary = PollSummary {
        alerts: alerts.iter().map(AlertEntry::from).collect(),
    };
    print_output(&summary, format)?;
    Ok(())
}

/// Scheduler reporting job failures over push when it is configured
fn build_scheduler(config: &Config) -> Result<Scheduler> {
    if !config.push.is_complete() {
        log::warn!("Pushover settings incomplete, job failures will only be logged");
        return Ok(Scheduler::new());
    }

    let reporter: Box<dyn PushSink> = Box::new(PushoverNotifier::new(config.push.clone())?);
    Ok(Scheduler::new().with_reporter(reporter))
}
