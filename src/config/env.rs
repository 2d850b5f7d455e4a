//! Environment variable overrides
//!
//! | Variable               | Setting                                  |
//! |------------------------|------------------------------------------|
//! | `POLL_FREQ`            | `general.poll_freq_ms`                   |
//! | `MIN_MESSAGE_INTERVAL` | `general.min_message_interval_minutes`   |
//! | `MEMORY_WARN`          | `thresholds.memory.warning`              |
//! | `MEMORY_DANGER`        | `thresholds.memory.danger`               |
//! | `DISK_WARN`            | `thresholds.disk.warning`                |
//! | `DISK_DANGER`          | `thresholds.disk.danger`                 |
//! | `TEMP_WARN`            | `thresholds.temperature.warning`         |
//! | `TEMP_DANGER`          | `thresholds.temperature.danger`          |
//! | `MAILGUN_API_KEY`      | `email.api_key`                          |
//! | `MAILGUN_DOMAIN`       | `email.domain`                           |
//! | `SEND_EMAILS_FROM`     | `email.from`                             |
//! | `SEND_EMAILS_TO`       | `email.to`                               |
//! | `PUSHOVER_USER`        | `push.user`                              |
//! | `PUSHOVER_TOKEN`       | `push.token`                             |

use super::Config;
use crate::error::ConfigError;
use std::str::FromStr;

/// Apply overrides from the process environment
pub fn apply_process_env(config: &mut Config) -> Result<(), ConfigError> {
    apply_env(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
///
/// Empty values are treated as unset.
pub fn apply_env<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("POLL_FREQ") {
        // Fractional milliseconds are rounded.
        config.general.poll_freq_ms = parse::<f64>("POLL_FREQ", &v)?.round() as u64;
    }
    if let Some(v) = get("MIN_MESSAGE_INTERVAL") {
        config.general.min_message_interval_minutes = parse("MIN_MESSAGE_INTERVAL", &v)?;
    }

    let levels = [
        ("MEMORY_WARN", &mut config.thresholds.memory.warning),
        ("MEMORY_DANGER", &mut config.thresholds.memory.danger),
        ("DISK_WARN", &mut config.thresholds.disk.warning),
        ("DISK_DANGER", &mut config.thresholds.disk.danger),
        ("TEMP_WARN", &mut config.thresholds.temperature.warning),
        ("TEMP_DANGER", &mut config.thresholds.temperature.danger),
    ];
    for (key, slot) in levels {
        if let Some(v) = get(key) {
            *slot = parse(key, &v)?;
        }
    }

    let strings = [
        ("MAILGUN_API_KEY", &mut config.email.api_key),
        ("MAILGUN_DOMAIN", &mut config.email.domain),
        ("SEND_EMAILS_FROM", &mut config.email.from),
        ("SEND_EMAILS_TO", &mut config.email.to),
        ("PUSHOVER_USER", &mut config.push.user),
        ("PUSHOVER_TOKEN", &mut config.push.token),
    ];
    for (key, slot) in strings {
        if let Some(v) = get(key) {
            *slot = Some(v);
        }
    }

    Ok(())
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ConfigError::invalid(key, format!("'{}': {}", raw, e)))
}
