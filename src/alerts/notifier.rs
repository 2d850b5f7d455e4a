//! Alert notification system
//!
//! Provides notification channels for alerts: terminal, email (Mailgun) and
//! push (Pushover). Remote channels deliver on a detached thread so a poll
//! cycle never waits on the network; failures are logged and dropped.

use super::types::{Alert, AlertKind, Priority};
use crate::config::{Config, EmailConfig, PushConfig};
use crate::error::NotifyError;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Timeout applied to every remote delivery
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Notification channel trait
pub trait Notifier: Send + Sync {
    /// Deliver an alert and wait for the outcome
    fn deliver(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Dispatch an alert without surfacing failure to the caller
    fn notify(&self, alert: &Alert) {
        if let Err(e) = self.deliver(alert) {
            log::error!("Failed to notify via {}: {}", self.name(), e);
        }
    }

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Sink for raw push messages (job failures, tests)
pub trait PushSink: Send + Sync {
    /// Dispatch a push message without surfacing failure to the caller
    fn push(&self, message: PushMessage);
}

/// Terminal/console notifier
///
/// Outputs alerts to stdout/stderr with colored formatting
pub struct TerminalNotifier {
    /// Use stderr instead of stdout
    use_stderr: bool,
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalNotifier {
    /// Create a new terminal notifier
    pub fn new() -> Self {
        Self {
            use_stderr: true,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier that uses stdout
    pub fn stdout() -> Self {
        Self {
            use_stderr: false,
            use_colors: Self::supports_color(),
        }
    }

    /// Create a notifier without colors
    pub fn no_color() -> Self {
        Self {
            use_stderr: true,
            use_colors: false,
        }
    }

    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
    }

    fn format_alert(&self, alert: &Alert) -> String {
        let timestamp = alert
            .raised_at
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| {
                let secs = d.as_secs();
                let hours = (secs / 3600) % 24;
                let mins = (secs % 3600) / 60;
                let secs = secs % 60;
                format!("{:02}:{:02}:{:02}", hours, mins, secs)
            })
            .unwrap_or_else(|_| "??:??:??".to_string());

        format!(
            "[{}] {} {}: {}",
            timestamp,
            self.format_kind(alert.kind),
            alert.metric,
            alert
        )
    }

    fn format_kind(&self, kind: AlertKind) -> String {
        let (color_code, text) = match kind {
            AlertKind::TooHigh => ("\x1b[31m", "DANGER"),
            AlertKind::GettingHigh => ("\x1b[33m", "WARNING"),
            AlertKind::Recovering => ("\x1b[36m", "RECOVERING"),
            AlertKind::Recovered | AlertKind::Good => ("\x1b[32m", "OK"),
            AlertKind::Bad => ("\x1b[35m\x1b[1m", "ALERT"),
        };

        if !self.use_colors {
            return text.to_string();
        }
        format!("{}{}\x1b[0m", color_code, text)
    }
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for TerminalNotifier {
    fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        let message = self.format_alert(alert);

        if self.use_stderr {
            let stderr = io::stderr();
            let mut handle = stderr.lock();
            writeln!(handle, "{}", message)?;
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", message)?;
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

/// Email notifier backed by the Mailgun HTTP API
#[derive(Clone)]
pub struct MailgunNotifier {
    config: EmailConfig,
    client: reqwest::blocking::Client,
}

impl MailgunNotifier {
    /// Create a notifier from email settings
    pub fn new(config: EmailConfig) -> Result<Self, NotifyError> {
        if !config.is_complete() {
            return Err(NotifyError::NotConfigured("email"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    /// Messages endpoint for the configured domain
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.domain.as_deref().unwrap_or_default()
        )
    }

    /// Send one email and wait for the response
    pub fn send(&self, subject: &str, text: &str) -> Result<(), NotifyError> {
        let form = [
            ("from", self.config.from.as_deref().unwrap_or_default()),
            ("to", self.config.to.as_deref().unwrap_or_default()),
            ("subject", subject),
            ("text", text),
        ];

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth("api", self.config.api_key.as_deref())
            .form(&form)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                service: "Mailgun",
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        log::debug!("Email sent: {}", subject);
        Ok(())
    }
}

impl Notifier for MailgunNotifier {
    fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        // Mailgun rejects messages without a text part.
        let text = if alert.body.is_empty() {
            &alert.subject
        } else {
            &alert.body
        };
        self.send(&alert.subject, text)
    }

    fn notify(&self, alert: &Alert) {
        let this = self.clone();
        let alert = alert.clone();
        let spawned = thread::Builder::new()
            .name("mailgun".to_string())
            .spawn(move || {
                if let Err(e) = this.deliver(&alert) {
                    log::error!("Failed to email alert '{}': {}", alert.subject, e);
                }
            });
        if let Err(e) = spawned {
            log::error!("Failed to start email delivery: {}", e);
        }
    }

    fn name(&self) -> &str {
        "email"
    }
}

/// A push notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub priority: Priority,
}

impl PushMessage {
    /// Message with only a body at normal priority
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            sound: None,
            device: None,
            priority: Priority::Normal,
        }
    }

    /// Builder: set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: set sound
    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Builder: set target device
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Push record for an alert; the subject doubles as body when there is none
    pub fn from_alert(alert: &Alert) -> Self {
        let body = if alert.body.is_empty() {
            alert.subject.clone()
        } else {
            alert.body.clone()
        };
        Self::new(body)
            .with_title(alert.subject.clone())
            .with_priority(alert.priority())
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("message", self.message.clone()),
            ("priority", self.priority.as_i8().to_string()),
        ];
        if let Some(title) = &self.title {
            fields.push(("title", title.clone()));
        }
        if let Some(sound) = &self.sound {
            fields.push(("sound", sound.clone()));
        }
        if let Some(device) = &self.device {
            fields.push(("device", device.clone()));
        }
        fields
    }
}

/// Push notifier backed by the Pushover HTTP API
#[derive(Clone)]
pub struct PushoverNotifier {
    config: PushConfig,
    client: reqwest::blocking::Client,
}

impl PushoverNotifier {
    /// Create a notifier from push settings
    pub fn new(config: PushConfig) -> Result<Self, NotifyError> {
        if !config.is_complete() {
            return Err(NotifyError::NotConfigured("push"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self { config, client })
    }

    /// Send one push message and wait for the response
    pub fn send(&self, message: &PushMessage) -> Result<(), NotifyError> {
        let mut form = message.form_fields();
        form.push(("token", self.config.token.clone().unwrap_or_default()));
        form.push(("user", self.config.user.clone().unwrap_or_default()));

        let response = self.client.post(&self.config.api_url).form(&form).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                service: "Pushover",
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        log::debug!("Push message sent: {}", message.message);
        Ok(())
    }

    fn record_failure(&self, message: &PushMessage, err: &NotifyError) {
        log::error!("Push delivery failed: {}", err);
        if let Err(e) = append_failure(&self.config.failure_log, message, err) {
            log::error!(
                "Failed to append to {}: {}",
                self.config.failure_log.display(),
                e
            );
        }
    }
}

impl PushSink for PushoverNotifier {
    fn push(&self, message: PushMessage) {
        let this = self.clone();
        let spawned = thread::Builder::new()
            .name("pushover".to_string())
            .spawn(move || {
                if let Err(e) = this.send(&message) {
                    this.record_failure(&message, &e);
                }
            });
        if let Err(e) = spawned {
            log::error!("Failed to start push delivery: {}", e);
        }
    }
}

impl Notifier for PushoverNotifier {
    fn deliver(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.send(&PushMessage::from_alert(alert))
    }

    fn notify(&self, alert: &Alert) {
        self.push(PushMessage::from_alert(alert));
    }

    fn name(&self) -> &str {
        "push"
    }
}

/// Append a failed push message to the local failure log
pub fn append_failure(path: &Path, message: &PushMessage, err: &NotifyError) -> io::Result<()> {
    let record = serde_json::to_string(message).unwrap_or_else(|_| message.message.clone());
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "Pushover error: {}. Message: {}", err, record)
}

/// Notification manager
///
/// Manages multiple notification channels and dispatches alerts to them
pub struct NotificationManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationManager {
    /// Create a new notification manager
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// Every remote channel the configuration enables
    ///
    /// The stat monitor already logs each alert, so no terminal channel is added.
    pub fn from_config(config: &Config) -> Result<Self, NotifyError> {
        let mut manager = Self::new();

        if config.email.is_complete() {
            manager.add_notifier(Box::new(MailgunNotifier::new(config.email.clone())?));
        } else {
            log::warn!("Email channel disabled: Mailgun settings incomplete");
        }

        if config.push.forward_alerts {
            if config.push.is_complete() {
                manager.add_notifier(Box::new(PushoverNotifier::new(config.push.clone())?));
            } else {
                log::warn!("Push forwarding requested but Pushover settings incomplete");
            }
        }

        Ok(manager)
    }

    /// Add a notifier
    pub fn add_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Dispatch to all channels, fire-and-forget
    pub fn notify_all(&self, alert: &Alert) {
        for notifier in &self.notifiers {
            notifier.notify(alert);
        }
    }

    /// Dispatch multiple alerts
    pub fn notify_batch(&self, alerts: &[Alert]) {
        for alert in alerts {
            self.notify_all(alert);
        }
    }

    /// Deliver to all channels and collect each outcome
    pub fn deliver_all(&self, alert: &Alert) -> Vec<(String, Result<(), NotifyError>)> {
        self.notifiers
            .iter()
            .map(|n| (n.name().to_string(), n.deliver(alert)))
            .collect()
    }

    /// Get number of active notifiers
    pub fn notifier_count(&self) -> usize {
        self.notifiers.len()
    }

    /// Names of active notifiers
    pub fn names(&self) -> Vec<&str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        let mut manager = Self::new();
        manager.add_notifier(Box::new(TerminalNotifier::new()));
        manager
    }
}
