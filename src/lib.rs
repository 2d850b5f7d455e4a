//! hostwatch - host telemetry monitor library
//!
//! This library polls host telemetry (memory, disks, power, temperature),
//! runs every metric through a hysteresis threshold tester and dispatches
//! the resulting alerts over email and push.
//!
//! # Modules
//!
//! - [`alerts`]: Threshold testers and notification channels
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Snapshot shape and extraction rules
//! - [`error`]: Error types
//! - [`services`]: Stat monitor and job scheduler
//! - [`stats`]: Stat sources and the poll dispatcher

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod stats;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
