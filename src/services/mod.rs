//! Service layer
//!
//! Services own the long-lived monitoring state and drive it on a schedule.

pub mod jobs;
pub mod monitor;

pub use jobs::{JobOutcome, Scheduler};
pub use monitor::StatMonitor;
