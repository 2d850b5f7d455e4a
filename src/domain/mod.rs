//! Domain types for host telemetry
//!
//! This module contains the snapshot shape delivered on every poll and the
//! pure extraction rules that turn snapshot sections into testable samples.

pub mod extract;
pub mod snapshot;

pub use snapshot::{
    Battery, CpuStats, Disk, FileValue, IoStats, MemoryStats, PowerStatus, Snapshot, StatModule,
    SystemInfo, TemperatureStats,
};
