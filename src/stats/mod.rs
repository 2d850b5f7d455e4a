//! Host stat collection
//!
//! Provides the stat source abstraction, the sysinfo-backed implementation
//! and the poll dispatcher that delivers snapshots to a handler.

pub mod dispatcher;
pub mod power;
pub mod sysinfo_source;
pub mod traits;

pub use dispatcher::PollDispatcher;
pub use power::PowerSupplyReader;
pub use sysinfo_source::SysinfoSource;
pub use traits::{SnapshotHandler, StatSource};
