//! Battery status from the Linux power_supply class
//!
//! Reads `/sys/class/power_supply/*` entries whose `type` is `Battery`.

use crate::domain::{Battery, PowerStatus};
use crate::error::CollectError;

use std::fs;
use std::path::{Path, PathBuf};

/// Default sysfs directory for power supplies
pub const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Reader for battery entries under a power_supply directory
#[derive(Debug, Clone)]
pub struct PowerSupplyReader {
    root: PathBuf,
}

impl PowerSupplyReader {
    /// Reader for the system power_supply directory
    pub fn new() -> Self {
        Self::with_root(POWER_SUPPLY_DIR)
    }

    /// Reader rooted at a custom directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the power_supply path exists on this host
    pub fn is_available(&self) -> bool {
        self.root.exists()
    }

    /// Read every battery, sorted by device name
    pub fn read(&self) -> Result<Vec<Battery>, CollectError> {
        let entries = fs::read_dir(&self.root).map_err(|source| CollectError::Read {
            what: self.root.display().to_string(),
            source,
        })?;

        let mut batteries: Vec<Battery> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| read_attr(path, "type").as_deref() == Some("Battery"))
            .filter_map(|path| read_battery(&path))
            .collect();

        batteries.sort_by(|a, b| a.device.cmp(&b.device));
        Ok(batteries)
    }
}

impl Default for PowerSupplyReader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_battery(path: &Path) -> Option<Battery> {
    let device = path.file_name()?.to_string_lossy().into_owned();
    let status = read_attr(path, "status")
        .map(|s| PowerStatus::from_sysfs(&s))
        .unwrap_or(PowerStatus::Unknown);

    Some(Battery {
        device,
        manufacturer: read_attr(path, "manufacturer"),
        model: read_attr(path, "model_name"),
        status,
        percent: read_attr(path, "capacity").and_then(|c| c.parse().ok()),
    })
}

fn read_attr(dir: &Path, name: &str) -> Option<String> {
    fs::read_to_string(dir.join(name))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
