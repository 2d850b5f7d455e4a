//! Snapshot domain types
//!
//! One polled set of host telemetry. Every section is optional: a section is
//! only present when its module was enabled and the source could read it.

use crate::error::CollectError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Stat submodules a source can be asked to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatModule {
    Cpu,
    Disks,
    Files,
    Io,
    Memory,
    Power,
    System,
    Temperature,
}

impl StatModule {
    /// Modules the monitor registers by default
    pub const MONITORED: [StatModule; 4] = [
        StatModule::Temperature,
        StatModule::Memory,
        StatModule::Disks,
        StatModule::Power,
    ];

    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Disks => "disks",
            Self::Files => "files",
            Self::Io => "io",
            Self::Memory => "memory",
            Self::Power => "power",
            Self::System => "system",
            Self::Temperature => "temperature",
        }
    }
}

impl fmt::Display for StatModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatModule {
    type Err = CollectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Self::Cpu),
            "disks" => Ok(Self::Disks),
            "files" => Ok(Self::Files),
            "io" => Ok(Self::Io),
            "memory" => Ok(Self::Memory),
            "power" => Ok(Self::Power),
            "system" => Ok(Self::System),
            "temperature" => Ok(Self::Temperature),
            other => Err(CollectError::UnknownModule(other.to_string())),
        }
    }
}

/// CPU usage and load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuStats {
    /// Global usage percentage (0-100)
    pub usage: f64,
    /// 1, 5 and 15 minute load averages
    pub load: [f64; 3],
}

/// A mounted filesystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    /// Filesystem identity (device name, or "none" for pseudo filesystems)
    pub filesystem: String,
    /// Filesystem type, e.g. ext4
    #[serde(rename = "type")]
    pub fs_type: String,
    /// Used bytes
    pub used: u64,
    /// Free bytes
    pub free: u64,
    /// Mount point
    pub mount: String,
}

/// System-wide disk throughput
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IoStats {
    /// Disk read in KB/s
    pub total_read: f64,
    /// Disk write in KB/s
    pub total_write: f64,
}

/// Memory usage in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MemoryStats {
    pub cache: u64,
    pub free: u64,
    pub used: u64,
    pub total: u64,
    pub buffers: u64,
}

/// Battery charge state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerStatus {
    Charging,
    Discharging,
    Full,
    NotCharging,
    Unknown,
}

impl PowerStatus {
    /// Parse the kernel's power_supply `status` attribute
    pub fn from_sysfs(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "charging" => Self::Charging,
            "discharging" => Self::Discharging,
            "full" => Self::Full,
            "not charging" | "not_charging" => Self::NotCharging,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PowerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Charging => write!(f, "charging"),
            Self::Discharging => write!(f, "discharging"),
            Self::Full => write!(f, "full"),
            Self::NotCharging => write!(f, "not charging"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A battery or other power supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub device: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub status: PowerStatus,
    /// Charge level (0-100)
    pub percent: Option<f64>,
}

impl Battery {
    /// Battery with only a device name and status
    pub fn new(device: impl Into<String>, status: PowerStatus) -> Self {
        Self {
            device: device.into(),
            manufacturer: None,
            model: None,
            status,
            percent: None,
        }
    }
}

/// Host identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub arch: String,
    pub hostname: String,
    /// Uptime in seconds
    pub uptime: u64,
    pub platform: String,
}

/// Temperature readings in Celsius
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TemperatureStats {
    pub main: Option<f64>,
    pub cores: Vec<f64>,
}

/// Value read from a watched file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileValue {
    Number(f64),
    Text(String),
}

/// One polled set of telemetry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disks: Option<Vec<Disk>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<BTreeMap<String, Vec<FileValue>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub io: Option<IoStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Vec<Battery>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<SystemInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<TemperatureStats>,
}

impl Snapshot {
    /// Builder: set memory section
    pub fn with_memory(mut self, memory: MemoryStats) -> Self {
        self.memory = Some(memory);
        self
    }

    /// Builder: set disks section
    pub fn with_disks(mut self, disks: Vec<Disk>) -> Self {
        self.disks = Some(disks);
        self
    }

    /// Builder: set power section
    pub fn with_power(mut self, power: Vec<Battery>) -> Self {
        self.power = Some(power);
        self
    }

    /// Builder: set temperature section
    pub fn with_temperature(mut self, temperature: TemperatureStats) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Whether no section is present
    pub fn is_empty(&self) -> bool {
        self.cpu.is_none()
            && self.disks.is_none()
            && self.files.is_none()
            && self.io.is_none()
            && self.memory.is_none()
            && self.power.is_none()
            && self.system.is_none()
            && self.temperature.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_from_str() {
        assert_eq!("Disks".parse::<StatModule>().unwrap(), StatModule::Disks);
        assert_eq!(" power ".parse::<StatModule>().unwrap(), StatModule::Power);
        assert!(matches!(
            "dropbox".parse::<StatModule>(),
            Err(CollectError::UnknownModule(_))
        ));
    }

    #[test]
    fn test_power_status_from_sysfs() {
        assert_eq!(PowerStatus::from_sysfs("Discharging\n"), PowerStatus::Discharging);
        assert_eq!(PowerStatus::from_sysfs("Not charging"), PowerStatus::NotCharging);
        assert_eq!(PowerStatus::from_sysfs("???"), PowerStatus::Unknown);
    }

    #[test]
    fn test_empty_snapshot() {
        assert!(Snapshot::default().is_empty());
        let snapshot = Snapshot::default().with_memory(MemoryStats::default());
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_snapshot_json_omits_absent_sections() {
        let snapshot = Snapshot::default().with_temperature(TemperatureStats {
            main: None,
            cores: vec![40.0],
        });
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("temperature").is_some());
        assert!(json.get("memory").is_none());
    }

    #[test]
    fn test_disk_type_field_name() {
        let disk: Disk = serde_json::from_str(
            r#"{"filesystem":"/dev/sda1","type":"ext4","used":10,"free":30,"mount":"/"}"#,
        )
        .unwrap();
        assert_eq!(disk.fs_type, "ext4");
    }
}
