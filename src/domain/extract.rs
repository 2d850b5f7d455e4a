//! Per-metric extraction rules
//!
//! Pure functions from snapshot sections to the scalar a tester consumes.
//! `None` means "skip this metric for this poll".

use super::snapshot::{Battery, Disk, MemoryStats, PowerStatus, TemperatureStats};

/// Filesystem name reported for pseudo filesystems that are never tested
pub const PSEUDO_FILESYSTEM: &str = "none";

/// Identity a disk is tracked under
pub fn disk_identity(disk: &Disk) -> String {
    disk.filesystem.clone()
}

/// Used ratio `used / (used + free)` of a disk
pub fn disk_usage(disk: &Disk) -> Option<f64> {
    if disk.filesystem == PSEUDO_FILESYSTEM {
        return None;
    }
    let used = disk.used as f64;
    finite(used / (used + disk.free as f64))
}

/// Used ratio `used / total` of memory
pub fn memory_usage(memory: &MemoryStats) -> Option<f64> {
    finite(memory.used as f64 / memory.total as f64)
}

/// Status of the first power supply
pub fn power_status(power: &[Battery]) -> Option<PowerStatus> {
    power.first().map(|battery| battery.status)
}

/// Arithmetic mean of all core readings
pub fn mean_temperature(temperature: &TemperatureStats) -> Option<f64> {
    let sum: f64 = temperature.cores.iter().sum();
    finite(sum / temperature.cores.len() as f64)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(filesystem: &str, used: u64, free: u64) -> Disk {
        Disk {
            filesystem: filesystem.to_string(),
            fs_type: "ext4".to_string(),
            used,
            free,
            mount: "/".to_string(),
        }
    }

    #[test]
    fn test_disk_usage_ratio() {
        assert_eq!(disk_usage(&disk("/dev/sda1", 25, 75)), Some(0.25));
    }

    #[test]
    fn test_disk_usage_skips_pseudo_filesystem() {
        assert_eq!(disk_usage(&disk("none", 25, 75)), None);
    }

    #[test]
    fn test_disk_usage_empty_disk() {
        assert_eq!(disk_usage(&disk("/dev/loop0", 0, 0)), None);
    }

    #[test]
    fn test_memory_usage() {
        let memory = MemoryStats {
            used: 3,
            total: 4,
            ..Default::default()
        };
        assert_eq!(memory_usage(&memory), Some(0.75));
        assert_eq!(memory_usage(&MemoryStats::default()), None);
    }

    #[test]
    fn test_power_status_uses_first_entry() {
        let power = vec![
            Battery::new("BAT0", PowerStatus::Discharging),
            Battery::new("BAT1", PowerStatus::Charging),
        ];
        assert_eq!(power_status(&power), Some(PowerStatus::Discharging));
        assert_eq!(power_status(&[]), None);
    }

    #[test]
    fn test_mean_temperature() {
        let temperature = TemperatureStats {
            main: Some(99.0),
            cores: vec![40.0, 50.0, 60.0],
        };
        assert_eq!(mean_temperature(&temperature), Some(50.0));
    }

    #[test]
    fn test_mean_temperature_without_cores() {
        assert_eq!(mean_temperature(&TemperatureStats::default()), None);
    }
}
