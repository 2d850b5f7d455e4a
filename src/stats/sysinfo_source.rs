//! Host stat source backed by sysinfo
//!
//! Collects cpu, memory, disks, temperature and system sections with
//! `sysinfo`, and power from the kernel's power_supply class.

use super::power::PowerSupplyReader;
use super::traits::StatSource;
use crate::domain::{
    CpuStats, Disk, MemoryStats, Snapshot, StatModule, SystemInfo, TemperatureStats,
};
use crate::error::CollectError;

use sysinfo::{Components, Disks, System};

/// Production stat source
pub struct SysinfoSource {
    system: System,
    power: PowerSupplyReader,
    debug: Vec<String>,
}

impl SysinfoSource {
    /// Create a source reading the local host
    pub fn new() -> Self {
        Self::with_power_reader(PowerSupplyReader::new())
    }

    /// Create a source with a custom power_supply reader
    pub fn with_power_reader(power: PowerSupplyReader) -> Self {
        Self {
            system: System::new(),
            power,
            debug: Vec::new(),
        }
    }

    fn cpu(&mut self) -> CpuStats {
        self.system.refresh_cpu_usage();
        let load = System::load_average();
        CpuStats {
            usage: f64::from(self.system.global_cpu_usage()),
            load: [load.one, load.five, load.fifteen],
        }
    }

    fn memory(&mut self) -> MemoryStats {
        self.system.refresh_memory();
        let free = self.system.free_memory();
        MemoryStats {
            cache: self.system.available_memory().saturating_sub(free),
            free,
            used: self.system.used_memory(),
            total: self.system.total_memory(),
            buffers: 0,
        }
    }

    fn disks(&mut self) -> Vec<Disk> {
        Disks::new_with_refreshed_list()
            .list()
            .iter()
            .map(|disk| {
                let name = disk.name().to_string_lossy();
                let free = disk.available_space();
                Disk {
                    filesystem: if name.is_empty() {
                        "none".to_string()
                    } else {
                        name.into_owned()
                    },
                    fs_type: disk.file_system().to_string_lossy().into_owned(),
                    used: disk.total_space().saturating_sub(free),
                    free,
                    mount: disk.mount_point().display().to_string(),
                }
            })
            .collect()
    }

    fn temperature(&mut self) -> Option<TemperatureStats> {
        let components = Components::new_with_refreshed_list();
        let readings: Vec<(String, f64)> = components
            .list()
            .iter()
            .filter_map(|c| {
                let celsius: Option<f32> = c.temperature().into();
                celsius
                    .filter(|t| t.is_finite())
                    .map(|t| (c.label().to_string(), f64::from(t)))
            })
            .collect();

        if readings.is_empty() {
            self.debug
                .push("temperature: no readable sensors found".to_string());
            return None;
        }

        let is_core = |label: &str| label.to_ascii_lowercase().contains("core");
        let is_main = |label: &str| {
            let label = label.to_ascii_lowercase();
            label.contains("package") || label.contains("tctl") || label.contains("cpu")
        };

        let main = readings
            .iter()
            .find(|(label, _)| is_main(label))
            .map(|(_, t)| *t);
        let mut cores: Vec<f64> = readings
            .iter()
            .filter(|(label, _)| is_core(label))
            .map(|(_, t)| *t)
            .collect();
        if cores.is_empty() {
            cores = readings.iter().map(|(_, t)| *t).collect();
        }

        Some(TemperatureStats { main, cores })
    }

    fn system_info(&self) -> SystemInfo {
        SystemInfo {
            arch: std::env::consts::ARCH.to_string(),
            hostname: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            uptime: System::uptime(),
            platform: std::env::consts::OS.to_string(),
        }
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StatSource for SysinfoSource {
    fn poll(&mut self, modules: &[StatModule]) -> Result<Snapshot, CollectError> {
        if modules.is_empty() {
            return Err(CollectError::NoModules);
        }

        let mut snapshot = Snapshot::default();
        for module in modules {
            match module {
                StatModule::Cpu => snapshot.cpu = Some(self.cpu()),
                StatModule::Memory => snapshot.memory = Some(self.memory()),
                StatModule::Disks => snapshot.disks = Some(self.disks()),
                StatModule::Temperature => snapshot.temperature = self.temperature(),
                StatModule::System => snapshot.system = Some(self.system_info()),
                StatModule::Power => {
                    if !self.power.is_available() {
                        self.debug
                            .push("power: no power_supply class on this host".to_string());
                    } else {
                        match self.power.read() {
                            Ok(batteries) => snapshot.power = Some(batteries),
                            Err(e) => self.debug.push(format!("power: {}", e)),
                        }
                    }
                }
                StatModule::Io | StatModule::Files => self
                    .debug
                    .push(format!("{}: not supported by the sysinfo source", module)),
            }
        }

        Ok(snapshot)
    }

    fn take_debug_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.debug)
    }
}
