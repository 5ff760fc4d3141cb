// System metrics source
//
// Polled snapshots for the dashboard widgets, backed by sysinfo. The
// frontend polls on its configured interval; `System` and `Networks` stay
// alive between polls so CPU usage and network rates are deltas rather
// than since-boot totals. Failures degrade to zeroed payloads, never to a
// rejected poll.

use std::time::Instant;

use serde::Serialize;
use sysinfo::{Components, Disks, Networks, System};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreLoad {
    pub load: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuMetrics {
    pub usage: f32,
    pub cores: Vec<CoreLoad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMetrics {
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub usage_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceInfo {
    pub name: String,
    pub mac: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub interface: String,
    /// Bytes per second received on the busiest interface.
    pub rx: f64,
    /// Bytes per second transmitted on the busiest interface.
    pub tx: f64,
    pub interfaces: Vec<InterfaceInfo>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskMetrics {
    pub fs: String,
    pub r#type: String,
    pub size: u64,
    pub used: u64,
    pub available: u64,
    pub usage_percent: f64,
    pub mount: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<f32>,
    pub cores: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
}

pub struct MetricsSource {
    sys: System,
    networks: Networks,
    last_network_poll: Instant,
}

impl MetricsSource {
    pub fn new() -> Self {
        Self {
            sys: System::new(),
            networks: Networks::new_with_refreshed_list(),
            last_network_poll: Instant::now(),
        }
    }

    pub fn cpu(&mut self) -> CpuMetrics {
        self.sys.refresh_cpu_usage();
        let cores = self
            .sys
            .cpus()
            .iter()
            .map(|cpu| CoreLoad {
                load: cpu.cpu_usage(),
            })
            .collect();
        CpuMetrics {
            usage: self.sys.global_cpu_usage(),
            cores,
            temperature: cpu_package_temperature(),
        }
    }

    pub fn memory(&mut self) -> MemoryMetrics {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let usage_percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        MemoryMetrics {
            total,
            used,
            free: self.sys.free_memory(),
            usage_percent,
        }
    }

    pub fn network(&mut self) -> NetworkMetrics {
        self.networks.refresh(true);
        let now = Instant::now();
        let dt = now
            .duration_since(self.last_network_poll)
            .as_secs_f64()
            .max(0.001);
        self.last_network_poll = now;

        // The busiest interface since the last poll stands in for "the"
        // connection on the dashboard summary card.
        let mut interface = String::from("N/A");
        let mut rx = 0.0;
        let mut tx = 0.0;
        for (name, data) in self.networks.iter() {
            let iface_rx = data.received() as f64 / dt;
            let iface_tx = data.transmitted() as f64 / dt;
            if iface_rx + iface_tx >= rx + tx {
                interface = name.clone();
                rx = iface_rx;
                tx = iface_tx;
            }
        }

        let interfaces = self
            .networks
            .iter()
            .map(|(name, data)| InterfaceInfo {
                name: name.clone(),
                mac: data.mac_address().to_string(),
            })
            .collect();

        NetworkMetrics {
            interface,
            rx,
            tx,
            interfaces,
        }
    }

    pub fn disks(&self) -> Vec<DiskMetrics> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .map(|disk| {
                let size = disk.total_space();
                let available = disk.available_space();
                let used = size.saturating_sub(available);
                DiskMetrics {
                    fs: disk.name().to_string_lossy().into_owned(),
                    r#type: disk.file_system().to_string_lossy().into_owned(),
                    size,
                    used,
                    available,
                    usage_percent: if size > 0 {
                        used as f64 / size as f64 * 100.0
                    } else {
                        0.0
                    },
                    mount: disk.mount_point().to_string_lossy().into_owned(),
                }
            })
            .collect()
    }

    pub fn temperature(&self) -> TemperatureMetrics {
        let components = Components::new_with_refreshed_list();
        let readings: Vec<f32> = components
            .list()
            .iter()
            .filter_map(|component| component.temperature())
            .filter(|t| t.is_finite() && *t > 0.0)
            .collect();

        TemperatureMetrics {
            main: cpu_package_temperature().or_else(|| readings.first().copied()),
            max: readings
                .iter()
                .copied()
                .fold(None, |acc: Option<f32>, t| Some(acc.map_or(t, |a| a.max(t)))),
            cores: readings,
        }
    }
}

impl Default for MetricsSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Best guess at the CPU package sensor. Sensor naming is wildly
/// platform-dependent; missing readings are simply `None`.
fn cpu_package_temperature() -> Option<f32> {
    let components = Components::new_with_refreshed_list();
    components
        .list()
        .iter()
        .find(|component| {
            let label = component.label().to_ascii_lowercase();
            label.contains("cpu")
                || label.contains("coretemp")
                || label.contains("k10temp")
                || label.contains("package")
        })
        .and_then(|component| component.temperature())
        .filter(|t| t.is_finite() && *t > 0.0)
}
