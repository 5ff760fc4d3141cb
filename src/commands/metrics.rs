// Super Panel - Metrics Commands
// Polled by the dashboard on its configured refresh interval. These never
// reject; a sampler problem would surface as zeroed payloads.

use tauri::State;

use crate::metrics::{CpuMetrics, DiskMetrics, MemoryMetrics, NetworkMetrics, TemperatureMetrics};

use super::MetricsState;

#[tauri::command]
pub fn metrics_cpu(state: State<'_, MetricsState>) -> CpuMetrics {
    state.lock().cpu()
}

#[tauri::command]
pub fn metrics_memory(state: State<'_, MetricsState>) -> MemoryMetrics {
    state.lock().memory()
}

#[tauri::command]
pub fn metrics_network(state: State<'_, MetricsState>) -> NetworkMetrics {
    state.lock().network()
}

#[tauri::command]
pub fn metrics_disk(state: State<'_, MetricsState>) -> Vec<DiskMetrics> {
    state.lock().disks()
}

#[tauri::command]
pub fn metrics_temperature(state: State<'_, MetricsState>) -> TemperatureMetrics {
    state.lock().temperature()
}
