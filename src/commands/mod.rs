// Super Panel - Commands Module
// Tauri commands organized by domain: config registries, action dispatch,
// metrics polling, window chrome.

pub mod actions;
pub mod config;
pub mod metrics;
pub mod window;

// Re-export all commands for easy registration
pub use actions::*;
pub use config::*;
pub use metrics::*;
pub use window::*;

use std::sync::{Mutex, PoisonError};

use crate::metrics::MetricsSource;
use crate::registry::Panel;

/// Panel state managed by Tauri. The single mutex is the write lock the
/// registries rely on: boundary calls are discrete request/response
/// exchanges, so one in-flight mutation at a time.
pub struct PanelState(pub Mutex<Panel>);

impl PanelState {
    pub fn lock(&self) -> std::sync::MutexGuard<'_, Panel> {
        // The guarded value is a plain JSON document plus paths; a panic
        // mid-operation leaves nothing half-applied worth rejecting over.
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Long-lived metrics sampler so successive polls yield deltas.
pub struct MetricsState(pub Mutex<MetricsSource>);

impl MetricsState {
    pub fn lock(&self) -> std::sync::MutexGuard<'_, MetricsSource> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
