use serde::{Deserialize, Serialize};

/// Monitor settings. Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Map extent and landmark filter radius, in units of mean landmark distance.
    pub range_threshold: f64,
    /// Number of most recent poses drawn on the local map.
    pub window_size: usize,
    /// Heading marker length used before any scale is known.
    pub default_marker_size: f64,
    /// Pause after each flush so the viewer can paint.
    pub refresh_pause_ms: u64,
    pub application_id: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            range_threshold: 3.0,
            window_size: 300,
            default_marker_size: 0.1,
            refresh_pause_ms: 1,
            application_id: "vo-monitor".to_string(),
        }
    }
}

impl MonitorConfig {
    pub fn with_range_threshold(mut self, range_threshold: f64) -> Self {
        self.range_threshold = range_threshold;
        self
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn refresh_pause(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.refresh_pause_ms)
    }
}
