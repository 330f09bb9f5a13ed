use serde::{Deserialize, Serialize};

fn default_hide_delay_ms() -> u64 {
    150
}

fn default_tooltip_offset_px() -> f64 {
    4.0
}

fn default_context_radius() -> usize {
    100
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ScannerConfig {
    /// Grace period before a tooltip hides after the pointer leaves
    #[serde(default = "default_hide_delay_ms")]
    pub tooltip_hide_delay_ms: u64,
    /// Gap between a marker's bottom edge and its tooltip
    #[serde(default = "default_tooltip_offset_px")]
    pub tooltip_offset_px: f64,
    /// Characters kept on each side of a selection when no sentence boundary is found
    #[serde(default = "default_context_radius")]
    pub context_radius: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            tooltip_hide_delay_ms: default_hide_delay_ms(),
            tooltip_offset_px: default_tooltip_offset_px(),
            context_radius: default_context_radius(),
        }
    }
}
