//! Rendering configuration supplied by the embedding card or dashboard.

use std::collections::BTreeMap;

use emergency_map_incident_models::IncidentSeverity;
use serde::{Deserialize, Serialize};

use crate::style::AlertColorPreset;

/// Default length of attention animations in milliseconds.
pub const DEFAULT_ANIMATION_DURATION_MS: f64 = 2000.0;

/// Default length of a geometry morph in milliseconds.
pub const DEFAULT_TRANSITION_DURATION_MS: f64 = 500.0;

/// Per-instance rendering options.
///
/// Every field has a default, so an empty config block renders with the
/// stock behavior. Unknown severities or palettes simply fail to parse
/// at the host boundary; nothing here validates beyond serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Master switch for incident layers. When off, every pass tears all
    /// layers down and renders nothing.
    pub show_warning_levels: bool,
    /// Whether attention animations (new/updated/extreme pulses) play.
    pub animations_enabled: bool,
    /// Length of one attention animation cycle in milliseconds.
    pub animation_duration_ms: f64,
    /// Whether boundary changes morph instead of snapping.
    pub geometry_transitions: bool,
    /// Length of a boundary morph in milliseconds.
    pub transition_duration_ms: f64,
    /// Severity color palette.
    pub color_preset: AlertColorPreset,
    /// Per-severity color overrides, applied on top of the preset.
    pub severity_colors: BTreeMap<IncidentSeverity, String>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            show_warning_levels: true,
            animations_enabled: true,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            geometry_transitions: true,
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            color_preset: AlertColorPreset::default(),
            severity_colors: BTreeMap::new(),
        }
    }
}
