//! Severity-driven styling for incident layers.

use emergency_map_incident_models::IncidentSeverity;
use serde::{Deserialize, Serialize};

use crate::config::LayerConfig;

/// Default polygon stroke weight in pixels.
pub const DEFAULT_STROKE_WEIGHT: f64 = 2.0;

/// Default polygon stroke opacity.
pub const DEFAULT_STROKE_OPACITY: f64 = 0.8;

/// Default polygon fill opacity.
pub const DEFAULT_FILL_OPACITY: f64 = 0.35;

/// Stroke and fill styling for one rendered layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    /// Stroke color as a hex string.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Stroke opacity in `[0, 1]`.
    pub opacity: f64,
    /// Fill color as a hex string.
    pub fill_color: String,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
}

/// Named severity color palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertColorPreset {
    /// Australian Warning System palette, the default.
    #[default]
    Australian,
    /// US National Weather Service palette.
    UsNws,
    /// European meteorological palette.
    EuMeteo,
    /// Darkened palette for high-contrast themes.
    HighContrast,
}

impl AlertColorPreset {
    /// Hex color for `severity` under this palette.
    #[must_use]
    pub const fn color(self, severity: IncidentSeverity) -> &'static str {
        match self {
            Self::Australian => match severity {
                IncidentSeverity::Extreme => "#cc0000",
                IncidentSeverity::Severe => "#ff6600",
                IncidentSeverity::Moderate => "#ffcc00",
                IncidentSeverity::Minor => "#3366cc",
            },
            Self::UsNws => match severity {
                IncidentSeverity::Extreme => "#cc0000",
                IncidentSeverity::Severe => "#ff6600",
                IncidentSeverity::Moderate => "#ffcc00",
                IncidentSeverity::Minor => "#00bfff",
            },
            Self::EuMeteo => match severity {
                IncidentSeverity::Extreme => "#cc0000",
                IncidentSeverity::Severe => "#ff6600",
                IncidentSeverity::Moderate => "#ffcc00",
                IncidentSeverity::Minor => "#33cc33",
            },
            Self::HighContrast => match severity {
                IncidentSeverity::Extreme => "#990000",
                IncidentSeverity::Severe => "#cc5500",
                IncidentSeverity::Moderate => "#ccaa00",
                IncidentSeverity::Minor => "#003399",
            },
        }
    }
}

/// Resolves the color for a severity: per-severity overrides win, then
/// the configured preset palette.
#[must_use]
pub fn severity_color(severity: IncidentSeverity, config: &LayerConfig) -> String {
    config
        .severity_colors
        .get(&severity)
        .cloned()
        .unwrap_or_else(|| config.color_preset.color(severity).to_string())
}

/// Builds the layer style for an incident severity.
#[must_use]
pub fn polygon_style(severity: IncidentSeverity, config: &LayerConfig) -> LayerStyle {
    let color = severity_color(severity, config);
    LayerStyle {
        fill_color: color.clone(),
        color,
        weight: DEFAULT_STROKE_WEIGHT,
        opacity: DEFAULT_STROKE_OPACITY,
        fill_opacity: DEFAULT_FILL_OPACITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn australian_palette_is_default() {
        let config = LayerConfig::default();
        assert_eq!(severity_color(IncidentSeverity::Extreme, &config), "#cc0000");
        assert_eq!(severity_color(IncidentSeverity::Severe, &config), "#ff6600");
        assert_eq!(severity_color(IncidentSeverity::Moderate, &config), "#ffcc00");
        assert_eq!(severity_color(IncidentSeverity::Minor, &config), "#3366cc");
    }

    #[test]
    fn presets_differ_where_expected() {
        assert_eq!(AlertColorPreset::UsNws.color(IncidentSeverity::Minor), "#00bfff");
        assert_eq!(AlertColorPreset::EuMeteo.color(IncidentSeverity::Minor), "#33cc33");
        assert_eq!(
            AlertColorPreset::HighContrast.color(IncidentSeverity::Extreme),
            "#990000"
        );
        // The top three severities share colors across the standard palettes.
        assert_eq!(
            AlertColorPreset::UsNws.color(IncidentSeverity::Extreme),
            AlertColorPreset::Australian.color(IncidentSeverity::Extreme)
        );
    }

    #[test]
    fn overrides_beat_preset() {
        let mut config = LayerConfig {
            color_preset: AlertColorPreset::UsNws,
            ..LayerConfig::default()
        };
        config
            .severity_colors
            .insert(IncidentSeverity::Minor, "#123456".to_string());

        assert_eq!(severity_color(IncidentSeverity::Minor, &config), "#123456");
        // Severities without an override still come from the preset.
        assert_eq!(severity_color(IncidentSeverity::Severe, &config), "#ff6600");
    }

    #[test]
    fn polygon_style_uses_one_color_for_stroke_and_fill() {
        let style = polygon_style(IncidentSeverity::Severe, &LayerConfig::default());
        assert_eq!(style.color, "#ff6600");
        assert_eq!(style.fill_color, "#ff6600");
        assert!((style.weight - 2.0).abs() < f64::EPSILON);
        assert!((style.opacity - 0.8).abs() < f64::EPSILON);
        assert!((style.fill_opacity - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn preset_parses_from_snake_case() {
        let preset: AlertColorPreset = serde_json::from_str("\"high_contrast\"").unwrap();
        assert_eq!(preset, AlertColorPreset::HighContrast);
    }
}
