//! The seam between the layer manager and whatever actually draws.
//!
//! The manager never talks to a concrete map widget. It hands
//! [`IncidentFeature`] values and [`LayerStyle`] values to a
//! [`MapSurface`], and drives the [`MapLayer`] handles the surface
//! returns. Embedders implement both traits over their rendering
//! backend; tests implement them over plain vectors.

use emergency_map_geometry::Geometry;
use emergency_map_incident_models::{AnimationCue, Incident, IncidentSeverity};
use geo::Rect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::LayerStyle;

/// A GeoJSON `Feature` carrying one incident's geometry and the
/// properties a renderer needs for popups and tooltips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct IncidentFeature {
    /// The boundary to draw.
    pub geometry: Geometry,
    /// Display properties for the feature.
    pub properties: FeatureProperties,
}

/// Properties attached to an [`IncidentFeature`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Stable incident identifier.
    pub id: String,
    /// Short display name.
    pub headline: String,
    /// Severity at the time the feature was built.
    pub severity: IncidentSeverity,
    /// Incident category, for example `bushfire`.
    pub category: String,
    /// Advisory text for popups.
    pub advisory: String,
}

impl IncidentFeature {
    /// Builds a feature from an incident and the geometry to draw for it.
    #[must_use]
    pub fn new(incident: &Incident, geometry: Geometry) -> Self {
        Self {
            geometry,
            properties: FeatureProperties {
                id: incident.id.clone(),
                headline: incident.headline.clone(),
                severity: incident.severity,
                category: incident.category.clone(),
                advisory: incident.advisory.clone(),
            },
        }
    }
}

/// Failures reported by a [`MapSurface`].
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface rejected the feature it was asked to draw.
    #[error("invalid feature: {message}")]
    InvalidFeature {
        /// Backend description of the rejection.
        message: String,
    },
    /// The surface is not ready to accept layers.
    #[error("surface unavailable: {message}")]
    Unavailable {
        /// Backend description of the outage.
        message: String,
    },
}

/// A single drawn incident boundary, owned by the manager.
pub trait MapLayer {
    /// Replaces the layer's feature data in place.
    fn set_data(&mut self, feature: &IncidentFeature);

    /// Applies stroke and fill styling.
    fn set_style(&mut self, style: &LayerStyle);

    /// Plays an animation cue on the layer. `glow_color` is the resolved
    /// severity color and `duration_ms` the configured cue length.
    fn apply_animation(&mut self, cue: AnimationCue, glow_color: &str, duration_ms: f64);

    /// Raises the layer above its siblings in draw order.
    fn bring_to_front(&mut self);

    /// Geographic bounds of the drawn feature, if it has any.
    fn bounds(&self) -> Option<Rect<f64>>;

    /// Detaches the layer from the surface.
    fn remove(&mut self);
}

/// A rendering backend that can materialize incident layers.
pub trait MapSurface {
    /// Handle type for layers created on this surface.
    type Layer: MapLayer;

    /// Creates a layer for `feature` styled with `style`.
    ///
    /// # Errors
    ///
    /// Returns a [`SurfaceError`] if the backend cannot draw the feature.
    fn add_layer(
        &mut self,
        feature: &IncidentFeature,
        style: &LayerStyle,
    ) -> Result<Self::Layer, SurfaceError>;
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    #[test]
    fn feature_serializes_to_geojson_shape() {
        let incident = Incident {
            id: "incident.alpha".to_string(),
            headline: "Grass fire".to_string(),
            latitude: -33.8,
            longitude: 151.2,
            severity: IncidentSeverity::Severe,
            advisory: "Leave now".to_string(),
            category: "bushfire".to_string(),
            external_link: None,
            last_updated: DateTime::<Utc>::from_timestamp(0, 0).unwrap(),
        };
        let feature = IncidentFeature::new(&incident, Geometry::Point([151.2, -33.8]));

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["geometry"]["coordinates"][0], 151.2);
        assert_eq!(value["properties"]["id"], "incident.alpha");
        assert_eq!(value["properties"]["severity"], "severe");
    }
}
