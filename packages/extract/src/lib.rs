#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Normalization of feed entities into incident records.
//!
//! Feed payloads arrive as loosely-typed attribute maps. This crate turns
//! them into [`Incident`] records and boundary [`Geometry`] values,
//! rejecting entities that cannot be placed on the map.

use chrono::{DateTime, Utc};
use emergency_map_geometry::Geometry;
use emergency_map_incident_models::{Incident, IncidentSeverity};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Snapshot of one feed entity as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Stable entity id within the feed.
    pub entity_id: String,
    /// Raw attribute map; shape varies by provider.
    pub attributes: serde_json::Map<String, Value>,
    /// When the feed last changed this entity.
    pub last_updated: DateTime<Utc>,
}

/// Extracts a normalized [`Incident`] from a feed entity.
///
/// Numeric latitude and longitude are required. Everything else falls
/// back to a usable default so a sparse feed still renders: unknown or
/// missing alert levels read as minor, and the entity id stands in for a
/// missing headline.
#[must_use]
pub fn extract_incident(entity: &EntityState) -> Option<Incident> {
    let (Some(latitude), Some(longitude)) = (
        number_attr(entity, "latitude"),
        number_attr(entity, "longitude"),
    ) else {
        log::debug!("Skipping {}: no usable coordinates", entity.entity_id);
        return None;
    };

    let severity = string_attr(entity, "alert_level")
        .map(str::to_lowercase)
        .and_then(|level| level.parse::<IncidentSeverity>().ok())
        .unwrap_or(IncidentSeverity::Minor);

    let headline = non_empty_attr(entity, "friendly_name")
        .unwrap_or(entity.entity_id.as_str())
        .to_string();

    let advisory = string_attr(entity, "alert_text").unwrap_or_default().to_string();

    let category = non_empty_attr(entity, "event_type").unwrap_or("unknown").to_string();

    let external_link = ["external_link", "link", "url"]
        .into_iter()
        .find_map(|key| non_empty_attr(entity, key))
        .map(ToString::to_string);

    Some(Incident {
        id: entity.entity_id.clone(),
        headline,
        latitude,
        longitude,
        severity,
        advisory,
        category,
        external_link,
        last_updated: entity.last_updated,
    })
}

/// Extracts boundary geometry from a feed entity.
///
/// Tries the `geojson` attribute first, then `geometry`. `None` means the
/// incident is marker-only, which is normal for many feeds.
#[must_use]
pub fn extract_geometry(entity: &EntityState) -> Option<Geometry> {
    for key in ["geojson", "geometry"] {
        let Some(value) = entity.attributes.get(key) else {
            continue;
        };
        if let Some(geometry) = Geometry::from_geojson_value(value) {
            return Some(geometry);
        }
        log::debug!("Unparseable {key} attribute on {}", entity.entity_id);
    }
    None
}

fn number_attr(entity: &EntityState, key: &str) -> Option<f64> {
    entity.attributes.get(key)?.as_f64().filter(|n| n.is_finite())
}

fn string_attr<'a>(entity: &'a EntityState, key: &str) -> Option<&'a str> {
    entity.attributes.get(key)?.as_str()
}

fn non_empty_attr<'a>(entity: &'a EntityState, key: &str) -> Option<&'a str> {
    string_attr(entity, key).filter(|s| !s.is_empty())
}
