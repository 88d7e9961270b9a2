//! Reconciles incident feed snapshots against drawn map layers.
//!
//! [`IncidentLayerManager`] owns every layer it creates on its
//! [`MapSurface`]. Each update pass extracts incidents from raw entity
//! states, classifies them against the previous pass, creates or
//! refreshes layers, morphs changed boundaries, restacks by severity,
//! and tears down whatever left the feed.

use std::collections::{BTreeMap, BTreeSet};

use emergency_map_extract::{EntityState, extract_geometry, extract_incident};
use emergency_map_geometry::{Geometry, union_rect};
use emergency_map_incident_models::{AnimationCue, Incident, IncidentSeverity};
use geo::Rect;

use crate::EntityId;
use crate::config::LayerConfig;
use crate::extent::{CacheStats, ExtentCache};
use crate::style;
use crate::surface::{IncidentFeature, MapLayer, MapSurface};
use crate::tracker::{IncidentStateTracker, UpdateKind};
use crate::transition::TransitionScheduler;

struct LayerState<L> {
    layer: L,
    /// Last geometry applied outside a morph. Lags the drawn layer
    /// while a transition is in flight.
    settled: Geometry,
    settled_hash: md5::Digest,
}

/// Drives incident layers on a [`MapSurface`].
pub struct IncidentLayerManager<S: MapSurface> {
    surface: S,
    config: LayerConfig,
    layers: BTreeMap<EntityId, LayerState<S::Layer>>,
    incidents: BTreeMap<EntityId, Incident>,
    tracker: IncidentStateTracker,
    transitions: TransitionScheduler,
    extents: ExtentCache,
}

impl<S: MapSurface> IncidentLayerManager<S> {
    #[must_use]
    pub fn new(surface: S, config: LayerConfig) -> Self {
        Self {
            surface,
            config,
            layers: BTreeMap::new(),
            incidents: BTreeMap::new(),
            tracker: IncidentStateTracker::new(),
            transitions: TransitionScheduler::new(),
            extents: ExtentCache::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Replaces the configuration. Takes effect on the next update pass.
    pub fn set_config(&mut self, config: LayerConfig) {
        self.config = config;
    }

    /// Reconciles one feed snapshot. Entities that cannot be read as
    /// incidents are treated as absent, so a broken entity tears its
    /// layer down the same way a departed one does.
    pub fn update_incidents(&mut self, entities: &[EntityState]) {
        if !self.config.show_warning_levels {
            self.clear();
            return;
        }

        let extracted: Vec<(Incident, Option<Geometry>)> = entities
            .iter()
            .filter_map(|entity| {
                extract_incident(entity).map(|incident| (incident, extract_geometry(entity)))
            })
            .collect();
        let current_ids: BTreeSet<EntityId> = extracted
            .iter()
            .map(|(incident, _)| incident.id.clone())
            .collect();

        self.remove_departed(&current_ids);

        for (incident, geometry) in extracted {
            let kind = self.tracker.classify(&incident);
            if let Some(geometry) = geometry {
                self.upsert_layer(&incident, geometry, kind);
            } else {
                self.remove_layer(&incident.id);
            }
            self.incidents.insert(incident.id.clone(), incident);
        }

        self.restack_by_severity();
        self.extents.cleanup(&current_ids);
        log::debug!(
            "Tracking {} incidents, {} with drawn boundaries",
            self.incidents.len(),
            self.layers.len(),
        );
    }

    /// Advances in-flight geometry morphs to `now_ms` and redraws their
    /// layers. Call once per display frame while
    /// [`has_active_transitions`](Self::has_active_transitions) holds.
    pub fn advance_transitions(&mut self, now_ms: f64) {
        for frame in self.transitions.advance(now_ms) {
            let Some(incident) = self.incidents.get(&frame.entity_id) else {
                continue;
            };
            let Some(state) = self.layers.get_mut(&frame.entity_id) else {
                continue;
            };
            let style = style::polygon_style(incident.severity, &self.config);
            state
                .layer
                .set_data(&IncidentFeature::new(incident, frame.geometry.clone()));
            state.layer.set_style(&style);
            if frame.completed {
                state.settled_hash = frame.geometry.coordinate_hash();
                state.settled = frame.geometry;
            }
        }
    }

    #[must_use]
    pub fn has_active_transitions(&self) -> bool {
        self.transitions.active_count() > 0
    }

    /// Union of the bounds of every drawn layer.
    #[must_use]
    pub fn polygon_bounds(&self) -> Option<Rect<f64>> {
        self.layers
            .values()
            .filter_map(|state| state.layer.bounds())
            .reduce(union_rect)
    }

    /// `(latitude, longitude)` of every tracked incident, drawn or not.
    #[must_use]
    pub fn incident_positions(&self) -> Vec<(f64, f64)> {
        self.incidents
            .values()
            .map(|incident| (incident.latitude, incident.longitude))
            .collect()
    }

    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn incident_count(&self) -> usize {
        self.incidents.len()
    }

    /// Extent in meters for an entity's geometry, served from the
    /// per-entity cache.
    pub fn extent_meters(&mut self, entity_id: &str, geometry: Option<&Geometry>) -> f64 {
        self.extents.get(entity_id, geometry)
    }

    #[must_use]
    pub const fn extent_stats(&self) -> CacheStats {
        self.extents.stats()
    }

    /// Removes every layer and forgets all tracked state.
    pub fn clear(&mut self) {
        self.transitions.cancel_all();
        for (_, mut state) in std::mem::take(&mut self.layers) {
            state.layer.remove();
        }
        self.incidents.clear();
        self.tracker.clear();
        self.extents.clear();
    }

    /// Tears everything down and hands the surface back.
    #[must_use]
    pub fn destroy(mut self) -> S {
        self.clear();
        self.surface
    }

    fn remove_departed(&mut self, current_ids: &BTreeSet<EntityId>) {
        let departed: BTreeSet<EntityId> = self
            .incidents
            .keys()
            .chain(self.layers.keys())
            .filter(|id| !current_ids.contains(*id))
            .cloned()
            .collect();

        for entity_id in departed {
            log::debug!("Incident {entity_id} left the feed, removing layer");
            self.transitions.cancel(&entity_id);
            if let Some(mut state) = self.layers.remove(&entity_id) {
                state.layer.remove();
            }
            self.incidents.remove(&entity_id);
            self.tracker.forget(&entity_id);
            self.extents.remove(&entity_id);
        }
    }

    fn upsert_layer(&mut self, incident: &Incident, geometry: Geometry, kind: UpdateKind) {
        let style = style::polygon_style(incident.severity, &self.config);
        let hash = geometry.coordinate_hash();

        if let Some(state) = self.layers.get_mut(&incident.id) {
            let geometry_changed = state.settled_hash != hash;
            if geometry_changed && self.config.geometry_transitions && !geometry.is_point() {
                self.transitions.start(
                    incident.id.clone(),
                    state.settled.clone(),
                    geometry,
                    self.config.transition_duration_ms,
                );
                state.layer.set_style(&style);
            } else {
                // Apply in place; an in-flight morph would fight this write.
                self.transitions.cancel(&incident.id);
                state
                    .layer
                    .set_data(&IncidentFeature::new(incident, geometry.clone()));
                state.layer.set_style(&style);
                state.settled = geometry;
                state.settled_hash = hash;
            }
        } else {
            let feature = IncidentFeature::new(incident, geometry.clone());
            match self.surface.add_layer(&feature, &style) {
                Ok(layer) => {
                    self.layers.insert(
                        incident.id.clone(),
                        LayerState {
                            layer,
                            settled: geometry,
                            settled_hash: hash,
                        },
                    );
                }
                Err(err) => {
                    log::warn!("Failed to create layer for {}: {err}", incident.id);
                    return;
                }
            }
        }

        match kind {
            UpdateKind::New => self.signal(&incident.id, incident.severity, AnimationCue::New),
            UpdateKind::Updated => {
                self.signal(&incident.id, incident.severity, AnimationCue::Updated);
            }
            UpdateKind::Unchanged => {}
        }
        if incident.severity == IncidentSeverity::Extreme {
            self.signal(
                &incident.id,
                incident.severity,
                AnimationCue::PersistentExtreme,
            );
        }
    }

    fn remove_layer(&mut self, entity_id: &str) {
        self.transitions.cancel(entity_id);
        if let Some(mut state) = self.layers.remove(entity_id) {
            log::debug!("Incident {entity_id} lost its boundary, removing layer");
            state.layer.remove();
        }
    }

    fn signal(&mut self, entity_id: &str, severity: IncidentSeverity, cue: AnimationCue) {
        if !self.config.animations_enabled {
            return;
        }
        let Some(state) = self.layers.get_mut(entity_id) else {
            return;
        };
        let color = style::severity_color(severity, &self.config);
        state
            .layer
            .apply_animation(cue, &color, self.config.animation_duration_ms);
    }

    /// Raises layers severity by severity so the most severe draw on
    /// top. Ties keep entity id order.
    fn restack_by_severity(&mut self) {
        let mut order: Vec<(EntityId, IncidentSeverity)> = self
            .layers
            .keys()
            .filter_map(|id| {
                self.incidents
                    .get(id)
                    .map(|incident| (id.clone(), incident.severity))
            })
            .collect();
        order.sort_by_key(|(_, severity)| *severity);
        log::debug!("Render order (bottom to top): {order:?}");

        for (entity_id, _) in &order {
            if let Some(state) = self.layers.get_mut(entity_id) {
                state.layer.bring_to_front();
            }
        }
    }
}
