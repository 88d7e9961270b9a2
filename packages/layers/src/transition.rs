//! Scheduling for smooth geometry morphs.
//!
//! The scheduler owns no clock. The embedder calls
//! [`TransitionScheduler::advance`] once per display frame with its own
//! monotonic timestamp, and applies the frames that come back. A
//! transition's start time is captured lazily on its first tick, so a
//! morph scheduled between frames still plays its full duration.
//!
//! Each entity has at most one transition in flight. Starting a new one
//! for the same entity replaces (and thereby cancels) the old one.

use std::collections::BTreeMap;

use emergency_map_geometry::Geometry;
use emergency_map_geometry::interpolate::interpolate;

use crate::EntityId;

#[derive(Debug)]
struct Transition {
    from: Geometry,
    to: Geometry,
    duration_ms: f64,
    started_at: Option<f64>,
}

/// One tick's output for one morphing entity.
#[derive(Debug, Clone)]
pub struct TransitionFrame {
    /// Entity whose layer should be redrawn.
    pub entity_id: EntityId,
    /// Geometry to draw this frame.
    pub geometry: Geometry,
    /// Whether the morph finished on this tick.
    pub completed: bool,
}

/// Tracks in-flight geometry morphs and produces per-frame geometries.
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    active: BTreeMap<EntityId, Transition>,
}

impl TransitionScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a morph for `entity_id` from `from` to `to`. Any morph
    /// already running for the entity is cancelled and replaced.
    pub fn start(&mut self, entity_id: EntityId, from: Geometry, to: Geometry, duration_ms: f64) {
        self.active.insert(
            entity_id,
            Transition {
                from,
                to,
                duration_ms,
                started_at: None,
            },
        );
    }

    /// Cancels the morph for `entity_id`, if one is running.
    pub fn cancel(&mut self, entity_id: &str) {
        self.active.remove(entity_id);
    }

    /// Cancels every in-flight morph.
    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    #[must_use]
    pub fn is_active(&self, entity_id: &str) -> bool {
        self.active.contains_key(entity_id)
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Advances every in-flight morph to `now_ms` and returns one frame
    /// per entity, in entity id order. Completed morphs emit their exact
    /// target geometry and leave the scheduler.
    pub fn advance(&mut self, now_ms: f64) -> Vec<TransitionFrame> {
        let mut frames = Vec::with_capacity(self.active.len());
        let mut still_active = BTreeMap::new();

        for (entity_id, mut transition) in std::mem::take(&mut self.active) {
            let started_at = *transition.started_at.get_or_insert(now_ms);
            let progress = if transition.duration_ms > 0.0 {
                ((now_ms - started_at) / transition.duration_ms).min(1.0)
            } else {
                1.0
            };
            let completed = progress >= 1.0;
            let geometry = if completed {
                transition.to.clone()
            } else {
                interpolate(&transition.from, &transition.to, ease_out_cubic(progress))
            };

            frames.push(TransitionFrame {
                entity_id: entity_id.clone(),
                geometry,
                completed,
            });
            if !completed {
                still_active.insert(entity_id, transition);
            }
        }

        self.active = still_active;
        frames
    }
}

/// Fast at first, settling gently into the target.
fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}
