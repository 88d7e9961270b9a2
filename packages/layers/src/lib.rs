#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident layer lifecycle over a pluggable map surface.
//!
//! [`IncidentLayerManager`] reconciles feed snapshots into per-incident
//! map layers. Each pass it classifies every incident as new, updated, or
//! unchanged, creates and removes layers to match the feed, stacks them
//! so severe incidents draw on top, and signals attention animations.
//! Between passes the embedder forwards display-frame timestamps so
//! boundary changes morph smoothly instead of snapping.
//!
//! The map frontend plugs in through the [`MapSurface`] and [`MapLayer`]
//! traits; the engine itself never talks to a renderer and owns no clock.

pub mod config;
pub mod extent;
pub mod manager;
pub mod style;
pub mod surface;
pub mod tracker;
pub mod transition;

pub use config::LayerConfig;
pub use extent::{CacheStats, ExtentCache};
pub use manager::IncidentLayerManager;
pub use style::{AlertColorPreset, LayerStyle};
pub use surface::{FeatureProperties, IncidentFeature, MapLayer, MapSurface, SurfaceError};
pub use tracker::{IncidentStateTracker, UpdateKind};
pub use transition::{TransitionFrame, TransitionScheduler};

/// Feed entity identifier, unique within one map instance.
pub type EntityId = String;
