#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record types and the warning severity scale.
//!
//! This crate defines the canonical incident shape used across the
//! emergency-map system. Every feed source normalizes its entities into
//! [`Incident`] records before any rendering happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Warning severity level for an incident, from 0 (minor) to 3 (extreme).
///
/// Ordering follows escalation: `Minor < Moderate < Severe < Extreme`.
/// Layers are stacked by this ordering so the most severe incident always
/// draws on top.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentSeverity {
    /// Level 0: Informational notices, no action expected
    Minor = 0,
    /// Level 1: Stay informed, conditions may change
    Moderate = 1,
    /// Level 2: Conditions are changing, prepare to act
    Severe = 2,
    /// Level 3: Immediate threat to life or property
    Extreme = 3,
}

impl IncidentSeverity {
    /// Returns the numeric rank of this severity level.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the rank is not in the range 0-3.
    pub const fn from_rank(rank: u8) -> Result<Self, InvalidSeverityError> {
        match rank {
            0 => Ok(Self::Minor),
            1 => Ok(Self::Moderate),
            2 => Ok(Self::Severe),
            3 => Ok(Self::Extreme),
            _ => Err(InvalidSeverityError { rank }),
        }
    }

    /// Returns the public warning label used on badges and popups.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Minor => "Information",
            Self::Moderate => "Advice",
            Self::Severe => "Watch and Act",
            Self::Extreme => "Emergency Warning",
        }
    }

    /// Returns all variants of this enum, lowest severity first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Severe, Self::Extreme]
    }
}

/// Error returned when attempting to create an [`IncidentSeverity`] from an
/// invalid numeric rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid rank that was provided.
    pub rank: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity rank {}: expected 0-3", self.rank)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// A normalized incident as extracted from one feed entity.
///
/// `latitude`/`longitude` locate the incident marker; boundary geometry (if
/// the feed provides any) travels separately so that marker-only incidents
/// stay representable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Feed entity id, unique within one map instance.
    pub id: String,
    /// Short human-readable title.
    pub headline: String,
    /// Marker latitude in degrees.
    pub latitude: f64,
    /// Marker longitude in degrees.
    pub longitude: f64,
    /// Current warning severity.
    pub severity: IncidentSeverity,
    /// Longer advisory text shown in the popup, empty when absent.
    pub advisory: String,
    /// Feed event category (`fire`, `flood`, ...), `unknown` when absent.
    pub category: String,
    /// Link to the authority's detail page, if published.
    pub external_link: Option<String>,
    /// Timestamp of the feed's last change to this incident.
    pub last_updated: DateTime<Utc>,
}

/// Visual cue kinds a layer can be asked to play.
///
/// Serialized forms double as style-class suffixes, so they stay kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum AnimationCue {
    /// Incident appeared for the first time.
    New,
    /// A tracked attribute of an existing incident changed.
    Updated,
    /// Pulse replayed every pass while an extreme incident persists.
    PersistentExtreme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_rank_roundtrip() {
        for r in 0..=3u8 {
            let severity = IncidentSeverity::from_rank(r).unwrap();
            assert_eq!(severity.rank(), r);
        }
        assert!(IncidentSeverity::from_rank(4).is_err());
    }

    #[test]
    fn severity_ordering_escalates() {
        let all = IncidentSeverity::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should rank below {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn severity_parses_lowercase() {
        assert_eq!(
            "extreme".parse::<IncidentSeverity>().unwrap(),
            IncidentSeverity::Extreme
        );
        assert_eq!(IncidentSeverity::Severe.to_string(), "severe");
        assert!("catastrophic".parse::<IncidentSeverity>().is_err());
    }

    #[test]
    fn severity_labels() {
        assert_eq!(IncidentSeverity::Minor.label(), "Information");
        assert_eq!(IncidentSeverity::Moderate.label(), "Advice");
        assert_eq!(IncidentSeverity::Severe.label(), "Watch and Act");
        assert_eq!(IncidentSeverity::Extreme.label(), "Emergency Warning");
    }

    #[test]
    fn animation_cue_class_names() {
        assert_eq!(AnimationCue::New.as_ref(), "new");
        assert_eq!(AnimationCue::Updated.as_ref(), "updated");
        assert_eq!(AnimationCue::PersistentExtreme.as_ref(), "persistent-extreme");
    }
}
