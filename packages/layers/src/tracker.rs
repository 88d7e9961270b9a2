//! Change classification for incidents across refresh passes.

use std::collections::BTreeMap;

use emergency_map_incident_models::Incident;

/// How an incident compares to the last pass that saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// First time this incident id has been seen.
    New,
    /// Seen before and its display attributes changed.
    Updated,
    /// Seen before with identical display attributes.
    Unchanged,
}

/// Remembers a digest of each incident's display attributes so the next
/// pass can tell new arrivals from edits from no-ops.
#[derive(Debug, Default)]
pub struct IncidentStateTracker {
    digests: BTreeMap<String, md5::Digest>,
}

/// Digest of the attributes that should pulse an update cue when they
/// change. Geometry is deliberately excluded; boundary changes morph
/// instead of flashing.
#[must_use]
pub fn attribute_digest(incident: &Incident) -> md5::Digest {
    md5::compute(format!(
        "{}|{}|{}|{}",
        incident.severity,
        incident.headline,
        incident.advisory,
        incident.last_updated.to_rfc3339(),
    ))
}

impl IncidentStateTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `incident` against the previous pass and records its
    /// current digest for the next one.
    pub fn classify(&mut self, incident: &Incident) -> UpdateKind {
        let digest = attribute_digest(incident);
        match self.digests.insert(incident.id.clone(), digest) {
            None => UpdateKind::New,
            Some(previous) if previous == digest => UpdateKind::Unchanged,
            Some(_) => UpdateKind::Updated,
        }
    }

    /// Drops the record for `entity_id`, so a later reappearance reads
    /// as [`UpdateKind::New`].
    pub fn forget(&mut self, entity_id: &str) {
        self.digests.remove(entity_id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn clear(&mut self) {
        self.digests.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use emergency_map_incident_models::IncidentSeverity;

    use super::*;

    fn incident(severity: IncidentSeverity, updated_secs: i64) -> Incident {
        Incident {
            id: "incident.alpha".to_string(),
            headline: "Grass fire".to_string(),
            latitude: -33.8,
            longitude: 151.2,
            severity,
            advisory: "Monitor conditions".to_string(),
            category: "bushfire".to_string(),
            external_link: None,
            last_updated: DateTime::<Utc>::from_timestamp(updated_secs, 0).unwrap(),
        }
    }

    #[test]
    fn first_sighting_is_new() {
        let mut tracker = IncidentStateTracker::new();
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Minor, 0)),
            UpdateKind::New
        );
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn identical_attributes_are_unchanged() {
        let mut tracker = IncidentStateTracker::new();
        tracker.classify(&incident(IncidentSeverity::Minor, 0));
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Minor, 0)),
            UpdateKind::Unchanged
        );
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Minor, 0)),
            UpdateKind::Unchanged
        );
    }

    #[test]
    fn severity_change_is_updated() {
        let mut tracker = IncidentStateTracker::new();
        tracker.classify(&incident(IncidentSeverity::Minor, 0));
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Severe, 0)),
            UpdateKind::Updated
        );
    }

    #[test]
    fn timestamp_change_is_updated() {
        let mut tracker = IncidentStateTracker::new();
        tracker.classify(&incident(IncidentSeverity::Minor, 0));
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Minor, 60)),
            UpdateKind::Updated
        );
    }

    #[test]
    fn forget_resets_to_new() {
        let mut tracker = IncidentStateTracker::new();
        tracker.classify(&incident(IncidentSeverity::Minor, 0));
        tracker.forget("incident.alpha");
        assert!(tracker.is_empty());
        assert_eq!(
            tracker.classify(&incident(IncidentSeverity::Minor, 0)),
            UpdateKind::New
        );
    }

    #[test]
    fn clear_drops_everything() {
        let mut tracker = IncidentStateTracker::new();
        tracker.classify(&incident(IncidentSeverity::Minor, 0));
        tracker.clear();
        assert!(tracker.is_empty());
    }
}
