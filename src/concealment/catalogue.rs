//! Spot catalogue - the level's hide spots, keyed by id

use std::path::Path;

use ahash::AHashMap;

use crate::concealment::spot::ConcealmentSpot;
use crate::core::error::{Result, StealthError};
use crate::core::types::SpotId;

#[derive(Debug, Clone, Default)]
pub struct SpotCatalogue {
    spots: AHashMap<SpotId, ConcealmentSpot>,
}

impl SpotCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of spots
    ///
    /// Spots without an anchor are kept (and reported) but never offered as
    /// hide targets.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let spots: Vec<ConcealmentSpot> = serde_json::from_str(json)?;
        let mut catalogue = Self::new();
        for spot in spots {
            if !spot.is_valid() {
                tracing::warn!(spot = ?spot.id, "Hide spot has no anchor");
            }
            catalogue.insert(spot);
        }
        Ok(catalogue)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Insert or replace a spot; returns the previous spot with the same id
    pub fn insert(&mut self, spot: ConcealmentSpot) -> Option<ConcealmentSpot> {
        self.spots.insert(spot.id, spot)
    }

    pub fn get(&self, id: SpotId) -> Option<&ConcealmentSpot> {
        self.spots.get(&id)
    }

    /// Spot that may be offered as a hide target
    pub fn hide_target(&self, id: SpotId) -> Option<&ConcealmentSpot> {
        self.get(id).filter(|spot| spot.is_valid())
    }

    /// Like [`SpotCatalogue::get`] but with an error for unknown ids
    pub fn require(&self, id: SpotId) -> Result<&ConcealmentSpot> {
        self.get(id).ok_or(StealthError::SpotNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConcealmentSpot> + '_ {
        self.spots.values()
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}

impl FromIterator<ConcealmentSpot> for SpotCatalogue {
    fn from_iter<I: IntoIterator<Item = ConcealmentSpot>>(iter: I) -> Self {
        Self {
            spots: iter.into_iter().map(|spot| (spot.id, spot)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose;
    use glam::Vec3;

    #[test]
    fn test_hide_target_skips_invalid_spots() {
        let catalogue: SpotCatalogue = [
            ConcealmentSpot::new(SpotId(1), Pose::at(Vec3::ONE)),
            ConcealmentSpot::without_anchor(SpotId(2)),
        ]
        .into_iter()
        .collect();

        assert!(catalogue.hide_target(SpotId(1)).is_some());
        assert!(catalogue.get(SpotId(2)).is_some());
        assert!(catalogue.hide_target(SpotId(2)).is_none());
    }

    #[test]
    fn test_require_unknown_spot() {
        let catalogue = SpotCatalogue::new();
        assert!(matches!(
            catalogue.require(SpotId(3)),
            Err(StealthError::SpotNotFound(SpotId(3)))
        ));
    }

    #[test]
    fn test_from_json() {
        let catalogue = SpotCatalogue::from_json_str(
            r#"[
                {
                    "id": 1,
                    "kind": "enclosure",
                    "anchor": { "position": [0.0, 0.0, 4.0], "rotation": [0.0, 0.0, 0.0, 1.0] },
                    "hide_fov": 50.0
                },
                { "id": 2, "anchor": null }
            ]"#,
        )
        .unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.get(SpotId(1)).unwrap().hide_fov, Some(50.0));
        assert!(catalogue.hide_target(SpotId(2)).is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SpotCatalogue::from_json_str("{"),
            Err(StealthError::SerdeError(_))
        ));
    }
}
