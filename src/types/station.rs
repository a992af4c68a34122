//! Defines the physical tide stations used as matching references, and the result of
//! pairing each of them with its closest model grid point.

use crate::types::geo_point::GeoPoint;
use serde::{Deserialize, Serialize};

/// A physical tide gauge, identified by its station id (e.g. `"8575512"` for Annapolis).
///
/// Stations usually come from a metadata query as rows of `{id, name, lat, lon}`; the
/// coordinate fields are flattened so such rows deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStation {
    /// The unique station identifier.
    pub id: String,
    /// Human-readable station name, if known.
    #[serde(default)]
    pub name: Option<String>,
    /// Location of the gauge.
    #[serde(flatten)]
    pub location: GeoPoint,
}

impl ReferenceStation {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            location: GeoPoint::new(latitude, longitude),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A [`ReferenceStation`] annotated with its nearest model grid point.
///
/// Only [`crate::StationMatcher`] creates these. The derived fields are read-only so a
/// match result cannot drift from the run that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedStation {
    #[serde(flatten)]
    station: ReferenceStation,
    #[serde(rename = "nearest_dist")]
    nearest_distance_km: f64,
    #[serde(rename = "nearest_ofsIndex")]
    nearest_candidate_index: usize,
}

impl MatchedStation {
    pub(crate) fn new(
        station: ReferenceStation,
        nearest_distance_km: f64,
        nearest_candidate_index: usize,
    ) -> Self {
        Self {
            station,
            nearest_distance_km,
            nearest_candidate_index,
        }
    }

    pub fn station(&self) -> &ReferenceStation {
        &self.station
    }

    pub fn id(&self) -> &str {
        &self.station.id
    }

    /// Great-circle distance to the chosen grid point, in kilometers.
    pub fn nearest_distance_km(&self) -> f64 {
        self.nearest_distance_km
    }

    /// Position of the chosen grid point in the candidate set.
    pub fn nearest_candidate_index(&self) -> usize {
        self.nearest_candidate_index
    }
}
