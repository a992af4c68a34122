use crate::matching::error::MatchError;
use crate::types::candidate_set::CandidateSet;
use crate::types::geo_point::GeoPoint;
use crate::types::station::{MatchedStation, ReferenceStation};
use bon::Builder;
use log::debug;
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// Mean Earth radius used for great-circle distances, in kilometers.
pub const DEFAULT_EARTH_RADIUS_KM: f64 = 6373.0;

/// Pairs physical stations with their closest model grid point.
///
/// The matcher owns the sphere radius its distances are computed on, so two matchers with
/// different radii can coexist and each call is a pure function of its inputs.
///
/// # Examples
///
/// ```
/// use ofs_tide::{CandidateSet, GeoPoint, ReferenceStation, StationMatcher};
///
/// let matcher = StationMatcher::default();
/// let stations = vec![ReferenceStation::new("A", 39.0, -76.0)];
/// let candidates = CandidateSet::new(vec![
///     GeoPoint::new(39.01, -76.0),
///     GeoPoint::new(38.0, -75.0),
/// ]);
///
/// let matched = matcher.match_stations(&stations, &candidates)?;
/// assert_eq!(matched[0].nearest_candidate_index(), 0);
/// # Ok::<(), ofs_tide::MatchError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct StationMatcher {
    #[builder(default = DEFAULT_EARTH_RADIUS_KM)]
    earth_radius_km: f64,
}

impl Default for StationMatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

// Orders by distance first, then by position, so the minimum is the lowest-index nearest point.
type RankedCandidate = (OrderedFloat<f64>, usize);

impl StationMatcher {
    pub fn earth_radius_km(&self) -> f64 {
        self.earth_radius_km
    }

    /// Checks that the radius is usable for ranking, i.e. finite and strictly positive.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.earth_radius_km.is_finite() && self.earth_radius_km > 0.0 {
            Ok(())
        } else {
            Err(MatchError::InvalidRadius(self.earth_radius_km))
        }
    }

    /// Haversine distance between two points, in kilometers.
    ///
    /// Never fails: NaN or infinite coordinates yield a NaN distance, so callers that need a
    /// clean result should validate points first.
    pub fn great_circle_distance(&self, p1: &GeoPoint, p2: &GeoPoint) -> f64 {
        let lat1 = p1.latitude.to_radians();
        let lat2 = p2.latitude.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (p2.longitude - p1.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // Rounding can push `a` a hair above 1 for antipodal points.
        let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

        self.earth_radius_km * c
    }

    /// Finds, for every station, the closest point in `candidates`.
    ///
    /// Returns one [`MatchedStation`] per input station, in input order. When several
    /// candidates are exactly equidistant the one with the lowest index wins.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidRadius`] if the matcher's radius is not positive and finite,
    /// [`MatchError::EmptyCandidates`] if there is nothing to match against, and
    /// [`MatchError::NonFiniteCoordinate`] or [`MatchError::LatitudeOutOfRange`] if any station
    /// or candidate has an unusable coordinate. Station ids must be unique, otherwise
    /// [`MatchError::DuplicateStationId`] is returned. Nothing is matched when an error is
    /// returned.
    pub fn match_stations(
        &self,
        stations: &[ReferenceStation],
        candidates: &CandidateSet,
    ) -> Result<Vec<MatchedStation>, MatchError> {
        self.validate()?;
        if candidates.is_empty() {
            return Err(MatchError::EmptyCandidates);
        }
        for (index, point) in candidates.iter().enumerate() {
            point.validate(&format!("grid point #{index}"))?;
        }
        let mut seen_ids = HashSet::with_capacity(stations.len());
        for station in stations {
            if !seen_ids.insert(station.id.as_str()) {
                return Err(MatchError::DuplicateStationId(station.id.clone()));
            }
            station
                .location
                .validate(&format!("station '{}'", station.id))?;
        }

        let matched = stations
            .iter()
            .map(|station| {
                let (distance, index) = self.nearest(&station.location, candidates);
                debug!(
                    "Station {} matched grid point #{} at {:.3} km",
                    station.id, index, distance
                );
                MatchedStation::new(station.clone(), distance, index)
            })
            .collect();
        Ok(matched)
    }

    fn nearest(&self, location: &GeoPoint, candidates: &CandidateSet) -> (f64, usize) {
        let (distance, index) = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| -> RankedCandidate {
                (
                    OrderedFloat(self.great_circle_distance(location, candidate)),
                    index,
                )
            })
            .min()
            // Both inputs were validated and the set is non-empty, so a minimum exists.
            .unwrap_or((OrderedFloat(f64::INFINITY), 0));
        (distance.into_inner(), index)
    }
}
