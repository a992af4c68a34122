//! Geographic coordinates shared by stations and model grid points.

use crate::matching::error::MatchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A latitude/longitude pair in decimal degrees.
///
/// Latitude is positive north, longitude positive east. Longitudes may follow either the
/// `[-180, 180]` or the `[0, 360)` convention; distances do not depend on which one is used.
///
/// # Examples
///
/// ```
/// use ofs_tide::GeoPoint;
///
/// let annapolis = GeoPoint::new(38.9833, -76.4816);
/// assert_eq!(annapolis.latitude, 38.9833);
/// assert_eq!(annapolis.longitude, -76.4816);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Checks that both coordinates are finite and the latitude lies on the globe.
    ///
    /// `owner` names the station or grid point in the returned error.
    pub fn validate(&self, owner: &str) -> Result<(), MatchError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(MatchError::NonFiniteCoordinate {
                owner: owner.to_string(),
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(MatchError::LatitudeOutOfRange {
                owner: owner.to_string(),
                latitude: self.latitude,
            });
        }
        Ok(())
    }

    /// The `"<lat>_<lon>"` label used for grid columns of a model table.
    pub fn column_label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.latitude, self.longitude)
    }
}

/// Parses a grid column label such as `"39.01_-76.0"`.
impl FromStr for GeoPoint {
    type Err = MatchError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let malformed = || MatchError::MalformedLabel(label.to_string());
        let mut parts = label.split('_');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let latitude = lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| malformed())?;
        Ok(GeoPoint::new(latitude, longitude))
    }
}
