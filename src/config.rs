//! Run configuration for a model-versus-station comparison.

use crate::error::TideError;
use crate::matching::matcher::{StationMatcher, DEFAULT_EARTH_RADIUS_KM};
use serde::Deserialize;

/// Settings shared by every step of a comparison run.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use ofs_tide::ComparisonConfig;
///
/// let config = ComparisonConfig::from_json(r#"{"earth_radius_km": 6371.0}"#).unwrap();
/// assert_eq!(config.earth_radius_km, 6371.0);
/// assert_eq!(config.time_column, "datetime");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Sphere radius for great-circle distances, in kilometers.
    pub earth_radius_km: f64,
    /// Name of the time column in model and observation tables.
    pub time_column: String,
    /// Constituents to tabulate in harmonic summaries.
    pub constituents: Vec<String>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: DEFAULT_EARTH_RADIUS_KM,
            time_column: "datetime".to_string(),
            constituents: ["M2", "S2", "N2", "K1", "M4", "O1"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ComparisonConfig {
    /// Parses a JSON document, filling missing fields with defaults.
    ///
    /// A radius that is not a positive finite number is rejected with
    /// [`MatchError::InvalidRadius`](crate::MatchError::InvalidRadius).
    pub fn from_json(json: &str) -> Result<Self, TideError> {
        let config: Self = serde_json::from_str(json).map_err(TideError::ConfigParse)?;
        StationMatcher::builder()
            .earth_radius_km(config.earth_radius_km)
            .build()
            .validate()?;
        Ok(config)
    }
}
