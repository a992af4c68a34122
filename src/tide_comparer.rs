//! This module provides the main entry point of the crate. It ties station matching,
//! model column selection and harmonic summaries together under one configuration.

use crate::config::ComparisonConfig;
use crate::error::TideError;
use crate::frames::comparison::comparison_frame;
use crate::frames::model_grid::{ModelGrid, TimeSpan};
use crate::frames::station_table::matched_to_frame;
use crate::harmonics::summary::HarmonicSummary;
use crate::matching::matcher::StationMatcher;
use crate::types::station::{MatchedStation, ReferenceStation};
use bon::bon;
use log::info;
use polars::prelude::DataFrame;
use std::collections::BTreeMap;

/// Model series aligned to physical stations.
///
/// Produced by [`TideComparer::align`]. The `model` frame holds the time column and one
/// column per station, named by station id and taken from its nearest grid point.
#[derive(Debug, Clone)]
pub struct AlignedStations {
    pub matched: Vec<MatchedStation>,
    pub model: DataFrame,
    pub time_span: TimeSpan,
    time_column: String,
}

impl AlignedStations {
    /// The station table augmented with `nearest_dist` and `nearest_ofsIndex`.
    pub fn station_table(&self) -> Result<DataFrame, TideError> {
        Ok(matched_to_frame(&self.matched)?)
    }

    /// Joins the model series of `station_id` with the same station's observed series.
    ///
    /// `observed` needs the configured time column and a column named `station_id`.
    pub fn compare(&self, observed: &DataFrame, station_id: &str) -> Result<DataFrame, TideError> {
        Ok(comparison_frame(
            &self.model,
            observed,
            station_id,
            &self.time_column,
        )?)
    }
}

/// The main client struct for comparing model output against tide stations.
///
/// # Examples
///
/// ```rust
/// use ofs_tide::{ReferenceStation, TideComparer};
/// use polars::prelude::*;
/// use chrono::NaiveDate;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let model = df!(
///     "datetime" => [start, start + chrono::Duration::minutes(6)],
///     "39.01_-76.0" => [0.31, 0.35],
///     "38.0_-75.0" => [0.80, 0.76],
/// )?;
/// let stations = vec![ReferenceStation::new("8575512", 39.0, -76.0)];
///
/// let comparer = TideComparer::default();
/// let aligned = comparer.align().model(model).stations(&stations).call()?;
///
/// assert_eq!(aligned.matched[0].nearest_candidate_index(), 0);
/// assert!(aligned.model.column("8575512").is_ok());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TideComparer {
    config: ComparisonConfig,
    matcher: StationMatcher,
}

#[bon]
impl TideComparer {
    pub fn new(config: ComparisonConfig) -> Self {
        let matcher = StationMatcher::builder()
            .earth_radius_km(config.earth_radius_km)
            .build();
        Self { config, matcher }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn matcher(&self) -> &StationMatcher {
        &self.matcher
    }

    /// Matches stations to the model grid and extracts each station's model series.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.model(DataFrame)`: **Required.** Wide model table: the configured time column plus
    ///   one `"<lat>_<lon>"` column per grid point.
    /// * `.stations(&[ReferenceStation])`: **Required.** Stations to match.
    /// * `.keep_incomplete(bool)`: Optional. Keep grid points with gaps or NaNs as candidates.
    ///   Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns [`TideError::Frame`] if the table lacks the time column or has badly labelled
    /// grid columns, and [`TideError::Match`] if no usable grid point remains, a coordinate
    /// or the configured radius is invalid, or two stations share an id.
    #[builder]
    pub fn align(
        &self,
        model: DataFrame,
        stations: &[ReferenceStation],
        keep_incomplete: Option<bool>,
    ) -> Result<AlignedStations, TideError> {
        let mut grid = ModelGrid::new(model, &self.config.time_column)?;
        if !keep_incomplete.unwrap_or(false) {
            grid = grid.drop_incomplete_columns()?;
        }

        let candidates = grid.candidates()?;
        let matched = self.matcher.match_stations(stations, &candidates)?;
        let model = grid.select_stations(&matched)?;
        let time_span = grid.time_span()?;
        info!(
            "Aligned {} stations to {} grid points between {} and {}",
            matched.len(),
            candidates.len(),
            time_span.start,
            time_span.end
        );

        Ok(AlignedStations {
            matched,
            model,
            time_span,
            time_column: self.config.time_column.clone(),
        })
    }

    /// Builds one comparison table per configured constituent.
    pub fn constituent_tables(
        &self,
        summary: &HarmonicSummary,
    ) -> Result<BTreeMap<String, DataFrame>, TideError> {
        Ok(summary.constituent_frames(self.config.constituents.as_slice())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmonics::report::HarmonicReport;
    use crate::matching::error::MatchError;
    use chrono::{NaiveDate, NaiveDateTime};
    use polars::prelude::*;

    fn times(n: u32) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::minutes(6 * i as i64))
            .collect()
    }

    fn model_table() -> DataFrame {
        df!(
            "datetime" => times(3),
            "39.0_-76.5" => [Some(0.1), None, Some(0.3)],
            "39.01_-76.0" => [0.31, 0.35, 0.40],
            "36.95_-76.33" => [0.80, 0.76, 0.70],
        )
        .unwrap()
    }

    fn stations() -> Vec<ReferenceStation> {
        vec![
            ReferenceStation::new("8575512", 39.0, -76.4).with_name("Annapolis"),
            ReferenceStation::new("8638610", 36.9467, -76.33).with_name("Sewells Point"),
        ]
    }

    #[test]
    fn align_skips_incomplete_grid_points_by_default() {
        let comparer = TideComparer::default();
        let stations = stations();
        let aligned = comparer
            .align()
            .model(model_table())
            .stations(&stations)
            .call()
            .unwrap();

        // The closest raw grid point to Annapolis has a gap, so the next one is used.
        assert_eq!(aligned.matched[0].nearest_candidate_index(), 0);
        assert_eq!(aligned.matched[1].nearest_candidate_index(), 1);
        let annapolis = aligned.model.column("8575512").unwrap().f64().unwrap();
        assert_eq!(annapolis.get(1), Some(0.35));
        assert_eq!(aligned.time_span.end, times(3)[2]);

        let table = aligned.station_table().unwrap();
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn align_can_keep_incomplete_grid_points() {
        let comparer = TideComparer::default();
        let stations = stations();
        let aligned = comparer
            .align()
            .model(model_table())
            .stations(&stations)
            .keep_incomplete(true)
            .call()
            .unwrap();

        assert_eq!(aligned.matched[0].nearest_candidate_index(), 0);
        let annapolis = aligned.model.column("8575512").unwrap().f64().unwrap();
        assert_eq!(annapolis.get(1), None);
    }

    #[test]
    fn align_then_compare_against_observations() {
        let comparer = TideComparer::default();
        let stations = stations();
        let aligned = comparer
            .align()
            .model(model_table())
            .stations(&stations)
            .call()
            .unwrap();
        let observed = df!(
            "datetime" => times(3),
            "8575512" => [0.30, 0.30, 0.30],
            "8638610" => [0.75, 0.75, 0.75],
        )
        .unwrap();

        let comparison = aligned.compare(&observed, "8638610").unwrap();

        assert_eq!(comparison.height(), 3);
        let diff = comparison.column("difference").unwrap().f64().unwrap();
        assert!((diff.get(0).unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn empty_grid_is_a_match_error() {
        let comparer = TideComparer::default();
        let stations = stations();
        let model = df!("datetime" => times(2)).unwrap();
        let err = comparer
            .align()
            .model(model)
            .stations(&stations)
            .call()
            .unwrap_err();
        assert!(matches!(err, TideError::Match(MatchError::EmptyCandidates)));
    }

    #[test]
    fn radius_comes_from_config() {
        let config = ComparisonConfig {
            earth_radius_km: 1.0,
            ..ComparisonConfig::default()
        };
        let comparer = TideComparer::new(config);
        assert_eq!(comparer.matcher().earth_radius_km(), 1.0);
    }

    #[test]
    fn constituent_tables_follow_config() {
        let text = concat!(
            "percent var predicted/var original= 90.0 %\n",
            "tide freq amp amp_err pha pha_err\n",
            "M2 0.08 0.1 0.01 10.0 1.0\n",
        );
        let report = HarmonicReport::parse(text).unwrap();
        let reports = BTreeMap::from([("8575512".to_string(), report)]);
        let summary = HarmonicSummary::new(reports.clone(), reports);

        let comparer = TideComparer::default();
        let tables = comparer.constituent_tables(&summary).unwrap();

        assert_eq!(
            tables.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["K1", "M2", "M4", "N2", "O1", "S2"]
        );
        let m2_ratio = tables["M2"].column("amp_ratio").unwrap().f64().unwrap();
        assert_eq!(m2_ratio.get(0), Some(1.0));
    }

    #[test]
    fn negative_radius_in_config_fails_alignment() {
        let config = ComparisonConfig {
            earth_radius_km: -6373.0,
            ..ComparisonConfig::default()
        };
        let comparer = TideComparer::new(config);
        let stations = stations();
        let err = comparer
            .align()
            .model(model_table())
            .stations(&stations)
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            TideError::Match(MatchError::InvalidRadius(r)) if r == -6373.0
        ));
    }

    #[test]
    fn duplicate_station_ids_fail_before_extraction() {
        let comparer = TideComparer::default();
        let stations = vec![
            ReferenceStation::new("8575512", 39.0, -76.4),
            ReferenceStation::new("8575512", 36.9467, -76.33),
        ];
        let err = comparer
            .align()
            .model(model_table())
            .stations(&stations)
            .call()
            .unwrap_err();
        assert!(matches!(
            err,
            TideError::Match(MatchError::DuplicateStationId(id)) if id == "8575512"
        ));
    }
}
