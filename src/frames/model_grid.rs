//! Contains [`ModelGrid`], a wrapper around the wide water-level table produced from model
//! output: one time column plus one column per grid point, labelled `"<lat>_<lon>"`.

use crate::frames::error::FrameError;
use crate::types::candidate_set::CandidateSet;
use crate::types::station::MatchedStation;
use chrono::{DateTime, NaiveDateTime};
use log::{info, warn};
use polars::prelude::*;

/// First and last instant covered by a time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Model water levels on the grid, one column per grid point.
///
/// The column order defines the candidate order: grid point `i` of [`ModelGrid::candidates`]
/// is the `i`-th non-time column of the frame.
#[derive(Debug, Clone)]
pub struct ModelGrid {
    frame: DataFrame,
    time_column: String,
}

impl ModelGrid {
    /// Wraps `frame`, whose time axis lives in `time_column`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MissingColumn`] if `time_column` is not part of the frame.
    pub fn new(frame: DataFrame, time_column: &str) -> Result<Self, FrameError> {
        frame
            .column(time_column)
            .map_err(|e| FrameError::MissingColumn {
                column: time_column.to_string(),
                source: e,
            })?;
        Ok(Self {
            frame,
            time_column: time_column.to_string(),
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    fn grid_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.frame
            .get_columns()
            .iter()
            .filter(move |column| column.name().as_str() != self.time_column)
    }

    /// Labels of the grid columns, in frame order.
    pub fn candidate_labels(&self) -> Vec<&str> {
        self.grid_columns()
            .map(|column| column.name().as_str())
            .collect()
    }

    /// Parses the grid column labels into the ordered set of candidate points.
    pub fn candidates(&self) -> Result<CandidateSet, FrameError> {
        Ok(CandidateSet::from_labels(self.candidate_labels())?)
    }

    /// Drops every grid point whose series has a missing or NaN value.
    ///
    /// Only grid points with a complete series are useful for comparison against a station.
    pub fn drop_incomplete_columns(self) -> Result<Self, FrameError> {
        let total = self.grid_columns().count();
        let mut kept = Vec::with_capacity(self.frame.width());
        for column in self.frame.get_columns() {
            if column.name().as_str() == self.time_column || is_complete(column)? {
                kept.push(column.clone());
            }
        }
        let frame = DataFrame::new(kept)?;
        let complete = frame.width() - 1;
        if complete < total {
            warn!(
                "Dropped {} of {} grid points with incomplete series",
                total - complete,
                total
            );
        }
        info!("{} grid points with full time series", complete);
        Ok(Self {
            frame,
            time_column: self.time_column,
        })
    }

    /// Builds a frame holding the time column and, for every matched station, the series of
    /// its nearest grid point renamed to the station id. Columns follow the order of `matched`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::CandidateIndexOutOfRange`] if a match refers to a grid point this
    /// grid does not have, which happens when the matches were computed against another grid.
    pub fn select_stations(&self, matched: &[MatchedStation]) -> Result<DataFrame, FrameError> {
        let grid: Vec<&Column> = self.grid_columns().collect();
        let mut columns = Vec::with_capacity(matched.len() + 1);
        columns.push(self.frame.column(&self.time_column)?.clone());

        for station in matched {
            let index = station.nearest_candidate_index();
            let source = grid
                .get(index)
                .ok_or_else(|| FrameError::CandidateIndexOutOfRange {
                    station: station.id().to_string(),
                    index,
                    available: grid.len(),
                })?;
            let mut column = (*source).clone();
            column.rename(station.id().into());
            columns.push(column);
        }

        Ok(DataFrame::new(columns)?)
    }

    /// The first and last instant of the time column.
    ///
    /// These bounds are what an observation request for the same period needs.
    pub fn time_span(&self) -> Result<TimeSpan, FrameError> {
        let column = self.frame.column(&self.time_column)?;
        let DataType::Datetime(unit, _) = column.dtype() else {
            return Err(FrameError::ColumnType {
                column: self.time_column.clone(),
                expected: "Datetime",
                found: column.dtype().clone(),
            });
        };
        let unit = *unit;

        let raw = column.cast(&DataType::Int64)?;
        let values = raw.i64()?;
        let empty = || FrameError::EmptyTimeColumn(self.time_column.clone());
        let start = values.min().ok_or_else(empty)?;
        let end = values.max().ok_or_else(empty)?;

        Ok(TimeSpan {
            start: to_naive(start, unit).ok_or_else(empty)?,
            end: to_naive(end, unit).ok_or_else(empty)?,
        })
    }
}

fn is_complete(column: &Column) -> Result<bool, FrameError> {
    if column.null_count() > 0 {
        return Ok(false);
    }
    let values = column.cast(&DataType::Float64)?;
    let has_nan = values.f64()?.into_iter().any(|v| v.map_or(true, f64::is_nan));
    Ok(!has_nan)
}

fn to_naive(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let datetime = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
    };
    datetime.map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::geo_point::GeoPoint;
    use crate::types::station::ReferenceStation;
    use crate::StationMatcher;
    use chrono::NaiveDate;

    fn times(n: u32) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::minutes(6 * i as i64))
            .collect()
    }

    fn sample_grid() -> ModelGrid {
        let frame = df!(
            "datetime" => times(4),
            "39.01_-76.0" => [0.10, 0.20, 0.30, 0.40],
            "38.0_-75.0" => [Some(1.0), None, Some(1.2), Some(1.3)],
            "38.5_-76.2" => [2.0, f64::NAN, 2.2, 2.3],
            "37.0_-76.3" => [3.0, 3.1, 3.2, 3.3],
        )
        .unwrap();
        ModelGrid::new(frame, "datetime").unwrap()
    }

    #[test]
    fn requires_the_time_column() {
        let frame = df!("39.0_-76.0" => [1.0]).unwrap();
        let err = ModelGrid::new(frame, "datetime").unwrap_err();
        assert!(matches!(err, FrameError::MissingColumn { column, .. } if column == "datetime"));
    }

    #[test]
    fn candidates_follow_column_order() {
        let grid = sample_grid();
        assert_eq!(
            grid.candidate_labels(),
            vec!["39.01_-76.0", "38.0_-75.0", "38.5_-76.2", "37.0_-76.3"]
        );
        let candidates = grid.candidates().unwrap();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates.get(3), Some(&GeoPoint::new(37.0, -76.3)));
    }

    #[test]
    fn unlabelled_columns_are_reported() {
        let frame = df!("datetime" => times(1), "zeta" => [0.5]).unwrap();
        let grid = ModelGrid::new(frame, "datetime").unwrap();
        assert!(matches!(grid.candidates(), Err(FrameError::Grid(_))));
    }

    #[test]
    fn drops_columns_with_nulls_or_nans() {
        let grid = sample_grid().drop_incomplete_columns().unwrap();
        assert_eq!(grid.candidate_labels(), vec!["39.01_-76.0", "37.0_-76.3"]);
        assert_eq!(grid.frame().height(), 4);
        assert_eq!(grid.frame().get_column_names()[0].as_str(), "datetime");
    }

    #[test]
    fn selects_and_renames_matched_columns() {
        let grid = sample_grid().drop_incomplete_columns().unwrap();
        let stations = vec![
            ReferenceStation::new("8637689", 37.2, -76.5),
            ReferenceStation::new("8575512", 39.0, -76.0),
        ];
        let matched = StationMatcher::default()
            .match_stations(&stations, &grid.candidates().unwrap())
            .unwrap();

        let selected = grid.select_stations(&matched).unwrap();

        let names: Vec<&str> = selected
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(names, vec!["datetime", "8637689", "8575512"]);
        let yorktown = selected.column("8637689").unwrap().f64().unwrap();
        assert_eq!(yorktown.get(0), Some(3.0));
        let annapolis = selected.column("8575512").unwrap().f64().unwrap();
        assert_eq!(annapolis.get(3), Some(0.40));
    }

    #[test]
    fn foreign_match_indices_are_rejected() {
        let grid = sample_grid().drop_incomplete_columns().unwrap();
        let wide_grid: CandidateSet = (0..5)
            .map(|i| GeoPoint::new(30.0 + i as f64, -76.0))
            .collect();
        let matched = StationMatcher::default()
            .match_stations(&[ReferenceStation::new("A", 34.0, -76.0)], &wide_grid)
            .unwrap();

        let err = grid.select_stations(&matched).unwrap_err();
        assert!(matches!(
            err,
            FrameError::CandidateIndexOutOfRange {
                index: 4,
                available: 2,
                ..
            }
        ));
    }

    #[test]
    fn reports_time_span() {
        let grid = sample_grid();
        let expected = times(4);
        assert_eq!(
            grid.time_span().unwrap(),
            TimeSpan {
                start: expected[0],
                end: expected[3],
            }
        );
    }

    #[test]
    fn time_span_needs_datetimes() {
        let frame = df!("datetime" => [1i64, 2], "39.0_-76.0" => [1.0, 2.0]).unwrap();
        let grid = ModelGrid::new(frame, "datetime").unwrap();
        assert!(matches!(grid.time_span(), Err(FrameError::ColumnType { .. })));
    }
}
