//! Conversions between station tables (`id`, `name`, `lat`, `lon`) and station types.

use crate::frames::error::FrameError;
use crate::types::station::{MatchedStation, ReferenceStation};
use polars::prelude::*;

pub const COL_ID: &str = "id";
pub const COL_NAME: &str = "name";
pub const COL_LAT: &str = "lat";
pub const COL_LON: &str = "lon";
pub const COL_NEAREST_DIST: &str = "nearest_dist";
pub const COL_NEAREST_INDEX: &str = "nearest_ofsIndex";

fn get_column<'a>(df: &'a DataFrame, col: &str) -> Result<&'a Column, FrameError> {
    df.column(col).map_err(|e| FrameError::MissingColumn {
        column: col.to_string(),
        source: e,
    })
}

fn float_values(df: &DataFrame, col: &str) -> Result<Vec<f64>, FrameError> {
    let column = get_column(df, col)?.cast(&DataType::Float64)?;
    column
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| FrameError::NullValue {
                column: col.to_string(),
                row,
            })
        })
        .collect()
}

/// Reads reference stations from a table with `id`, `lat` and `lon` columns.
///
/// A string `name` column is picked up when present. Coordinates may be stored as any numeric type.
pub fn stations_from_frame(df: &DataFrame) -> Result<Vec<ReferenceStation>, FrameError> {
    let id_column = get_column(df, COL_ID)?;
    let ids = id_column.str().map_err(|_| FrameError::ColumnType {
        column: COL_ID.to_string(),
        expected: "String",
        found: id_column.dtype().clone(),
    })?;
    let names = match df.column(COL_NAME) {
        // An all-null column carries no names.
        Ok(column) if column.dtype() == &DataType::Null => None,
        Ok(column) => Some(column.str().map_err(|_| FrameError::ColumnType {
            column: COL_NAME.to_string(),
            expected: "String",
            found: column.dtype().clone(),
        })?),
        Err(_) => None,
    };
    let latitudes = float_values(df, COL_LAT)?;
    let longitudes = float_values(df, COL_LON)?;

    (0..df.height())
        .map(|row| {
            let id = ids.get(row).ok_or_else(|| FrameError::NullValue {
                column: COL_ID.to_string(),
                row,
            })?;
            let mut station = ReferenceStation::new(id, latitudes[row], longitudes[row]);
            if let Some(name) = names.and_then(|n| n.get(row)) {
                station = station.with_name(name);
            }
            Ok(station)
        })
        .collect()
}

/// Builds the augmented station table, adding `nearest_dist` (km) and `nearest_ofsIndex`.
pub fn matched_to_frame(matched: &[MatchedStation]) -> Result<DataFrame, FrameError> {
    let ids: Vec<&str> = matched.iter().map(|m| m.id()).collect();
    let names: Vec<Option<&str>> = matched
        .iter()
        .map(|m| m.station().name.as_deref())
        .collect();
    let lats: Vec<f64> = matched
        .iter()
        .map(|m| m.station().location.latitude)
        .collect();
    let lons: Vec<f64> = matched
        .iter()
        .map(|m| m.station().location.longitude)
        .collect();
    let distances: Vec<f64> = matched.iter().map(|m| m.nearest_distance_km()).collect();
    let indices: Vec<u64> = matched
        .iter()
        .map(|m| m.nearest_candidate_index() as u64)
        .collect();

    let df = DataFrame::new(vec![
        Column::new(COL_ID.into(), ids),
        Column::new(COL_NAME.into(), names),
        Column::new(COL_LAT.into(), lats),
        Column::new(COL_LON.into(), lons),
        Column::new(COL_NEAREST_DIST.into(), distances),
        Column::new(COL_NEAREST_INDEX.into(), indices),
    ])?;
    Ok(df)
}
