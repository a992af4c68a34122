use crate::matching::error::MatchError;
use polars::error::PolarsError;
use polars::prelude::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Required column '{column}' not found in DataFrame")]
    MissingColumn {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: DataType,
    },

    #[error("Column '{column}' has a missing value at row {row}")]
    NullValue { column: String, row: usize },

    #[error("Time column '{0}' has no values")]
    EmptyTimeColumn(String),

    #[error("Station {station} refers to grid point #{index}, but the grid only has {available}")]
    CandidateIndexOutOfRange {
        station: String,
        index: usize,
        available: usize,
    },

    #[error("Invalid model grid: {0}")]
    Grid(#[from] MatchError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
