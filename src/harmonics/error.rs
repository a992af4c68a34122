use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarmonicsError {
    #[error("Failed to read harmonic report '{0}'")]
    ReportRead(PathBuf, #[source] std::io::Error),

    #[error("No constituent table (header starting with 'tide') found in report")]
    TableNotFound,

    #[error("Constituent table is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed building summary table: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
