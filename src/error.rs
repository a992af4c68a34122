use crate::frames::error::FrameError;
use crate::harmonics::error::HarmonicsError;
use crate::matching::error::MatchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TideError {
    #[error(transparent)]
    Match(#[from] MatchError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Harmonics(#[from] HarmonicsError),

    #[error("Failed to parse configuration")]
    ConfigParse(#[source] serde_json::Error),
}
