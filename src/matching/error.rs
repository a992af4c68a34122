use thiserror::Error;

/// Precondition violations detected before any station is matched.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("Candidate set is empty, nothing to match stations against")]
    EmptyCandidates,

    #[error("Non-finite coordinate ({latitude}, {longitude}) for {owner}")]
    NonFiniteCoordinate {
        owner: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Latitude {latitude} for {owner} is outside [-90, 90]")]
    LatitudeOutOfRange { owner: String, latitude: f64 },

    #[error("Earth radius must be a positive finite number of kilometers, got {0}")]
    InvalidRadius(f64),

    #[error("Station id '{0}' appears more than once")]
    DuplicateStationId(String),

    #[error("Grid column label '{0}' is not of the form '<lat>_<lon>'")]
    MalformedLabel(String),
}
