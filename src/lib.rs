mod config;
mod error;
mod frames;
mod harmonics;
mod matching;
mod tide_comparer;
mod types;

pub use config::ComparisonConfig;
pub use error::TideError;
pub use tide_comparer::*;

pub use matching::matcher::{StationMatcher, DEFAULT_EARTH_RADIUS_KM};
pub use types::candidate_set::CandidateSet;
pub use types::geo_point::GeoPoint;
pub use types::station::{MatchedStation, ReferenceStation};

pub use frames::comparison::{comparison_frame, TideFrameFilterExt};
pub use frames::model_grid::{ModelGrid, TimeSpan};
pub use frames::station_table::{matched_to_frame, stations_from_frame};

pub use harmonics::report::{ConstituentFit, HarmonicReport};
pub use harmonics::summary::HarmonicSummary;

pub use frames::error::FrameError;
pub use harmonics::error::HarmonicsError;
pub use matching::error::MatchError;
