use crate::matching::error::MatchError;
use crate::types::geo_point::GeoPoint;

/// Ordered model grid points that stations are matched against.
///
/// Order matters: a match refers to a grid point by its position here, and callers use that
/// position to pick the corresponding data column of the model table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    points: Vec<GeoPoint>,
}

impl CandidateSet {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Builds the set from `"<lat>_<lon>"` column labels, keeping their order.
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a str>) -> Result<Self, MatchError> {
        let points = labels
            .into_iter()
            .map(str::parse::<GeoPoint>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GeoPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.points
    }
}

impl From<Vec<GeoPoint>> for CandidateSet {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<GeoPoint> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
