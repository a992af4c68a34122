pub mod candidate_set;
pub mod geo_point;
pub mod station;
