pub mod comparison;
pub mod error;
pub mod model_grid;
pub mod station_table;
