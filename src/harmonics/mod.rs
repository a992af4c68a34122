pub mod error;
pub mod report;
pub mod summary;
