pub mod error;
pub mod matcher;
