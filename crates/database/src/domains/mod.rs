pub mod merge;
pub mod model;
pub mod query;
