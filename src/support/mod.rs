// Shared building blocks for the tool pipeline

pub mod date_range;
pub mod logging;
pub mod metrics;
pub mod money;
pub mod params;
pub mod query;
pub mod response;
pub mod rows;
pub mod schema;
