pub mod analytics;
pub mod config;
pub mod error;
pub mod model;
pub mod satisfaction;
pub mod telemetry;
