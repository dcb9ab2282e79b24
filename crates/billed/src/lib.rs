pub mod bills;
pub mod config;
pub mod error;
pub mod telemetry;
