pub mod catalog;
pub mod config;
pub mod error;
pub mod orientation;
pub mod telemetry;
