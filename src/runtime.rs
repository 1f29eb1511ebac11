//! Client configuration and logging setup.

pub mod config;
pub mod telemetry;
