//! Outbound adapters.

pub mod http;
pub mod navigator;
pub mod persistence;
pub mod telemetry;
