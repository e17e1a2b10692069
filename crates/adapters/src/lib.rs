//! Outbound adapter implementations for the application ports.

pub mod outbound;
