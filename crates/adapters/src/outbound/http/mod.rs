//! HTTP transport adapter.

pub mod client;
mod models;

pub use client::*;
