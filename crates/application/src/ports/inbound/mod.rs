//! These traits define what the application can do.

pub mod session;

pub use session::*;
