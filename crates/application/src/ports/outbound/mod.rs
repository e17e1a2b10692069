//! These traits define what the application needs from the outside world.

pub mod api;
pub mod credentials;
pub mod navigator;
pub mod telemetry;

pub use api::*;
pub use credentials::*;
pub use navigator::*;
pub use telemetry::*;
