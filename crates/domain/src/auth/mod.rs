//! Authentification domain.

pub mod credentials;

pub use credentials::*;
