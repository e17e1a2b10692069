//! Core domain for the docsearch client: identity records, credential
//! value objects and the authentication session state machine.
//!
//! This crate performs no I/O; everything here is pure data and pure
//! transitions.

pub mod auth;
pub mod error;
pub mod identity;
pub mod session;
