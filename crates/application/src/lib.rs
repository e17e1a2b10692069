//! Application layer: ports the session container needs from the outside
//! world, and the session lifecycle use case itself.

pub mod dto;
pub mod error;
pub mod ports;
pub mod usecases;
