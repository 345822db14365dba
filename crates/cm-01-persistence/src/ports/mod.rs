//! Ports layer for the Persistence Gateway.
//!
//! The store traits are the driven ports consumed by the lifecycle managers.

pub mod gateway;

pub use gateway::*;
