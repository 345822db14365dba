//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the gateway ports.

mod deadline;
mod memory;

pub use deadline::DeadlineGateway;
pub use memory::InMemoryGateway;
