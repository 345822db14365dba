//! # Campus Market Runtime Library
//!
//! Exposes the runtime wiring for tests. The main entry point is the
//! `main.rs` binary.
//!
//! ## Modules
//!
//! - `container/` - configuration and subsystem wiring
//! - `boundary` - error kind to protocol status mapping
//! - `walkthrough` - the scripted calculator sale run by the binary

#![warn(clippy::all)]

pub mod boundary;
pub mod container;
pub mod walkthrough;

pub use boundary::{status_code, ErrorResponse};
pub use container::{load_config, ConfigError, MarketConfig, MarketContainer};
