//! # Domain Module
//!
//! Pure listing rules: input validation, image placement and pagination.

pub mod config;
pub mod images;
pub mod input;
pub mod validation;

pub use config::*;
pub use images::*;
pub use input::*;
pub use validation::*;
