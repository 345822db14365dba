//! # Domain Module
//!
//! Record shapes crossing the gateway boundary, plus the pure query filter
//! and image placement rule shared by every adapter.

pub mod placement;
pub mod query;
pub mod records;

pub use placement::*;
pub use query::*;
pub use records::*;
