//! # Domain Module
//!
//! Seller decisions on a pending buy request.

pub mod decision;

pub use decision::*;
