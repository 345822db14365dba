//! # Ports Module
//!
//! The driving API of the listing lifecycle manager. The driven side is the
//! persistence gateway from `cm-01-persistence`.

pub mod inbound;

pub use inbound::*;
