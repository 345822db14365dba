//! # Error Types
//!
//! The error taxonomy shared by both lifecycle managers and the persistence
//! gateway.
//!
//! | Kind | Meaning | Retryable |
//! |------|---------|-----------|
//! | `Validation` | malformed or missing input | no |
//! | `NotFound` | referenced entity absent | no |
//! | `Authorization` | principal lacks permission for this entity | no |
//! | `InvalidState` | entity not in the state the transition requires | no |
//! | `Conflict` | duplicate or colliding request | no |
//! | `Storage` | gateway unreachable or timed out | yes |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag identifying the category of a [`MarketError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    Authorization,
    InvalidState,
    Conflict,
    Storage,
}

/// Errors surfaced by marketplace lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// Input is malformed or missing.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name ("listing", "buy request", "image").
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// Principal is not permitted to act on this entity.
    #[error("Unauthorized: {0}")]
    Authorization(String),

    /// Entity exists but is not in the required state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A duplicate or concurrent request collides with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence gateway failed or timed out.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MarketError {
    /// Shorthand for a [`MarketError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The category tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Only storage failures are safe to retry transparently.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }
}

/// Result alias used across the marketplace crates.
pub type MarketResult<T> = Result<T, MarketError>;
