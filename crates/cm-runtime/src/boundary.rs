//! # Boundary Error Mapping
//!
//! Translates tagged lifecycle errors into an HTTP-style status and a JSON
//! body. The managers never see status codes.
//!
//! | Kind | Status |
//! |------|--------|
//! | `not_found` | 404 |
//! | `authorization` | 403 |
//! | `validation` / `invalid_state` / `conflict` | 400 |
//! | `storage` | 503 |

use serde::{Deserialize, Serialize};
use shared_types::{ErrorKind, MarketError};

/// Protocol status for an error kind.
pub fn status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::NotFound => 404,
        ErrorKind::Authorization => 403,
        ErrorKind::Validation | ErrorKind::InvalidState | ErrorKind::Conflict => 400,
        ErrorKind::Storage => 503,
    }
}

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
    pub status: u16,
}

impl From<&MarketError> for ErrorResponse {
    fn from(e: &MarketError) -> Self {
        let kind = e.kind();
        Self {
            kind,
            message: e.to_string(),
            status: status_code(kind),
        }
    }
}

impl ErrorResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
