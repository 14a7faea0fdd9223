//! Crate-level error taxonomy.
//!
//! Three caller-visible classes: a missing resource (`NotFound`), a failed
//! network exchange (`Fetch`, surfaced with a user-initiated retry — never
//! retried automatically), and client-side validation that blocks before any
//! network call (`Validation`). Per-attachment resolution failures never
//! reach this type; the resolver contains them (logged, dropped).

use crate::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Fetch failed: {0}")]
    Fetch(#[source] GatewayError),
    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<GatewayError> for RecordError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(what) => RecordError::NotFound(what),
            other => RecordError::Fetch(other),
        }
    }
}
