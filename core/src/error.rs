//! Error types for the todo API client and store.
//!
//! # Design
//! The two service-side failures, a missing required input (400) and an
//! absent record (404), get their own variants carrying the service's
//! message. Every other unexpected status lands in `Http` with the raw body.

/// Errors returned by `TodoClient` parse methods and the store.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service rejected the request input (400).
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// The referenced todo does not exist (404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Some of a fan-out of deletes failed.
    #[error("{failed} of {attempted} deletions failed")]
    Batch { failed: usize, attempted: usize },
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
