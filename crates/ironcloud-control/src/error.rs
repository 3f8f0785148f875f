//! Error types for the orchestrator.
//!
//! Precondition failures (not found, wrong owner, wrong status, inactive) are
//! not errors: mutating operations report them as an `Ok(false)` rejection.
//! The variants here cover only unexpected failures, which the request layer
//! surfaces as a generic internal error with the underlying message.

use ironcloud_store::StoreError;
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Unexpected failures in orchestrator operations.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// The accepted/rejected boolean covers the 204/400 split; anything that
    /// reaches this type is a server-side failure.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }
}
