//! Error types for the storage layer.
//!
//! Precondition outcomes (wrong owner, wrong status, destroyed) never surface
//! here; the orchestrator reports those as rejections. These variants cover
//! genuine storage failures, plus the missing-record case hit by keyed
//! updates.

use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by machine-record storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No machine record exists for the given key.
    #[error("machine record not found")]
    NotFound,

    /// `RocksDB` failed or rejected an operation.
    #[error("machine database error: {0}")]
    Database(String),

    /// A machine record could not be encoded to or decoded from CBOR.
    #[error("machine record serialization error: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_machine_store() {
        assert_eq!(
            StoreError::NotFound.to_string(),
            "machine record not found"
        );
        assert_eq!(
            StoreError::Database("io failure".to_string()).to_string(),
            "machine database error: io failure"
        );
        assert_eq!(
            StoreError::Serialization("bad tag".to_string()).to_string(),
            "machine record serialization error: bad tag"
        );
    }
}
