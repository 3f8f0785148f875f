//! `RocksDB` storage layer for ironcloud.
//!
//! This crate provides persistent storage for machine records using `RocksDB`
//! with column families for efficient indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `machines`: Primary machine records, keyed by big-endian `machine_id`
//! - `machines_by_uid`: Index from caller-facing UID to internal id
//! - `machines_by_owner`: Index for listing machines by owner
//! - `meta`: Store metadata (the machine id sequence)
//!
//! Reads reflect the latest committed write per record; the lifecycle
//! orchestrator relies on this so a reader can observe a transient status
//! written moments earlier by a background transition.
//!
//! # Example
//!
//! ```no_run
//! use ironcloud_store::{RocksStore, Store};
//! use ironcloud_core::UserId;
//!
//! let store = RocksStore::open("/tmp/ironcloud-db").unwrap();
//!
//! // List active machines for a user
//! let owner = UserId::from_bytes([0u8; 32]);
//! let machines = store.list_active_by_owner(&owner).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;
pub use types::{Machine, MachineStatus, SearchFilter};

use ironcloud_core::{MachineId, MachineUid, UserId};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g., `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    /// Allocate the next machine id from the durable sequence.
    ///
    /// Allocated ids are monotonic and never reused, so `uid` collisions
    /// aside, every machine ever created has a distinct identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn allocate_machine_id(&self) -> Result<MachineId>;

    /// Insert or update a machine record, keyed by `machine_id`.
    ///
    /// This also maintains the UID and owner indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn save_machine(&self, machine: &Machine) -> Result<()>;

    /// Get a machine by internal id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_machine(&self, machine_id: &MachineId) -> Result<Option<Machine>>;

    /// Get a machine by its caller-facing UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn find_by_uid(&self, uid: &MachineUid) -> Result<Option<Machine>>;

    /// List all active machines belonging to an owner.
    ///
    /// Soft-deleted machines (`active == false`) are excluded.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_active_by_owner(&self, owner: &UserId) -> Result<Vec<Machine>>;

    /// Search an owner's machines with the given filter.
    ///
    /// The candidate set is always scoped to the owner; the filter predicates
    /// are applied on top. Soft-deleted machines are included, matching the
    /// history-query role of search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn search_machines(&self, filter: &SearchFilter, owner: &UserId) -> Result<Vec<Machine>>;

    /// Update a machine's status.
    ///
    /// This is a convenience method for transition bodies; it also bumps
    /// `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the machine doesn't exist.
    fn update_machine_status(&self, machine_id: &MachineId, status: MachineStatus) -> Result<()>;
}
