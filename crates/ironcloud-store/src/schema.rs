//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary machine records, keyed by big-endian `machine_id`.
    pub const MACHINES: &str = "machines";

    /// Index: machine UID to internal id, keyed by the 16 UID bytes.
    pub const MACHINES_BY_UID: &str = "machines_by_uid";

    /// Index: machines by owner, keyed by `user_id || machine_id`.
    pub const MACHINES_BY_OWNER: &str = "machines_by_owner";

    /// Store metadata, such as the machine id sequence.
    pub const META: &str = "meta";
}

/// Metadata keys stored in the `meta` column family.
pub mod meta {
    /// The last allocated machine id, stored as big-endian u64.
    pub const MACHINE_ID_SEQ: &[u8] = b"machine_id_seq";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::MACHINES,
        cf::MACHINES_BY_UID,
        cf::MACHINES_BY_OWNER,
        cf::META,
    ]
}
