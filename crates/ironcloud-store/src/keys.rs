//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions to encode and decode keys for the machine
//! record and its indexes. All keys are designed to support efficient prefix
//! scans.

use ironcloud_core::{MachineId, MachineUid, UserId};

/// Encode a machine key (the big-endian machine id bytes).
///
/// Big-endian encoding keeps iteration order aligned with the id sequence.
#[must_use]
pub fn machine_key(machine_id: &MachineId) -> Vec<u8> {
    machine_id.to_be_bytes().to_vec()
}

/// Encode a UID index key (the 16 UUID bytes).
#[must_use]
pub fn uid_key(uid: &MachineUid) -> Vec<u8> {
    uid.as_bytes().to_vec()
}

/// Encode an owner-machine index key: `user_id || machine_id`.
///
/// This allows efficient prefix scans for all machines belonging to a user.
#[must_use]
pub fn owner_machine_key(owner: &UserId, machine_id: &MachineId) -> Vec<u8> {
    let mut key = Vec::with_capacity(40);
    key.extend_from_slice(owner.as_bytes());
    key.extend_from_slice(&machine_id.to_be_bytes());
    key
}

/// Encode an owner prefix for scanning all machines by owner.
#[must_use]
pub fn owner_prefix(owner: &UserId) -> Vec<u8> {
    owner.as_bytes().to_vec()
}

/// Extract the machine id from an owner-machine key.
///
/// # Panics
///
/// Panics if the key is not at least 40 bytes.
#[must_use]
pub fn extract_machine_id_from_owner_key(key: &[u8]) -> MachineId {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[32..40]);
    MachineId::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_machine_key_roundtrip() {
        let owner = UserId::from_bytes([1u8; 32]);
        let machine_id = MachineId::new(77);

        let key = owner_machine_key(&owner, &machine_id);
        assert_eq!(key.len(), 40);

        let extracted = extract_machine_id_from_owner_key(&key);
        assert_eq!(extracted, machine_id);
    }

    #[test]
    fn prefix_scan_simulation() {
        let owner = UserId::from_bytes([1u8; 32]);
        let key1 = owner_machine_key(&owner, &MachineId::new(1));
        let key2 = owner_machine_key(&owner, &MachineId::new(2));
        let prefix = owner_prefix(&owner);

        // Both keys should start with the owner prefix and sort by id
        assert!(key1.starts_with(&prefix));
        assert!(key2.starts_with(&prefix));
        assert!(key1 < key2);
    }

    #[test]
    fn uid_key_is_raw_uuid_bytes() {
        let uid = MachineUid::generate();
        let key = uid_key(&uid);
        assert_eq!(key.len(), 16);
        assert_eq!(key, uid.as_bytes());
    }
}
