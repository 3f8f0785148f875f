//! Core identifier types for ironcloud.
//!
//! This module provides strongly-typed identifiers for machines and users.
//! Machines carry two identifiers: the internal `MachineId` assigned by the
//! store at creation, and the caller-facing random `MachineUid` used for all
//! lifecycle operations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The internal machine identifier.
///
/// Machine IDs are allocated by the store as a monotonic sequence when the
/// record is created, and are immutable afterwards. `Display` prints the bare
/// number, so a machine created without a name can be defaulted to
/// `"Machine <id>"`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(u64);

impl MachineId {
    /// Create a `MachineId` from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Return the numeric value of the identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Return the big-endian byte encoding, used as a storage key.
    #[must_use]
    pub const fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode a `MachineId` from its big-endian byte encoding.
    #[must_use]
    pub const fn from_be_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Debug for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineId({})", self.0)
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MachineId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self).map_err(|_| IdError::InvalidNumber)
    }
}

impl From<u64> for MachineId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The caller-facing machine identifier, a random UUID v4.
///
/// UIDs are generated at machine creation, immutable afterwards, and are the
/// only identifier callers use for lifecycle operations. The internal
/// [`MachineId`] never leaves the service.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MachineUid(uuid::Uuid);

impl MachineUid {
    /// Create a `MachineUid` from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random `MachineUid`.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Return the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Return the bytes of the UUID.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl FromStr for MachineUid {
    type Err = IdError;

    /// Parse a `MachineUid` from a UUID string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let uuid = uuid::Uuid::parse_str(s).map_err(|_| IdError::InvalidUuid)?;
        Ok(Self(uuid))
    }
}

impl fmt::Debug for MachineUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MachineUid({})", self.0)
    }
}

impl fmt::Display for MachineUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MachineUid {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MachineUid> for String {
    fn from(uid: MachineUid) -> Self {
        uid.0.to_string()
    }
}

impl AsRef<[u8]> for MachineUid {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// A 32-byte user identifier, hex-encoded for display.
///
/// User IDs are resolved by the request layer from the authenticated caller
/// and passed through as an opaque handle; the orchestrator trusts them
/// without re-validating credentials.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId([u8; 32]);

impl UserId {
    /// Create a new `UserId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a `UserId` from a hex-encoded string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not exactly 64 characters.
    pub fn from_hex(s: &str) -> Result<Self, IdError> {
        let bytes = hex::decode(s).map_err(|_| IdError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| IdError::InvalidLength {
            expected: 32,
            got: s.len() / 2,
        })?;
        Ok(Self(arr))
    }

    /// Return the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Return the hex-encoded string representation.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.to_hex())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for UserId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.to_hex()
    }
}

impl AsRef<[u8]> for UserId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    /// The input string contains invalid hexadecimal characters.
    #[error("invalid hex encoding")]
    InvalidHex,

    /// The input has an incorrect length.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// The expected number of bytes.
        expected: usize,
        /// The actual number of bytes.
        got: usize,
    },

    /// The input is not a valid UUID.
    #[error("invalid UUID format")]
    InvalidUuid,

    /// The input is not a valid numeric identifier.
    #[error("invalid numeric identifier")]
    InvalidNumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_id_display_is_bare_number() {
        let id = MachineId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(format!("{id:?}"), "MachineId(42)");
    }

    #[test]
    fn machine_id_byte_roundtrip() {
        let id = MachineId::new(0x0102_0304_0506_0708);
        let bytes = id.to_be_bytes();
        assert_eq!(MachineId::from_be_bytes(bytes), id);
    }

    #[test]
    fn machine_id_ordering_follows_sequence() {
        assert!(MachineId::new(1) < MachineId::new(2));
        // Big-endian keys sort the same way as the numeric sequence
        assert!(MachineId::new(255).to_be_bytes() < MachineId::new(256).to_be_bytes());
    }

    #[test]
    fn machine_id_parse() {
        let id: MachineId = "17".parse().unwrap();
        assert_eq!(id, MachineId::new(17));
        assert!(matches!(
            "not-a-number".parse::<MachineId>(),
            Err(IdError::InvalidNumber)
        ));
    }

    #[test]
    fn machine_uid_roundtrip() {
        let uid = MachineUid::generate();
        let parsed: MachineUid = uid.to_string().parse().unwrap();
        assert_eq!(uid, parsed);
    }

    #[test]
    fn machine_uid_unique() {
        let uid1 = MachineUid::generate();
        let uid2 = MachineUid::generate();
        assert_ne!(uid1, uid2);
    }

    #[test]
    fn machine_uid_invalid() {
        let result = "not-a-uuid".parse::<MachineUid>();
        assert!(matches!(result, Err(IdError::InvalidUuid)));
    }

    #[test]
    fn user_id_roundtrip() {
        let bytes = [0x42u8; 32];
        let id = UserId::from_bytes(bytes);
        let hex = id.to_hex();
        let parsed = UserId::from_hex(&hex).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn user_id_invalid_hex() {
        let result = UserId::from_hex("not-valid-hex");
        assert!(matches!(result, Err(IdError::InvalidHex)));
    }

    #[test]
    fn user_id_wrong_length() {
        let result = UserId::from_hex("deadbeef");
        assert!(matches!(result, Err(IdError::InvalidLength { .. })));
    }
}
