//! Core types and utilities for ironcloud.
//!
//! This crate provides the foundational types used throughout the ironcloud
//! service:
//!
//! - **Identifiers**: Strongly-typed IDs for machines and users, with
//!   [`IdError`] covering the ways their textual forms fail to parse
//!
//! # Example
//!
//! ```
//! use ironcloud_core::{MachineId, MachineUid, UserId};
//!
//! // Parse a user ID from hex
//! let user_id = UserId::from_hex(
//!     "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
//! ).unwrap();
//!
//! // Machine IDs are allocated by the store as a sequence
//! let machine_id = MachineId::new(42);
//! assert_eq!(machine_id.to_string(), "42");
//!
//! // Generate a caller-facing machine UID
//! let uid = MachineUid::generate();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ids;

pub use ids::{IdError, MachineId, MachineUid, UserId};
