//! Machine lifecycle orchestrator for ironcloud.
//!
//! This crate provides the core business logic for driving simulated machines
//! through their operational states. It coordinates the state machine, the
//! transition guard, and the simulated provisioning delay over the storage
//! layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Request Layer (external)                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  MachineControlService                      │
//! │  ┌─────────────┐ ┌──────────────┐ ┌─────────────────────┐  │
//! │  │  Lifecycle  │ │  Transition  │ │  Delay Simulation   │  │
//! │  │State Machine│ │    Guard     │ │  (detached tasks)   │  │
//! │  └─────────────┘ └──────────────┘ └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//!                       ┌──────────┐
//!                       │  Store   │
//!                       │ (RocksDB)│
//!                       └──────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use ironcloud_control::{CreateMachineRequest, MachineControl, MachineControlService};
//! use ironcloud_core::UserId;
//! use ironcloud_store::RocksStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(RocksStore::open("/tmp/ironcloud")?);
//! let control = MachineControlService::with_defaults(store);
//!
//! let user = UserId::from_bytes([0u8; 32]);
//! let machine = control
//!     .create_machine(&user, CreateMachineRequest::named("web-1"))
//!     .await?;
//!
//! // Acceptance, not completion: the transition runs in the background
//! let accepted = control.start_machine(&machine.uid, &user).await?;
//! assert!(accepted);
//! # Ok(())
//! # }
//! ```
//!
//! # State Machine
//!
//! - `Stopped` → `Starting` → `Running` (start)
//! - `Running` → `Stopping` → `Stopped` (stop)
//! - restart chains both sequences under one guard acquisition
//! - destroy is permitted only from `Stopped` and soft-deletes the record
//!
//! See the [`lifecycle`] module for the transition table and the [`guard`]
//! module for the admission semantics, including the crash-recovery
//! limitations.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod service;
pub mod timing;
pub mod types;

pub use error::{ControlError, Result};
pub use guard::TransitionGuard;
pub use service::{MachineControl, MachineControlService};
pub use timing::{FixedTimer, RandomTimer, TransitionTimer};
pub use types::{CreateMachineRequest, MachineView};

// Re-export commonly used types from dependencies for convenience
pub use ironcloud_core::{MachineId, MachineUid, UserId};
pub use ironcloud_store::{Machine, MachineStatus, SearchFilter};
