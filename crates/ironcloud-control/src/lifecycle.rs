//! Machine lifecycle state machine.
//!
//! This module defines the valid status transitions for machines and the
//! association between a resting target status and the transient status
//! written while the simulated provisioning delay runs.
//!
//! # State Machine
//!
//! ```text
//!                 (start)
//!   ┌─────────┐          ┌──────────┐
//!   │ Stopped │─────────▶│ Starting │
//!   └─────────┘          └────┬─────┘
//!        ▲                    │ (delay elapsed)
//!        │                    ▼
//!   ┌────┴─────┐         ┌─────────┐
//!   │ Stopping │◀────────│ Running │
//!   └──────────┘ (stop)  └─────────┘
//!
//!   restart: Running → Stopping → Stopped → Starting → Running,
//!            both legs under a single guard acquisition
//!   destroy: Stopped only; flips `active` to false, status unchanged
//! ```
//!
//! Creation always yields `Stopped`.

use ironcloud_store::MachineStatus;

/// Check if a status transition is valid according to the state machine.
#[must_use]
pub const fn is_valid_transition(from: MachineStatus, to: MachineStatus) -> bool {
    use MachineStatus::{Running, Starting, Stopped, Stopping};

    matches!(
        (from, to),
        (Stopped, Starting) | (Starting, Running) | (Running, Stopping) | (Stopping, Stopped)
    )
}

/// Returns the transient status written before committing the given resting
/// target status, if the transition uses one.
///
/// A start (targeting `Running`) passes through `Starting`; a stop (targeting
/// `Stopped`) passes through `Stopping`.
#[must_use]
pub const fn transient_status(target: MachineStatus) -> Option<MachineStatus> {
    match target {
        MachineStatus::Running => Some(MachineStatus::Starting),
        MachineStatus::Stopped => Some(MachineStatus::Stopping),
        MachineStatus::Starting | MachineStatus::Stopping => None,
    }
}

/// Returns the resting status a machine must currently hold for a transition
/// to the given target to be admitted.
#[must_use]
pub const fn required_status(target: MachineStatus) -> Option<MachineStatus> {
    match target {
        MachineStatus::Running => Some(MachineStatus::Stopped),
        MachineStatus::Stopped => Some(MachineStatus::Running),
        MachineStatus::Starting | MachineStatus::Stopping => None,
    }
}

/// Returns true if a machine in the given status may be destroyed.
///
/// Destruction is only permitted from `Stopped`.
#[must_use]
pub const fn can_destroy(status: MachineStatus) -> bool {
    matches!(status, MachineStatus::Stopped)
}
