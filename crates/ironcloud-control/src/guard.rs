//! Admission control for in-flight machine transitions.
//!
//! The guard is a process-local set of machine identifiers currently
//! undergoing a state change. `try_acquire` is the single admission gate: a
//! request that loses the race is dropped silently as an already-accepted
//! duplicate, never queued or retried.
//!
//! The set is in-memory only and resets on process restart. A crash while a
//! transition is in flight loses the guard entry, and the store may be left
//! showing a transient status with no job to reconcile it; there is no
//! recovery mechanism for such machines.

use std::collections::HashSet;

use ironcloud_core::MachineId;
use parking_lot::Mutex;

/// A set of machines currently mid-transition.
///
/// Exactly one caller may hold a given identifier at a time; acquisition is
/// atomic under concurrent attempts from independent requests.
#[derive(Debug, Default)]
pub struct TransitionGuard {
    in_flight: Mutex<HashSet<MachineId>>,
}

impl TransitionGuard {
    /// Create a new empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the right to drive a transition for a machine.
    ///
    /// Returns true if the claim succeeded, false if another transition is
    /// already in flight for the same identifier.
    #[must_use]
    pub fn try_acquire(&self, machine_id: MachineId) -> bool {
        self.in_flight.lock().insert(machine_id)
    }

    /// Release a machine's guard entry unconditionally.
    ///
    /// Called once the transition sequence fully completes, including both
    /// legs of a restart.
    pub fn release(&self, machine_id: MachineId) {
        self.in_flight.lock().remove(&machine_id);
    }

    /// Check whether a transition is currently in flight for a machine.
    #[must_use]
    pub fn is_held(&self, machine_id: MachineId) -> bool {
        self.in_flight.lock().contains(&machine_id)
    }

    /// Get the number of in-flight transitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Check if no transitions are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.in_flight.lock().is_empty()
    }
}
