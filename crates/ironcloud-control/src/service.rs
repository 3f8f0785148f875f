//! Machine lifecycle orchestrator implementation.
//!
//! This module provides the `MachineControl` trait and the
//! `MachineControlService` implementation that drives machines through their
//! operational states.
//!
//! Mutating lifecycle operations follow one contract: `Ok(true)` means the
//! request was accepted (for start/stop/restart this is acceptance of
//! background work, not its completion), `Ok(false)` means it was rejected by
//! a precondition, and `Err` is an unexpected storage failure. A request that
//! arrives while a transition is already in flight for the same machine is
//! treated as a duplicate and accepted as a no-op.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ironcloud_core::{MachineId, MachineUid, UserId};
use ironcloud_store::{Machine, MachineStatus, SearchFilter, Store};

use crate::error::Result;
use crate::guard::TransitionGuard;
use crate::lifecycle;
use crate::timing::{RandomTimer, TransitionTimer};
use crate::types::CreateMachineRequest;

/// Trait defining the orchestrator operations.
#[async_trait]
pub trait MachineControl: Send + Sync {
    /// Create a new machine for the given user.
    ///
    /// Always succeeds. The machine starts `Stopped` and active, with a fresh
    /// UID; when no name is supplied it is renamed to `"Machine <id>"` once
    /// the identifier is known.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn create_machine(&self, user: &UserId, request: CreateMachineRequest)
        -> Result<Machine>;

    /// Start a stopped machine.
    ///
    /// On acceptance, a background task drives `Stopped → Starting → Running`
    /// over a randomized simulated delay.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn start_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool>;

    /// Stop a running machine.
    ///
    /// On acceptance, a background task drives `Running → Stopping → Stopped`.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn stop_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool>;

    /// Restart a running machine.
    ///
    /// On acceptance, a background task drives
    /// `Running → Stopping → Stopped → Starting → Running` under a single
    /// guard acquisition, splitting one randomized total duration in half
    /// between the two legs.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn restart_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool>;

    /// Destroy a stopped machine.
    ///
    /// Synchronous: sets the soft-delete flag and leaves the status
    /// unchanged. A destroyed machine accepts no further lifecycle
    /// operations.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn destroy_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool>;

    /// List the caller's active machines.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn list_active(&self, user: &UserId) -> Result<Vec<Machine>>;

    /// Search the caller's machines.
    ///
    /// # Errors
    ///
    /// Returns an error if a storage operation fails.
    async fn search_machines(&self, filter: &SearchFilter, user: &UserId)
        -> Result<Vec<Machine>>;
}

/// The machine lifecycle orchestrator.
pub struct MachineControlService<S: Store> {
    store: Arc<S>,
    guard: Arc<TransitionGuard>,
    timer: Arc<dyn TransitionTimer>,
}

impl<S: Store + 'static> MachineControlService<S> {
    /// Create a new orchestrator with the given duration source.
    #[must_use]
    pub fn new(store: Arc<S>, timer: Arc<dyn TransitionTimer>) -> Self {
        Self {
            store,
            guard: Arc::new(TransitionGuard::new()),
            timer,
        }
    }

    /// Create with the production duration source (10–20 second transitions).
    #[must_use]
    pub fn with_defaults(store: Arc<S>) -> Self {
        Self::new(store, Arc::new(RandomTimer::default()))
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check whether a transition is currently in flight for a machine.
    #[must_use]
    pub fn is_transitioning(&self, machine_id: MachineId) -> bool {
        self.guard.is_held(machine_id)
    }

    /// Look up a machine by UID and evaluate the ownership preconditions: it
    /// must exist, be active, and be owned by the caller.
    ///
    /// Returns `None` on any precondition miss; rejections are expected and
    /// never logged above debug.
    fn find_owned(&self, uid: &MachineUid, user: &UserId) -> Result<Option<Machine>> {
        let Some(machine) = self.store.find_by_uid(uid)? else {
            tracing::debug!(%uid, "machine not found");
            return Ok(None);
        };

        if !machine.active {
            tracing::debug!(machine_id = %machine.machine_id, "machine is destroyed");
            return Ok(None);
        }

        if machine.created_by != *user {
            tracing::debug!(machine_id = %machine.machine_id, %user, "caller is not the owner");
            return Ok(None);
        }

        Ok(Some(machine))
    }

    /// On top of [`Self::find_owned`], require the resting status a
    /// transition to `target` departs from.
    fn admit(
        &self,
        uid: &MachineUid,
        user: &UserId,
        target: MachineStatus,
    ) -> Result<Option<Machine>> {
        let Some(wanted) = lifecycle::required_status(target) else {
            return Ok(None);
        };

        let Some(machine) = self.find_owned(uid, user)? else {
            return Ok(None);
        };

        if machine.status != wanted {
            tracing::debug!(
                machine_id = %machine.machine_id,
                status = ?machine.status,
                wanted = ?wanted,
                "machine is not in the required status"
            );
            return Ok(None);
        }

        Ok(Some(machine))
    }

    /// Admit and schedule a single transition to the given resting target.
    ///
    /// A guard miss means another transition is already in flight; the
    /// request is dropped as an accepted duplicate, never queued.
    fn begin_transition(&self, machine_id: MachineId, target: MachineStatus) {
        if !self.guard.try_acquire(machine_id) {
            tracing::debug!(%machine_id, "transition already in flight, dropping duplicate");
            return;
        }

        let store = Arc::clone(&self.store);
        let guard = Arc::clone(&self.guard);
        let duration = self.timer.transition_duration();

        tokio::spawn(async move {
            if let Err(e) = drive_to(store.as_ref(), machine_id, target, duration).await {
                // The guard entry is deliberately left in place: the machine
                // is stranded mid-transition and further transitions stay
                // blocked rather than racing a half-applied sequence.
                tracing::error!(%machine_id, error = %e, "transition failed mid-sequence");
                return;
            }
            guard.release(machine_id);
        });
    }

    /// Admit and schedule a restart: a stop leg then a start leg under one
    /// guard acquisition, each waiting half of one randomized total duration.
    fn begin_restart(&self, machine_id: MachineId) {
        if !self.guard.try_acquire(machine_id) {
            tracing::debug!(%machine_id, "transition already in flight, dropping duplicate");
            return;
        }

        let store = Arc::clone(&self.store);
        let guard = Arc::clone(&self.guard);
        let half = self.timer.transition_duration() / 2;

        tokio::spawn(async move {
            let legs = [MachineStatus::Stopped, MachineStatus::Running];
            for target in legs {
                if let Err(e) = drive_to(store.as_ref(), machine_id, target, half).await {
                    tracing::error!(%machine_id, error = %e, "restart failed mid-sequence");
                    return;
                }
            }
            guard.release(machine_id);
        });
    }
}

/// One transition leg: write the transient status immediately, wait out the
/// simulated delay, then commit the resting target status.
///
/// Both writes are persisted individually, so a concurrent reader may observe
/// the transient status.
async fn drive_to<S: Store + ?Sized>(
    store: &S,
    machine_id: MachineId,
    target: MachineStatus,
    duration: Duration,
) -> Result<()> {
    if let Some(transient) = lifecycle::transient_status(target) {
        store.update_machine_status(&machine_id, transient)?;
        tracing::info!(%machine_id, status = ?transient, "machine status changed");
    }

    tokio::time::sleep(duration).await;

    store.update_machine_status(&machine_id, target)?;
    tracing::info!(%machine_id, status = ?target, "machine status changed");

    Ok(())
}

#[async_trait]
impl<S: Store + 'static> MachineControl for MachineControlService<S> {
    async fn create_machine(
        &self,
        user: &UserId,
        request: CreateMachineRequest,
    ) -> Result<Machine> {
        let machine_id = self.store.allocate_machine_id()?;
        let now = Utc::now();

        let mut machine = Machine {
            machine_id,
            uid: MachineUid::generate(),
            name: request.name.clone().unwrap_or_default(),
            status: MachineStatus::Stopped,
            active: true,
            created_by: *user,
            created_at: now,
            updated_at: now,
        };
        self.store.save_machine(&machine)?;

        if request.name.is_none() {
            // Default name derived from the assigned identifier
            machine.name = format!("Machine {machine_id}");
            machine.updated_at = Utc::now();
            self.store.save_machine(&machine)?;
        }

        tracing::info!(
            %machine_id,
            uid = %machine.uid,
            owner = %user,
            name = %machine.name,
            "created machine"
        );

        Ok(machine)
    }

    async fn start_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool> {
        let Some(machine) = self.admit(uid, user, MachineStatus::Running)? else {
            return Ok(false);
        };

        tracing::info!(machine_id = %machine.machine_id, "start accepted");
        self.begin_transition(machine.machine_id, MachineStatus::Running);
        Ok(true)
    }

    async fn stop_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool> {
        let Some(machine) = self.admit(uid, user, MachineStatus::Stopped)? else {
            return Ok(false);
        };

        tracing::info!(machine_id = %machine.machine_id, "stop accepted");
        self.begin_transition(machine.machine_id, MachineStatus::Stopped);
        Ok(true)
    }

    async fn restart_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool> {
        // The stop leg runs first, so admission mirrors a plain stop.
        let Some(machine) = self.admit(uid, user, MachineStatus::Stopped)? else {
            return Ok(false);
        };

        tracing::info!(machine_id = %machine.machine_id, "restart accepted");
        self.begin_restart(machine.machine_id);
        Ok(true)
    }

    async fn destroy_machine(&self, uid: &MachineUid, user: &UserId) -> Result<bool> {
        let Some(mut machine) = self.find_owned(uid, user)? else {
            return Ok(false);
        };

        if !lifecycle::can_destroy(machine.status) {
            tracing::debug!(
                machine_id = %machine.machine_id,
                status = ?machine.status,
                "machine cannot be destroyed in this status"
            );
            return Ok(false);
        }

        machine.active = false;
        machine.updated_at = Utc::now();
        self.store.save_machine(&machine)?;

        tracing::info!(machine_id = %machine.machine_id, "destroyed machine");
        Ok(true)
    }

    async fn list_active(&self, user: &UserId) -> Result<Vec<Machine>> {
        Ok(self.store.list_active_by_owner(user)?)
    }

    async fn search_machines(
        &self,
        filter: &SearchFilter,
        user: &UserId,
    ) -> Result<Vec<Machine>> {
        Ok(self.store.search_machines(filter, user)?)
    }
}
