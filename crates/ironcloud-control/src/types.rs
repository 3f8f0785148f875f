//! Request and response types for orchestrator operations.

use chrono::{DateTime, Utc};
use ironcloud_core::{MachineUid, UserId};
use ironcloud_store::{Machine, MachineStatus};
use serde::{Deserialize, Serialize};

/// Request to create a new machine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMachineRequest {
    /// Optional display name. When omitted, the machine is renamed to
    /// `"Machine <id>"` once its identifier is known.
    #[serde(default)]
    pub name: Option<String>,
}

impl CreateMachineRequest {
    /// Create a request with no name, letting the service assign a default.
    #[must_use]
    pub const fn unnamed() -> Self {
        Self { name: None }
    }

    /// Create a request with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Caller-facing projection of a machine record.
///
/// Nothing inside the orchestrator consumes this; it is the shape the
/// external request layer serializes toward callers. The internal id and
/// soft-delete flag stay inside the service; callers see the UID they
/// address machines by.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineView {
    /// Display name.
    pub name: String,
    /// Caller-facing identifier.
    pub uid: MachineUid,
    /// Current lifecycle status.
    pub status: MachineStatus,
    /// Owner of the machine.
    pub created_by: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Machine> for MachineView {
    fn from(machine: &Machine) -> Self {
        Self {
            name: machine.name.clone(),
            uid: machine.uid,
            status: machine.status,
            created_by: machine.created_by,
            created_at: machine.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironcloud_core::MachineId;

    #[test]
    fn request_constructors() {
        assert!(CreateMachineRequest::unnamed().name.is_none());
        assert_eq!(
            CreateMachineRequest::named("web-1").name.as_deref(),
            Some("web-1")
        );
    }

    #[test]
    fn view_hides_internal_fields() {
        let machine = Machine {
            machine_id: MachineId::new(9),
            uid: MachineUid::generate(),
            name: "web-1".to_string(),
            status: MachineStatus::Stopped,
            active: true,
            created_by: UserId::from_bytes([3u8; 32]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = MachineView::from(&machine);
        assert_eq!(view.name, "web-1");
        assert_eq!(view.uid, machine.uid);
        assert_eq!(view.status, MachineStatus::Stopped);
        assert_eq!(view.created_by, machine.created_by);
    }
}
