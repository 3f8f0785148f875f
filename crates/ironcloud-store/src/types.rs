//! Domain types stored in the database.
//!
//! These types represent the persisted state of machines and the filter
//! shape accepted by the search query.

use chrono::{DateTime, NaiveDate, Utc};
use ironcloud_core::{MachineId, MachineUid, UserId};
use serde::{Deserialize, Serialize};

/// A machine record stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Internal identifier, allocated by the store at creation. Immutable.
    pub machine_id: MachineId,
    /// Caller-facing random identifier used for lifecycle operations. Immutable.
    pub uid: MachineUid,
    /// Human-readable name. Defaulted to `"Machine <id>"` when omitted at creation.
    pub name: String,
    /// Current lifecycle status.
    pub status: MachineStatus,
    /// Soft-delete flag. `false` means logically destroyed; the record is retained.
    pub active: bool,
    /// Owner of the machine. Ownership is exclusive.
    pub created_by: UserId,
    /// Creation timestamp. Set once, immutable.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle statuses for a machine.
///
/// `Starting` and `Stopping` are transient statuses written while a
/// transition is simulating its provisioning delay; `Stopped` and `Running`
/// are the resting statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MachineStatus {
    /// Machine is powered off. The only status a machine can be destroyed from.
    Stopped = 1,
    /// Start in progress, simulated provisioning delay running.
    Starting = 2,
    /// Machine is up.
    Running = 3,
    /// Stop in progress.
    Stopping = 4,
}

impl MachineStatus {
    /// Convert the status to its numeric representation.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert a numeric value to a `MachineStatus`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Stopped),
            2 => Some(Self::Starting),
            3 => Some(Self::Running),
            4 => Some(Self::Stopping),
            _ => None,
        }
    }
}

/// Filter shape for the machine search query.
///
/// All predicates are optional and combined with AND. The date range is only
/// applied when both bounds are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilter {
    /// Case-insensitive substring match against the machine name.
    #[serde(default)]
    pub name: Option<String>,
    /// Match machines whose status is any of the listed statuses.
    #[serde(default)]
    pub statuses: Option<Vec<MachineStatus>>,
    /// Inclusive lower bound on the creation date.
    #[serde(default)]
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date.
    #[serde(default)]
    pub created_to: Option<NaiveDate>,
}

impl SearchFilter {
    /// Check whether a machine satisfies every predicate in this filter.
    ///
    /// Owner scoping is not part of the filter; callers restrict the
    /// candidate set to the requesting user's machines first.
    #[must_use]
    pub fn matches(&self, machine: &Machine) -> bool {
        if let Some(name) = &self.name {
            let needle = name.to_lowercase();
            if !machine.name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        if let (Some(from), Some(to)) = (self.created_from, self.created_to) {
            let created = machine.created_at.date_naive();
            if created < from || created > to {
                return false;
            }
        }

        if let Some(statuses) = &self.statuses {
            if !statuses.is_empty() && !statuses.contains(&machine.status) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn machine(name: &str, status: MachineStatus) -> Machine {
        Machine {
            machine_id: MachineId::new(1),
            uid: MachineUid::generate(),
            name: name.to_string(),
            status,
            active: true,
            created_by: UserId::from_bytes([1u8; 32]),
            created_at: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn status_numeric_roundtrip() {
        for status in [
            MachineStatus::Stopped,
            MachineStatus::Starting,
            MachineStatus::Running,
            MachineStatus::Stopping,
        ] {
            assert_eq!(MachineStatus::from_u8(status.as_u8()), Some(status));
        }
        assert_eq!(MachineStatus::from_u8(0), None);
        assert_eq!(MachineStatus::from_u8(5), None);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = SearchFilter::default();
        assert!(filter.matches(&machine("web-1", MachineStatus::Stopped)));
    }

    #[test]
    fn name_filter_is_case_insensitive_substring() {
        let filter = SearchFilter {
            name: Some("WEB".to_string()),
            ..SearchFilter::default()
        };
        assert!(filter.matches(&machine("my-web-server", MachineStatus::Stopped)));
        assert!(!filter.matches(&machine("database", MachineStatus::Stopped)));
    }

    #[test]
    fn date_range_requires_both_bounds() {
        let half_open = SearchFilter {
            created_from: Some(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()),
            ..SearchFilter::default()
        };
        // Only one bound present, range predicate is skipped
        assert!(half_open.matches(&machine("m", MachineStatus::Stopped)));

        let closed = SearchFilter {
            created_from: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
            created_to: Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()),
            ..SearchFilter::default()
        };
        assert!(closed.matches(&machine("m", MachineStatus::Stopped)));

        let outside = SearchFilter {
            created_from: Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            created_to: Some(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()),
            ..SearchFilter::default()
        };
        assert!(!outside.matches(&machine("m", MachineStatus::Stopped)));
    }

    #[test]
    fn status_filter_matches_any_of() {
        let filter = SearchFilter {
            statuses: Some(vec![MachineStatus::Running, MachineStatus::Starting]),
            ..SearchFilter::default()
        };
        assert!(filter.matches(&machine("m", MachineStatus::Running)));
        assert!(filter.matches(&machine("m", MachineStatus::Starting)));
        assert!(!filter.matches(&machine("m", MachineStatus::Stopped)));
    }

    #[test]
    fn empty_status_list_matches_everything() {
        let filter = SearchFilter {
            statuses: Some(vec![]),
            ..SearchFilter::default()
        };
        assert!(filter.matches(&machine("m", MachineStatus::Stopping)));
    }
}
