//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use ironcloud_core::{MachineId, MachineUid, UserId};
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf, meta};
use crate::types::{Machine, MachineStatus, SearchFilter};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    // Last allocated machine id; persisted to the meta column family on
    // every allocation so the sequence survives restarts.
    id_seq: Mutex<u64>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::<MultiThreaded>::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let cf_meta = db
            .cf_handle(cf::META)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {}", cf::META)))?;
        let last_id = db
            .get_cf(&cf_meta, meta::MACHINE_ID_SEQ)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_or(0, |bytes| {
                let mut arr = [0u8; 8];
                if bytes.len() == 8 {
                    arr.copy_from_slice(&bytes);
                }
                u64::from_be_bytes(arr)
            });
        drop(cf_meta);

        tracing::debug!(last_id, "opened machine database");

        Ok(Self {
            db: Arc::new(db),
            id_seq: Mutex::new(last_id),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Scan the owner index and load every machine record it references.
    fn load_machines_by_owner(&self, owner: &UserId) -> Result<Vec<Machine>> {
        let cf_by_owner = self.cf(cf::MACHINES_BY_OWNER)?;
        let prefix = keys::owner_prefix(owner);

        let mut machines = Vec::new();
        let iter = self.db.iterator_cf(
            &cf_by_owner,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stop if we're past the prefix
            if !key.starts_with(&prefix) {
                break;
            }

            let machine_id = keys::extract_machine_id_from_owner_key(&key);
            if let Some(machine) = self.get_machine(&machine_id)? {
                machines.push(machine);
            }
        }

        Ok(machines)
    }
}

impl Store for RocksStore {
    fn allocate_machine_id(&self) -> Result<MachineId> {
        let cf_meta = self.cf(cf::META)?;

        let mut seq = self.id_seq.lock();
        let next = *seq + 1;
        self.db
            .put_cf(&cf_meta, meta::MACHINE_ID_SEQ, next.to_be_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?;
        *seq = next;

        Ok(MachineId::new(next))
    }

    fn save_machine(&self, machine: &Machine) -> Result<()> {
        let cf_machines = self.cf(cf::MACHINES)?;
        let cf_by_uid = self.cf(cf::MACHINES_BY_UID)?;
        let cf_by_owner = self.cf(cf::MACHINES_BY_OWNER)?;

        let machine_key = keys::machine_key(&machine.machine_id);
        let uid_key = keys::uid_key(&machine.uid);
        let owner_key = keys::owner_machine_key(&machine.created_by, &machine.machine_id);
        let value = Self::serialize(machine)?;

        // uid and owner are immutable, so the index puts are idempotent
        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_machines, &machine_key, &value);
        batch.put_cf(&cf_by_uid, &uid_key, &machine_key);
        batch.put_cf(&cf_by_owner, &owner_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_machine(&self, machine_id: &MachineId) -> Result<Option<Machine>> {
        let cf = self.cf(cf::MACHINES)?;
        let key = keys::machine_key(machine_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn find_by_uid(&self, uid: &MachineUid) -> Result<Option<Machine>> {
        let cf_by_uid = self.cf(cf::MACHINES_BY_UID)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf_by_uid, keys::uid_key(uid))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut arr = [0u8; 8];
        if id_bytes.len() != 8 {
            return Err(StoreError::Database(format!(
                "corrupt uid index entry for {uid}"
            )));
        }
        arr.copy_from_slice(&id_bytes);

        self.get_machine(&MachineId::from_be_bytes(arr))
    }

    fn list_active_by_owner(&self, owner: &UserId) -> Result<Vec<Machine>> {
        let mut machines = self.load_machines_by_owner(owner)?;
        machines.retain(|m| m.active);
        Ok(machines)
    }

    fn search_machines(&self, filter: &SearchFilter, owner: &UserId) -> Result<Vec<Machine>> {
        let mut machines = self.load_machines_by_owner(owner)?;
        machines.retain(|m| filter.matches(m));
        Ok(machines)
    }

    fn update_machine_status(&self, machine_id: &MachineId, status: MachineStatus) -> Result<()> {
        let mut machine = self.get_machine(machine_id)?.ok_or(StoreError::NotFound)?;
        machine.status = status;
        machine.updated_at = chrono::Utc::now();
        self.save_machine(&machine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn new_machine(store: &RocksStore, owner: &UserId, name: &str) -> Machine {
        let machine_id = store.allocate_machine_id().unwrap();
        let now = Utc::now();
        let machine = Machine {
            machine_id,
            uid: MachineUid::generate(),
            name: name.to_string(),
            status: MachineStatus::Stopped,
            active: true,
            created_by: *owner,
            created_at: now,
            updated_at: now,
        };
        store.save_machine(&machine).unwrap();
        machine
    }

    #[test]
    fn save_and_get_roundtrip() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);

        let machine = new_machine(&store, &owner, "web-1");
        let loaded = store.get_machine(&machine.machine_id).unwrap().unwrap();

        assert_eq!(loaded.machine_id, machine.machine_id);
        assert_eq!(loaded.uid, machine.uid);
        assert_eq!(loaded.name, "web-1");
        assert_eq!(loaded.status, MachineStatus::Stopped);
        assert!(loaded.active);
    }

    #[test]
    fn find_by_uid_resolves_internal_id() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);

        let machine = new_machine(&store, &owner, "web-1");
        let loaded = store.find_by_uid(&machine.uid).unwrap().unwrap();
        assert_eq!(loaded.machine_id, machine.machine_id);

        let missing = store.find_by_uid(&MachineUid::generate()).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn allocate_is_monotonic() {
        let (store, _dir) = setup();
        let id1 = store.allocate_machine_id().unwrap();
        let id2 = store.allocate_machine_id().unwrap();
        let id3 = store.allocate_machine_id().unwrap();
        assert!(id1 < id2);
        assert!(id2 < id3);
    }

    #[test]
    fn sequence_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let before = {
            let store = RocksStore::open(dir.path()).unwrap();
            store.allocate_machine_id().unwrap();
            store.allocate_machine_id().unwrap()
        };

        let store = RocksStore::open(dir.path()).unwrap();
        let after = store.allocate_machine_id().unwrap();
        assert!(after > before);
    }

    #[test]
    fn list_active_excludes_destroyed_and_other_owners() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);
        let other = UserId::from_bytes([2u8; 32]);

        let kept = new_machine(&store, &owner, "kept");
        let mut destroyed = new_machine(&store, &owner, "destroyed");
        new_machine(&store, &other, "theirs");

        destroyed.active = false;
        store.save_machine(&destroyed).unwrap();

        let machines = store.list_active_by_owner(&owner).unwrap();
        assert_eq!(machines.len(), 1);
        assert_eq!(machines[0].machine_id, kept.machine_id);
    }

    #[test]
    fn search_scopes_to_owner_and_applies_filter() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);
        let other = UserId::from_bytes([2u8; 32]);

        new_machine(&store, &owner, "web-frontend");
        new_machine(&store, &owner, "database");
        new_machine(&store, &other, "web-other");

        let filter = SearchFilter {
            name: Some("web".to_string()),
            ..SearchFilter::default()
        };
        let results = store.search_machines(&filter, &owner).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "web-frontend");
    }

    #[test]
    fn search_includes_destroyed_machines() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);

        let mut machine = new_machine(&store, &owner, "gone");
        machine.active = false;
        store.save_machine(&machine).unwrap();

        let results = store
            .search_machines(&SearchFilter::default(), &owner)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].active);
    }

    #[test]
    fn update_status_bumps_updated_at() {
        let (store, _dir) = setup();
        let owner = UserId::from_bytes([1u8; 32]);

        let machine = new_machine(&store, &owner, "m");
        store
            .update_machine_status(&machine.machine_id, MachineStatus::Starting)
            .unwrap();

        let loaded = store.get_machine(&machine.machine_id).unwrap().unwrap();
        assert_eq!(loaded.status, MachineStatus::Starting);
        assert!(loaded.updated_at >= machine.updated_at);
        // created_at is immutable
        assert_eq!(loaded.created_at, machine.created_at);
    }

    #[test]
    fn update_status_missing_machine() {
        let (store, _dir) = setup();
        let result = store.update_machine_status(&MachineId::new(999), MachineStatus::Running);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }
}
