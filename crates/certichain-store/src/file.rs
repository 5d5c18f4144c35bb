//! # JSON File Store
//!
//! Persists the full record map as one JSON snapshot:
//!
//! ```json
//! { "version": 1, "records": { "<address hex>": { "kind": "issuer", ... } } }
//! ```
//!
//! Each commit writes the next snapshot to `<path>.tmp` and renames it over
//! `<path>`, so a reader never sees a half-written file.
//!
//! Every transaction holds an exclusive lock on the sidecar `<path>.lock`
//! and reloads the snapshot under it, so handles in different processes
//! see each other's commits and never overwrite them. Reads take the same
//! lock shared. The in-memory map is a cache of the last snapshot seen.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use certichain_core::{Address, StoreError};
use certichain_state::Record;

use crate::txn::StoreTxn;
use crate::AccountStore;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    records: BTreeMap<Address, Record>,
}

/// Account store backed by a JSON snapshot file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
    records: RwLock<BTreeMap<Address, Record>>,
}

/// `<path><suffix>`, keeping the original extension.
fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let store = Self {
            lock_path: sidecar(&path, ".lock"),
            path,
            records: RwLock::new(BTreeMap::new()),
        };
        let records = {
            let _lock = store.lock(false)?;
            store.load()?
        };
        tracing::debug!(path = %store.path.display(), records = records.len(), "opened store");
        *store.records.write() = records;
        Ok(store)
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock the sidecar file. The lock is released when the handle drops.
    fn lock(&self, exclusive: bool) -> Result<File, StoreError> {
        if let Some(parent) = self.lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;
        if exclusive {
            FileExt::lock_exclusive(&file)?;
        } else {
            FileExt::lock_shared(&file)?;
        }
        Ok(file)
    }

    /// Read the snapshot from disk. Callers hold the sidecar lock.
    fn load(&self) -> Result<BTreeMap<Address, Record>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = std::fs::read(&self.path)?;
        let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedSnapshot {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot.records)
    }

    /// Reload the cache from disk under a shared lock.
    fn refresh(&self) -> Result<(), StoreError> {
        let records = {
            let _lock = self.lock(false)?;
            self.load()?
        };
        *self.records.write() = records;
        Ok(())
    }

    fn persist(&self, records: &BTreeMap<Address, Record>) -> Result<(), StoreError> {
        #[derive(Serialize)]
        struct SnapshotRef<'a> {
            version: u32,
            records: &'a BTreeMap<Address, Record>,
        }

        let bytes = serde_json::to_vec_pretty(&SnapshotRef {
            version: SNAPSHOT_VERSION,
            records,
        })?;
        let tmp = sidecar(&self.path, ".tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl AccountStore for FileStore {
    fn transact<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreTxn<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut records = self.records.write();
        let _lock = self.lock(true)?;
        *records = self.load()?;

        let (result, writes) = {
            let mut txn = StoreTxn::new(&records);
            let result = op(&mut txn);
            (result, txn.into_writes())
        };
        let value = result?;
        if writes.is_empty() {
            return Ok(value);
        }

        let mut next = records.clone();
        let count = writes.len();
        next.extend(writes);
        if let Err(e) = self.persist(&next) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to persist snapshot; transaction rolled back");
            return Err(E::from(e));
        }
        *records = next;
        tracing::debug!(path = %self.path.display(), writes = count, "committed transaction");
        Ok(value)
    }

    fn get(&self, address: &Address) -> Result<Option<Record>, StoreError> {
        self.refresh()?;
        Ok(self.records.read().get(address).cloned())
    }

    fn records(&self) -> Result<Vec<(Address, Record)>, StoreError> {
        self.refresh()?;
        Ok(self
            .records
            .read()
            .iter()
            .map(|(address, record)| (*address, record.clone()))
            .collect())
    }
}
