//! # certichain-store: Account Stores
//!
//! The registry never writes records directly. It hands a closure to
//! [`AccountStore::transact()`], which gives the closure a [`StoreTxn`]:
//! a staged view over the current records. Reads see earlier staged writes;
//! writes are applied only if the closure returns `Ok`. The store serializes
//! transactions, so two closures racing on the same address observe each
//! other's committed effects and never a half-applied one.
//!
//! ## Backends
//!
//! - [`MemoryStore`] (`memory.rs`): `parking_lot::RwLock` over a map.
//!   Transactions hold the write lock for their whole duration.
//! - [`FileStore`] (`file.rs`): a JSON snapshot rewritten via
//!   temp-file-and-rename on every commit. Transactions lock a sidecar file
//!   and reload the snapshot first, so they serialize across processes too.

pub mod file;
pub mod memory;
pub mod txn;

use certichain_core::{Address, StoreError};
use certichain_state::{AccountRecord, Record};

pub use file::FileStore;
pub use memory::MemoryStore;
pub use txn::StoreTxn;

/// Keyed record storage with all-or-nothing transactions.
pub trait AccountStore: Send + Sync {
    /// Run `op` as one atomic unit of work.
    ///
    /// Every write `op` stages through the [`StoreTxn`] takes effect iff
    /// `op` returns `Ok`. Concurrent calls are serialized.
    fn transact<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreTxn<'_>) -> Result<T, E>,
        E: From<StoreError>;

    /// Fetch the committed record at `address`, if any.
    fn get(&self, address: &Address) -> Result<Option<Record>, StoreError>;

    /// Snapshot of every committed record.
    fn records(&self) -> Result<Vec<(Address, Record)>, StoreError>;

    /// Fetch the committed record at `address` as a `T`.
    fn read<T: AccountRecord>(&self, address: &Address) -> Result<T, StoreError> {
        let record = self.get(address)?.ok_or(StoreError::NotFound {
            kind: T::KIND,
            address: *address,
        })?;
        T::view(&record).cloned().ok_or(StoreError::KindMismatch {
            address: *address,
            expected: T::KIND,
            found: record.kind(),
        })
    }

    /// Create `value` at `address` unless a record already lives there.
    fn create_if_absent<T: AccountRecord>(&self, address: &Address, value: T) -> Result<(), StoreError> {
        self.transact(|txn| txn.create_if_absent(address, value))
    }

    /// Check `precondition` and apply `mutation` to the `T` at `address`
    /// as one atomic step.
    fn atomic_update<T, E, P, M>(&self, address: &Address, precondition: P, mutation: M) -> Result<(), E>
    where
        T: AccountRecord,
        E: From<StoreError>,
        P: FnOnce(&T) -> Result<(), E>,
        M: FnOnce(&mut T) -> Result<(), E>,
    {
        self.transact(|txn| txn.atomic_update(address, precondition, mutation))
    }
}
