//! In-memory account store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use certichain_core::{Address, StoreError};
use certichain_state::Record;

use crate::txn::StoreTxn;
use crate::AccountStore;

/// Account store held entirely in memory.
///
/// Transactions take the write lock for their whole duration, which is what
/// serializes racing operations on the same address.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<Address, Record>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl AccountStore for MemoryStore {
    fn transact<T, E, F>(&self, op: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreTxn<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut records = self.records.write();
        let (result, writes) = {
            let mut txn = StoreTxn::new(&records);
            let result = op(&mut txn);
            (result, txn.into_writes())
        };
        let value = result?;
        tracing::debug!(writes = writes.len(), "committed transaction");
        records.extend(writes);
        Ok(value)
    }

    fn get(&self, address: &Address) -> Result<Option<Record>, StoreError> {
        Ok(self.records.read().get(address).cloned())
    }

    fn records(&self) -> Result<Vec<(Address, Record)>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .map(|(address, record)| (*address, record.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certichain_core::{admin_address, issuer_address, PublicKey, Timestamp};
    use certichain_state::{AdminAccount, IssuerAccount};

    fn key(b: u8) -> PublicKey {
        PublicKey::from_bytes([b; 32])
    }

    #[test]
    fn test_create_then_read() {
        let store = MemoryStore::new();
        store
            .create_if_absent(&admin_address(), AdminAccount::new(key(1), Timestamp::now()))
            .unwrap();
        let admin: AdminAccount = store.read(&admin_address()).unwrap();
        assert_eq!(admin.authority, key(1));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_if_absent_twice() {
        let store = MemoryStore::new();
        store
            .create_if_absent(&admin_address(), AdminAccount::new(key(1), Timestamp::now()))
            .unwrap();
        let err = store
            .create_if_absent(&admin_address(), AdminAccount::new(key(2), Timestamp::now()))
            .unwrap_err();
        assert!(matches!(err, StoreError::AddressOccupied { .. }));
        let admin: AdminAccount = store.read(&admin_address()).unwrap();
        assert_eq!(admin.authority, key(1));
    }

    #[test]
    fn test_failed_transaction_commits_nothing() {
        let store = MemoryStore::new();
        let result: Result<(), StoreError> = store.transact(|txn| {
            txn.create_if_absent(&admin_address(), AdminAccount::new(key(1), Timestamp::now()))?;
            txn.create_if_absent(&admin_address(), AdminAccount::new(key(1), Timestamp::now()))
        });
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_atomic_update_precondition_blocks_write() {
        let store = MemoryStore::new();
        let addr = issuer_address(&key(2));
        store
            .create_if_absent(&addr, IssuerAccount::new(key(2), "U".to_string(), Timestamp::now()))
            .unwrap();
        let result: Result<(), StoreError> = store.atomic_update(
            &addr,
            |issuer: &IssuerAccount| {
                if issuer.is_verified {
                    Ok(())
                } else {
                    Err(StoreError::NotFound {
                        kind: certichain_core::RecordKind::Issuer,
                        address: addr,
                    })
                }
            },
            |issuer| {
                issuer.reputation_score = 99;
                Ok(())
            },
        );
        assert!(result.is_err());
        let issuer: IssuerAccount = store.read(&addr).unwrap();
        assert_eq!(issuer.reputation_score, 0);
    }

    #[test]
    fn test_concurrent_creates_one_winner() {
        let store = MemoryStore::new();
        let wins = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8u8)
                .map(|i| {
                    let store = &store;
                    s.spawn(move || {
                        store
                            .create_if_absent(
                                &admin_address(),
                                AdminAccount::new(key(i), Timestamp::now()),
                            )
                            .is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|won| *won)
                .count()
        });
        assert_eq!(wins, 1);
        assert_eq!(store.len(), 1);
    }
}
