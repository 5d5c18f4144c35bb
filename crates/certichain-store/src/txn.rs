//! # Staged Transaction
//!
//! A [`StoreTxn`] overlays staged writes on a borrowed view of the committed
//! records. Nothing it does is visible outside the transaction until the
//! owning store commits it.

use std::collections::BTreeMap;

use certichain_core::{Address, StoreError};
use certichain_state::{AccountRecord, Record};

/// Staged view over committed records.
pub struct StoreTxn<'a> {
    committed: &'a BTreeMap<Address, Record>,
    staged: BTreeMap<Address, Record>,
}

impl<'a> StoreTxn<'a> {
    pub(crate) fn new(committed: &'a BTreeMap<Address, Record>) -> Self {
        Self {
            committed,
            staged: BTreeMap::new(),
        }
    }

    pub(crate) fn into_writes(self) -> BTreeMap<Address, Record> {
        self.staged
    }

    /// The record at `address` as this transaction sees it.
    pub fn get(&self, address: &Address) -> Option<&Record> {
        self.staged
            .get(address)
            .or_else(|| self.committed.get(address))
    }

    /// Whether any record lives at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Read the `T` at `address`.
    pub fn read<T: AccountRecord>(&self, address: &Address) -> Result<T, StoreError> {
        let record = self.get(address).ok_or(StoreError::NotFound {
            kind: T::KIND,
            address: *address,
        })?;
        T::view(record).cloned().ok_or(StoreError::KindMismatch {
            address: *address,
            expected: T::KIND,
            found: record.kind(),
        })
    }

    /// Stage creation of `value` at `address`.
    ///
    /// Fails with `AddressOccupied` if any record, of any kind, is already
    /// there.
    pub fn create_if_absent<T: AccountRecord>(
        &mut self,
        address: &Address,
        value: T,
    ) -> Result<(), StoreError> {
        if self.contains(address) {
            return Err(StoreError::AddressOccupied {
                kind: T::KIND,
                address: *address,
            });
        }
        self.staged.insert(*address, value.into_record());
        Ok(())
    }

    /// Stage an update of the `T` at `address`.
    ///
    /// `precondition` sees the current value; `mutation` edits a copy. The
    /// copy is staged only if both succeed.
    pub fn atomic_update<T, E, P, M>(
        &mut self,
        address: &Address,
        precondition: P,
        mutation: M,
    ) -> Result<(), E>
    where
        T: AccountRecord,
        E: From<StoreError>,
        P: FnOnce(&T) -> Result<(), E>,
        M: FnOnce(&mut T) -> Result<(), E>,
    {
        let mut value: T = self.read(address)?;
        precondition(&value)?;
        mutation(&mut value)?;
        self.staged.insert(*address, value.into_record());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certichain_core::{admin_address, issuer_address, PublicKey, RecordKind, Timestamp};
    use certichain_state::{AdminAccount, IssuerAccount};

    fn key(b: u8) -> PublicKey {
        PublicKey::from_bytes([b; 32])
    }

    #[test]
    fn test_staged_writes_visible_inside_txn() {
        let committed = BTreeMap::new();
        let mut txn = StoreTxn::new(&committed);
        let addr = admin_address();
        txn.create_if_absent(&addr, AdminAccount::new(key(1), Timestamp::now()))
            .unwrap();
        assert!(txn.contains(&addr));
        assert_eq!(txn.read::<AdminAccount>(&addr).unwrap().authority, key(1));
    }

    #[test]
    fn test_create_if_absent_rejects_staged_duplicate() {
        let committed = BTreeMap::new();
        let mut txn = StoreTxn::new(&committed);
        let addr = admin_address();
        txn.create_if_absent(&addr, AdminAccount::new(key(1), Timestamp::now()))
            .unwrap();
        let err = txn
            .create_if_absent(&addr, AdminAccount::new(key(2), Timestamp::now()))
            .unwrap_err();
        assert!(matches!(err, StoreError::AddressOccupied { .. }));
    }

    #[test]
    fn test_read_wrong_kind() {
        let mut committed = BTreeMap::new();
        let addr = admin_address();
        committed.insert(addr, AdminAccount::new(key(1), Timestamp::now()).into_record());
        let txn = StoreTxn::new(&committed);
        let err = txn.read::<IssuerAccount>(&addr).unwrap_err();
        assert!(matches!(
            err,
            StoreError::KindMismatch {
                expected: RecordKind::Issuer,
                found: RecordKind::Admin,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_mutation_stages_nothing() {
        let mut committed = BTreeMap::new();
        let addr = issuer_address(&key(3));
        committed.insert(
            addr,
            IssuerAccount::new(key(3), "U".to_string(), Timestamp::now()).into_record(),
        );
        let mut txn = StoreTxn::new(&committed);
        let result: Result<(), StoreError> = txn.atomic_update(
            &addr,
            |_: &IssuerAccount| Ok(()),
            |issuer| {
                issuer.is_verified = true;
                Err(StoreError::NotFound {
                    kind: RecordKind::Issuer,
                    address: addr,
                })
            },
        );
        assert!(result.is_err());
        assert!(txn.into_writes().is_empty());
    }

    #[test]
    fn test_missing_record_not_found() {
        let committed = BTreeMap::new();
        let txn = StoreTxn::new(&committed);
        let err = txn.read::<AdminAccount>(&admin_address()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: RecordKind::Admin, .. }));
    }
}
