//! Registry state survives a reopen of the file-backed store, and separate
//! handles on one file never overwrite each other's commits.

use std::sync::Barrier;

use certichain_core::{PublicKey, RecordKind, RegistryError};
use certichain_registry::Registry;
use certichain_store::FileStore;

fn key(b: u8) -> PublicKey {
    PublicKey::from_bytes([b; 32])
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let cert = {
        let reg = Registry::new(FileStore::open(&path).unwrap());
        reg.initialize_admin(&key(1)).unwrap();
        reg.register_issuer(&key(2), "Test University").unwrap();
        reg.verify_issuer(&key(1), &key(2)).unwrap();
        reg.issue_certificate(&key(2), "Alice", "Blockchain 101", "h", "CERT-001")
            .unwrap()
    };

    let reg = Registry::new(FileStore::open(&path).unwrap());
    assert_eq!(reg.get_admin().unwrap().authority, key(1));
    let issuer = reg.get_issuer(&key(2)).unwrap();
    assert!(issuer.is_verified);
    assert_eq!((issuer.certificates_issued, issuer.reputation_score), (1, 10));
    assert_eq!(reg.get_certificate_at(&cert).unwrap().student_name, "Alice");

    // Uniqueness holds across reopen.
    assert!(matches!(
        reg.initialize_admin(&key(9)),
        Err(RegistryError::AddressOccupied { .. })
    ));
    assert!(matches!(
        reg.issue_certificate(&key(2), "Alice", "Blockchain 101", "h", "CERT-001"),
        Err(RegistryError::AddressOccupied { .. })
    ));
}

#[test]
fn rejected_operation_does_not_touch_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let reg = Registry::new(FileStore::open(&path).unwrap());
    reg.initialize_admin(&key(1)).unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    assert!(reg.verify_issuer(&key(1), &key(2)).is_err());
    assert!(reg.register_issuer(&key(2), "").is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn second_handle_sees_duplicate_certificate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let a = Registry::new(FileStore::open(&path).unwrap());
    let b = Registry::new(FileStore::open(&path).unwrap());
    a.initialize_admin(&key(1)).unwrap();
    a.register_issuer(&key(2), "Test University").unwrap();
    a.verify_issuer(&key(1), &key(2)).unwrap();

    a.issue_certificate(&key(2), "A", "Blockchain 101", "h", "SAME")
        .unwrap();
    assert!(matches!(
        b.issue_certificate(&key(2), "B", "Blockchain 101", "h", "SAME"),
        Err(RegistryError::AddressOccupied {
            kind: RecordKind::Certificate,
            ..
        })
    ));
    a.issue_certificate(&key(2), "A", "Blockchain 101", "h", "OTHER")
        .unwrap();

    let reg = Registry::new(FileStore::open(&path).unwrap());
    let issuer = reg.get_issuer(&key(2)).unwrap();
    assert_eq!((issuer.certificates_issued, issuer.reputation_score), (2, 20));
    assert_eq!(reg.list_certificates_by_issuer(&key(2)).unwrap().len(), 2);
    assert_eq!(reg.get_certificate(&key(2), "SAME").unwrap().student_name, "A");
}

#[test]
fn handles_racing_on_one_file_have_one_winner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");
    {
        let reg = Registry::new(FileStore::open(&path).unwrap());
        reg.initialize_admin(&key(1)).unwrap();
        reg.register_issuer(&key(2), "Test University").unwrap();
        reg.verify_issuer(&key(1), &key(2)).unwrap();
    }

    let handles: Vec<_> = (0..4)
        .map(|_| Registry::new(FileStore::open(&path).unwrap()))
        .collect();
    let barrier = Barrier::new(handles.len());
    let results: Vec<_> = std::thread::scope(|s| {
        let joins: Vec<_> = handles
            .iter()
            .enumerate()
            .map(|(i, reg)| {
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    let student = format!("Student {i}");
                    reg.issue_certificate(&key(2), &student, "Blockchain 101", "h", "CERT-001")
                })
            })
            .collect();
        joins.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let reg = Registry::new(FileStore::open(&path).unwrap());
    let issuer = reg.get_issuer(&key(2)).unwrap();
    assert_eq!((issuer.certificates_issued, issuer.reputation_score), (1, 10));
    assert_eq!(reg.list_certificates_by_issuer(&key(2)).unwrap().len(), 1);
}
