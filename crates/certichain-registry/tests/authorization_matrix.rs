//! Authorization and guard-ordering tests.
//!
//! Every privileged operation is attempted by every wrong party. A rejected
//! call must leave the store byte-for-byte unchanged.

use certichain_core::{ErrorCategory, PublicKey, RegistryError};
use certichain_registry::Registry;
use certichain_store::{AccountStore, MemoryStore};

const ADMIN: u8 = 0x01;
const ISSUER: u8 = 0x02;
const OTHER_ISSUER: u8 = 0x03;
const STRANGER: u8 = 0x04;

fn key(b: u8) -> PublicKey {
    PublicKey::from_bytes([b; 32])
}

fn populated() -> (Registry<MemoryStore>, certichain_core::Address) {
    let reg = Registry::new(MemoryStore::new());
    reg.initialize_admin(&key(ADMIN)).unwrap();
    for b in [ISSUER, OTHER_ISSUER] {
        reg.register_issuer(&key(b), "University").unwrap();
        reg.verify_issuer(&key(ADMIN), &key(b)).unwrap();
    }
    let cert = reg
        .issue_certificate(&key(ISSUER), "Alice", "Course", "hash", "CERT-1")
        .unwrap();
    (reg, cert)
}

fn snapshot(reg: &Registry<MemoryStore>) -> String {
    serde_json::to_string(&reg.store().records().unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Admin-only operations
// ---------------------------------------------------------------------------

#[test]
fn non_admin_cannot_verify_or_revoke_issuers() {
    let (reg, _) = populated();
    reg.register_issuer(&key(0x10), "Pending U").unwrap();
    let before = snapshot(&reg);

    for caller in [ISSUER, OTHER_ISSUER, STRANGER, 0x10] {
        assert_eq!(
            reg.verify_issuer(&key(caller), &key(0x10)),
            Err(RegistryError::UnauthorizedAdmin)
        );
        assert_eq!(
            reg.revoke_issuer(&key(caller), &key(ISSUER)),
            Err(RegistryError::UnauthorizedAdmin)
        );
    }
    assert_eq!(snapshot(&reg), before);
}

#[test]
fn admin_cannot_be_reinitialized_by_anyone() {
    let (reg, _) = populated();
    let before = snapshot(&reg);
    for caller in [ADMIN, ISSUER, STRANGER] {
        let err = reg.initialize_admin(&key(caller)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Integrity);
    }
    assert_eq!(reg.get_admin().unwrap().authority, key(ADMIN));
    assert_eq!(snapshot(&reg), before);
}

// ---------------------------------------------------------------------------
// Issuer-only operations
// ---------------------------------------------------------------------------

#[test]
fn only_minting_issuer_revokes_certificate() {
    let (reg, cert) = populated();
    let before = snapshot(&reg);

    for caller in [ADMIN, OTHER_ISSUER] {
        assert_eq!(
            reg.revoke_certificate(&key(caller), &cert),
            Err(RegistryError::UnauthorizedIssuer)
        );
    }
    assert_eq!(snapshot(&reg), before);

    reg.revoke_certificate(&key(ISSUER), &cert).unwrap();
}

#[test]
fn admin_is_not_an_issuer() {
    let (reg, _) = populated();
    let err = reg
        .issue_certificate(&key(ADMIN), "Alice", "Course", "hash", "CERT-9")
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

// ---------------------------------------------------------------------------
// Guard ordering
// ---------------------------------------------------------------------------

#[test]
fn validation_precedes_authorization() {
    let (reg, _) = populated();
    // A stranger with a malformed request sees the validation error.
    assert_eq!(
        reg.issue_certificate(&key(STRANGER), "Alice", "", "hash", "CERT-2"),
        Err(RegistryError::EmptyField { field: "course_name" })
    );
}

#[test]
fn authorization_precedes_state() {
    let (reg, cert) = populated();
    reg.revoke_certificate(&key(ISSUER), &cert).unwrap();
    // Already revoked, but the wrong caller learns only that it is unauthorized.
    assert_eq!(
        reg.revoke_certificate(&key(OTHER_ISSUER), &cert),
        Err(RegistryError::UnauthorizedIssuer)
    );
    reg.revoke_issuer(&key(ADMIN), &key(OTHER_ISSUER)).unwrap();
    assert_eq!(
        reg.revoke_issuer(&key(STRANGER), &key(OTHER_ISSUER)),
        Err(RegistryError::UnauthorizedAdmin)
    );
}

#[test]
fn error_codes_are_stable() {
    let (reg, cert) = populated();
    let cases = [
        (reg.register_issuer(&key(0x20), "").unwrap_err(), "EmptyInstitutionName", ErrorCategory::Validation),
        (reg.verify_issuer(&key(STRANGER), &key(ISSUER)).unwrap_err(), "UnauthorizedAdmin", ErrorCategory::Authorization),
        (reg.revoke_certificate(&key(STRANGER), &cert).unwrap_err(), "UnauthorizedIssuer", ErrorCategory::Authorization),
        (reg.verify_issuer(&key(ADMIN), &key(ISSUER)).unwrap_err(), "IssuerAlreadyVerified", ErrorCategory::State),
    ];
    for (err, code, category) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.category(), category);
    }
}
