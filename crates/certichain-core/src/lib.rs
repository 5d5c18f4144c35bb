//! # certichain-core: Foundational Types for CertiChain
//!
//! This crate is the leaf of the CertiChain workspace. It defines the
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Addresses are derived, never assigned.** Every record lives at an
//!    [`Address`] computed from its kind and identifying seeds by
//!    [`derive_address()`]. Existence of a record at an address is the
//!    existence test for the entity itself, so there is no lookup index.
//!
//! 2. **Caller identity is an opaque key.** [`PublicKey`] is compared by
//!    equality only. Authorization is a direct equality check against a
//!    field on the target record; there are no roles.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is UTC with seconds precision.
//!
//! 4. **One error taxonomy.** [`RegistryError`] carries a stable code and an
//!    [`ErrorCategory`] for every rejection the registry can produce.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `certichain-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

pub use address::{
    admin_address, certificate_address, derive_address, issuer_address, Address, RecordKind,
};
pub use digest::{certificate_content_hash, CertificateContent};
pub use error::{ErrorCategory, RegistryError, StoreError};
pub use identity::{CertificateId, PublicKey};
pub use temporal::{Timestamp, TimestampError};

/// Decode a lowercase or uppercase hex string into bytes.
pub(crate) fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .ok_or_else(|| format!("invalid hex at position {i}"))
                .and_then(|pair| {
                    u8::from_str_radix(pair, 16)
                        .map_err(|e| format!("invalid hex at position {i}: {e}"))
                })
        })
        .collect()
}

/// Render bytes as a lowercase hex string.
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
