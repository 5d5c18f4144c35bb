//! # certichain-state: Registry Records and Their Lifecycles
//!
//! Defines the three record kinds the registry stores and the transitions
//! each one permits. Transitions are methods that check the record's own
//! state and return a `RegistryError` instead of mutating when the
//! precondition does not hold. They know nothing about callers or storage;
//! authorization and atomicity live in `certichain-registry`.
//!
//! ## Records
//!
//! - **Admin** (`admin.rs`): created once, never mutated.
//!
//! - **Issuer** (`issuer.rs`):
//!
//! ```text
//! Pending ──verify──▶ Verified
//!    │                   │
//!    └──────revoke───────┴──▶ Revoked (terminal)
//! ```
//!
//!   plus the issuance counters, bumped with checked arithmetic.
//!
//! - **Certificate** (`certificate.rs`): `Active ──revoke──▶ Revoked`.
//!
//! ## Storage envelope
//!
//! [`Record`] is the tagged union an account store persists; [`AccountRecord`]
//! lets stores hand out typed views of it.

pub mod admin;
pub mod certificate;
pub mod issuer;
pub mod record;

pub use admin::AdminAccount;
pub use certificate::{CertificateAccount, CertificateStatus};
pub use issuer::{IssuerAccount, IssuerStatus};
pub use record::{AccountRecord, Record};

/// Byte-length limits on record string fields.
pub mod limits {
    /// Maximum institution name length.
    pub const MAX_INSTITUTION_NAME_LEN: usize = 64;
    /// Maximum student name length.
    pub const MAX_STUDENT_NAME_LEN: usize = 64;
    /// Maximum course name length.
    pub const MAX_COURSE_NAME_LEN: usize = 128;
    /// Maximum certificate hash length (SHA-256 hex is 64 chars).
    pub const MAX_CERTIFICATE_HASH_LEN: usize = 64;
    /// Maximum certificate id length.
    pub const MAX_CERTIFICATE_ID_LEN: usize = 64;
    /// Reputation awarded to an issuer per certificate issued.
    pub const REPUTATION_PER_CERTIFICATE: u64 = 10;
}
