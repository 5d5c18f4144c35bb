//! # certichain-registry: The Registry State Machine
//!
//! Decides who may act, when, and what becomes permanently true once an
//! action succeeds. Every write entry point follows the same shape:
//!
//! 1. **Validate** input well-formedness (`guard::validate_*`). Nothing is
//!    read from the store until the input is known to be well formed.
//! 2. **Authorize** the caller against the record that confers authority
//!    (`guard::authorize_*`).
//! 3. **Check state** preconditions on the target record.
//! 4. **Apply** every creation and mutation inside one
//!    [`AccountStore::transact()`](certichain_store::AccountStore::transact)
//!    call, so the store commits all of it or none of it.
//!
//! Steps 2–4 run inside the same transaction, so the state that was
//! checked is the state that gets mutated.
//!
//! ## Operations
//!
//! | Operation | Authority | Effect |
//! |---|---|---|
//! | `initialize_admin` | anyone, once | create Admin |
//! | `register_issuer` | the caller, for itself | create Issuer |
//! | `verify_issuer` | admin | `is_verified = true` |
//! | `revoke_issuer` | admin | `is_verified = false`, `is_revoked = true` |
//! | `issue_certificate` | the verified issuer | create Certificate, bump issuer counters |
//! | `revoke_certificate` | the minting issuer | `is_revoked = true` |
//!
//! Read-side queries (`query.rs`) need no authority.

pub mod clock;
pub mod config;
pub mod guard;
pub mod query;
pub mod registry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{FieldLimits, RegistryConfig};
pub use guard::CertificateFields;
pub use query::VerificationReport;
pub use registry::Registry;
