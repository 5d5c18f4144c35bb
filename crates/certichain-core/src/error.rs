//! # Error Types: Categorized Registry Errors
//!
//! Defines the error types used throughout CertiChain. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! Errors are categorized, not typed per call site. Every [`RegistryError`]
//! variant belongs to exactly one [`ErrorCategory`] and exposes a stable
//! identifier through [`RegistryError::code()`] so that presentation layers
//! can render precise messages and tests can assert exact failure kinds.
//!
//! - **Validation**: malformed or out-of-bound input, raised before any
//!   record is read.
//! - **Authorization**: caller is not the authority the operation requires.
//! - **State**: the target record is in the wrong lifecycle state.
//! - **Integrity**: the operation would corrupt an invariant (counter
//!   overflow, address collision, record of the wrong kind).
//! - **NotFound**: no record exists at the derived address.
//! - **Storage**: the backing store failed to load or persist.

use thiserror::Error;

use crate::address::{Address, RecordKind};

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Input failed well-formedness checks.
    Validation,
    /// Caller identity does not match the required authority.
    Authorization,
    /// Target record state violates the operation's precondition.
    State,
    /// The operation would break a ledger invariant.
    Integrity,
    /// The addressed record does not exist.
    NotFound,
    /// The backing store failed.
    Storage,
}

impl ErrorCategory {
    /// Returns the category identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authorization => "authorization",
            Self::State => "state",
            Self::Integrity => "integrity",
            Self::NotFound => "not_found",
            Self::Storage => "storage",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every registry operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    // ── Validation ───────────────────────────────────────────────────
    /// Institution name is empty.
    #[error("institution name cannot be empty")]
    EmptyInstitutionName,

    /// Institution name exceeds its byte limit.
    #[error("institution name is {len} bytes, maximum is {max}")]
    InstitutionNameTooLong {
        /// Actual byte length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// Student name exceeds its byte limit.
    #[error("student name is {len} bytes, maximum is {max}")]
    StudentNameTooLong {
        /// Actual byte length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// Course name exceeds its byte limit.
    #[error("course name is {len} bytes, maximum is {max}")]
    CourseNameTooLong {
        /// Actual byte length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// Certificate hash exceeds its byte limit.
    #[error("certificate hash is {len} bytes, maximum is {max}")]
    CertificateHashTooLong {
        /// Actual byte length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// Certificate id exceeds its byte limit.
    #[error("certificate id is {len} bytes, maximum is {max}")]
    CertificateIdTooLong {
        /// Actual byte length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// A required certificate field is empty.
    #[error("required field `{field}` cannot be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    // ── Authorization ────────────────────────────────────────────────
    /// Caller is not the admin authority.
    #[error("unauthorized: not the admin authority")]
    UnauthorizedAdmin,

    /// Caller is not the authority of the issuer that owns the target.
    #[error("unauthorized: not the issuer authority")]
    UnauthorizedIssuer,

    // ── State ────────────────────────────────────────────────────────
    /// Issuer has not been verified by the admin.
    #[error("issuer is not verified by admin")]
    IssuerNotVerified,

    /// Issuer has been revoked.
    #[error("issuer has been revoked")]
    IssuerRevoked,

    /// Issuer is already verified.
    #[error("issuer is already verified")]
    IssuerAlreadyVerified,

    /// Certificate has already been revoked.
    #[error("certificate has already been revoked")]
    CertificateAlreadyRevoked,

    // ── Integrity ────────────────────────────────────────────────────
    /// A checked counter addition would overflow.
    #[error("arithmetic overflow on {counter}")]
    Overflow {
        /// Name of the counter that would overflow.
        counter: &'static str,
    },

    /// A record already exists at the derived address.
    #[error("{kind} address {address} is already occupied")]
    AddressOccupied {
        /// Kind of record that was being created.
        kind: RecordKind,
        /// The occupied address.
        address: Address,
    },

    /// The record at an address is not of the expected kind.
    #[error("record at {address} is a {found}, expected a {expected}")]
    RecordKindMismatch {
        /// The address that was read.
        address: Address,
        /// Kind the caller expected.
        expected: RecordKind,
        /// Kind actually stored.
        found: RecordKind,
    },

    // ── NotFound ─────────────────────────────────────────────────────
    /// No record exists at the derived address.
    #[error("{kind} not found at {address}")]
    NotFound {
        /// Kind of record that was looked up.
        kind: RecordKind,
        /// The derived address.
        address: Address,
    },

    // ── Storage ──────────────────────────────────────────────────────
    /// The backing store failed to load or persist state.
    #[error("storage error: {0}")]
    Storage(String),
}

impl RegistryError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInstitutionName
            | Self::InstitutionNameTooLong { .. }
            | Self::StudentNameTooLong { .. }
            | Self::CourseNameTooLong { .. }
            | Self::CertificateHashTooLong { .. }
            | Self::CertificateIdTooLong { .. }
            | Self::EmptyField { .. } => ErrorCategory::Validation,
            Self::UnauthorizedAdmin | Self::UnauthorizedIssuer => ErrorCategory::Authorization,
            Self::IssuerNotVerified
            | Self::IssuerRevoked
            | Self::IssuerAlreadyVerified
            | Self::CertificateAlreadyRevoked => ErrorCategory::State,
            Self::Overflow { .. }
            | Self::AddressOccupied { .. }
            | Self::RecordKindMismatch { .. } => ErrorCategory::Integrity,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Storage(_) => ErrorCategory::Storage,
        }
    }

    /// Stable machine-readable identifier for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInstitutionName => "EmptyInstitutionName",
            Self::InstitutionNameTooLong { .. } => "InstitutionNameTooLong",
            Self::StudentNameTooLong { .. } => "StudentNameTooLong",
            Self::CourseNameTooLong { .. } => "CourseNameTooLong",
            Self::CertificateHashTooLong { .. } => "CertificateHashTooLong",
            Self::CertificateIdTooLong { .. } => "CertificateIdTooLong",
            Self::EmptyField { .. } => "EmptyField",
            Self::UnauthorizedAdmin => "UnauthorizedAdmin",
            Self::UnauthorizedIssuer => "UnauthorizedIssuer",
            Self::IssuerNotVerified => "IssuerNotVerified",
            Self::IssuerRevoked => "IssuerRevoked",
            Self::IssuerAlreadyVerified => "IssuerAlreadyVerified",
            Self::CertificateAlreadyRevoked => "CertificateAlreadyRevoked",
            Self::Overflow { .. } => "Overflow",
            Self::AddressOccupied { .. } => "AddressOccupied",
            Self::RecordKindMismatch { .. } => "RecordKindMismatch",
            Self::NotFound { .. } => "NotFound",
            Self::Storage(_) => "Storage",
        }
    }
}

/// Error raised by an account store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Creation targeted an address that already holds a record.
    #[error("{kind} address {address} is already occupied")]
    AddressOccupied {
        /// Kind of record being created.
        kind: RecordKind,
        /// The occupied address.
        address: Address,
    },

    /// No record exists at the address.
    #[error("{kind} not found at {address}")]
    NotFound {
        /// Kind of record requested.
        kind: RecordKind,
        /// The requested address.
        address: Address,
    },

    /// The stored record is of a different kind than requested.
    #[error("record at {address} is a {found}, expected a {expected}")]
    KindMismatch {
        /// The address that was read.
        address: Address,
        /// Kind requested.
        expected: RecordKind,
        /// Kind found.
        found: RecordKind,
    },

    /// Filesystem failure in a persistent store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure in a persistent store.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot was written in a format this build does not read.
    #[error("unsupported snapshot version {found}, expected {supported}")]
    UnsupportedSnapshot {
        /// Version recorded in the file.
        found: u32,
        /// Version this build writes.
        supported: u32,
    },
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AddressOccupied { kind, address } => Self::AddressOccupied { kind, address },
            StoreError::NotFound { kind, address } => Self::NotFound { kind, address },
            StoreError::KindMismatch {
                address,
                expected,
                found,
            } => Self::RecordKindMismatch {
                address,
                expected,
                found,
            },
            other @ (StoreError::Io(_)
            | StoreError::Serialization(_)
            | StoreError::UnsupportedSnapshot { .. }) => {
                Self::Storage(other.to_string())
            }
        }
    }
}
