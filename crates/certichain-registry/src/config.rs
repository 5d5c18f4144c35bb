//! # Registry Configuration
//!
//! The defaults are the registry's contract: 64-byte names, ids and hashes,
//! 128-byte course names, and 10 reputation per certificate. A deployment
//! can state them explicitly (or tighten them) through serde.

use serde::{Deserialize, Serialize};

use certichain_state::limits;

/// Byte-length limits enforced by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLimits {
    /// Maximum institution name length.
    pub institution_name: usize,
    /// Maximum student name length.
    pub student_name: usize,
    /// Maximum course name length.
    pub course_name: usize,
    /// Maximum certificate hash length.
    pub certificate_hash: usize,
    /// Maximum certificate id length.
    pub certificate_id: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            institution_name: limits::MAX_INSTITUTION_NAME_LEN,
            student_name: limits::MAX_STUDENT_NAME_LEN,
            course_name: limits::MAX_COURSE_NAME_LEN,
            certificate_hash: limits::MAX_CERTIFICATE_HASH_LEN,
            certificate_id: limits::MAX_CERTIFICATE_ID_LEN,
        }
    }
}

/// Tunables for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Reputation awarded to an issuer per certificate issued.
    pub reputation_per_certificate: u64,
    /// Field length limits.
    pub limits: FieldLimits,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reputation_per_certificate: limits::REPUTATION_PER_CERTIFICATE,
            limits: FieldLimits::default(),
        }
    }
}
