//! # Certificate Record
//!
//! A credential minted by an issuer. Everything but `is_revoked` is fixed
//! at creation, and `is_revoked` only moves from `false` to `true`.

use serde::{Deserialize, Serialize};

use certichain_core::{PublicKey, RegistryError, Timestamp};

use crate::issuer::IssuerAccount;

/// Trust verdict for a certificate, combining its own flag with the state
/// of the issuer that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateStatus {
    /// Certificate active and its issuer verified.
    Valid,
    /// Certificate revoked by its issuer.
    Revoked,
    /// Certificate active but its issuer is not (or no longer) verified.
    IssuerUnverified,
    /// Certificate active but its issuer has been revoked.
    IssuerRevoked,
}

impl CertificateStatus {
    /// Whether a verifier should trust the certificate.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Valid => "VALID",
            Self::Revoked => "REVOKED",
            Self::IssuerUnverified => "ISSUER_UNVERIFIED",
            Self::IssuerRevoked => "ISSUER_REVOKED",
        };
        f.write_str(s)
    }
}

/// Certificate record stored at `certificate_address(issuer, certificate_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateAccount {
    /// Authority key of the issuer that minted this certificate.
    pub issuer: PublicKey,
    /// Recipient name.
    pub student_name: String,
    /// Course or credential name.
    pub course_name: String,
    /// Commitment to the off-ledger certificate content.
    pub certificate_hash: String,
    /// Issuer-scoped identifier.
    pub certificate_id: String,
    /// When the certificate was issued.
    pub issued_at: Timestamp,
    /// Whether the issuer has revoked this certificate.
    pub is_revoked: bool,
}

impl CertificateAccount {
    /// Mint a new, unrevoked certificate.
    pub fn new(
        issuer: PublicKey,
        student_name: String,
        course_name: String,
        certificate_hash: String,
        certificate_id: String,
        issued_at: Timestamp,
    ) -> Self {
        Self {
            issuer,
            student_name,
            course_name,
            certificate_hash,
            certificate_id,
            issued_at,
            is_revoked: false,
        }
    }

    /// Reject any caller other than the minting issuer's authority.
    pub fn require_issuer(&self, caller: &PublicKey) -> Result<(), RegistryError> {
        if &self.issuer != caller {
            return Err(RegistryError::UnauthorizedIssuer);
        }
        Ok(())
    }

    /// Check that [`revoke()`](Self::revoke) would succeed.
    pub fn ensure_revocable(&self) -> Result<(), RegistryError> {
        if self.is_revoked {
            return Err(RegistryError::CertificateAlreadyRevoked);
        }
        Ok(())
    }

    /// Revoke the certificate (ACTIVE → REVOKED).
    pub fn revoke(&mut self) -> Result<(), RegistryError> {
        self.ensure_revocable()?;
        self.is_revoked = true;
        Ok(())
    }

    /// Trust verdict given the current state of the minting issuer.
    pub fn status_under(&self, issuer: &IssuerAccount) -> CertificateStatus {
        if self.is_revoked {
            CertificateStatus::Revoked
        } else if issuer.is_revoked {
            CertificateStatus::IssuerRevoked
        } else if !issuer.is_verified {
            CertificateStatus::IssuerUnverified
        } else {
            CertificateStatus::Valid
        }
    }
}
