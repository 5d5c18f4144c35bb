//! # Issuer Record
//!
//! An institution allowed, once verified, to mint certificates.
//!
//! ## Invariants
//!
//! - `is_revoked` never returns to `false`.
//! - A persisted issuer never has both `is_verified` and `is_revoked` set:
//!   revocation clears verification, and verification of a revoked issuer
//!   is rejected.
//! - `certificates_issued` and `reputation_score` only grow, and grow
//!   together: [`IssuerAccount::record_issuance()`] either bumps both or
//!   neither.

use serde::{Deserialize, Serialize};

use certichain_core::{PublicKey, RegistryError, Timestamp};

/// Lifecycle state of an issuer, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssuerStatus {
    /// Registered, awaiting admin verification.
    Pending,
    /// Verified by the admin; may issue.
    Verified,
    /// Revoked by the admin (terminal).
    Revoked,
}

impl IssuerStatus {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl std::fmt::Display for IssuerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Revoked => "REVOKED",
        };
        f.write_str(s)
    }
}

/// Issuer record stored at `issuer_address(authority)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerAccount {
    /// Key that owns this issuer profile.
    pub authority: PublicKey,
    /// Human-readable institution name.
    pub institution_name: String,
    /// Set by the admin to unlock issuance.
    pub is_verified: bool,
    /// Set by the admin to permanently block issuance.
    pub is_revoked: bool,
    /// Running count of certificates issued.
    pub certificates_issued: u64,
    /// Reputation, awarded per certificate issued.
    pub reputation_score: u64,
    /// When the issuer registered.
    pub registered_at: Timestamp,
}

impl IssuerAccount {
    /// Create a fresh, unverified issuer.
    pub fn new(authority: PublicKey, institution_name: String, registered_at: Timestamp) -> Self {
        Self {
            authority,
            institution_name,
            is_verified: false,
            is_revoked: false,
            certificates_issued: 0,
            reputation_score: 0,
            registered_at,
        }
    }

    /// Current lifecycle state.
    pub fn status(&self) -> IssuerStatus {
        if self.is_revoked {
            IssuerStatus::Revoked
        } else if self.is_verified {
            IssuerStatus::Verified
        } else {
            IssuerStatus::Pending
        }
    }

    /// Whether this issuer may currently mint certificates.
    pub fn can_issue(&self) -> bool {
        self.is_verified && !self.is_revoked
    }

    /// Reject any caller other than this issuer's authority.
    pub fn require_authority(&self, caller: &PublicKey) -> Result<(), RegistryError> {
        if &self.authority != caller {
            return Err(RegistryError::UnauthorizedIssuer);
        }
        Ok(())
    }

    /// Reject issuance unless the issuer is verified and not revoked.
    ///
    /// Revocation is checked first: a revoked issuer also has
    /// `is_verified == false`, and must report `IssuerRevoked`.
    pub fn ensure_can_issue(&self) -> Result<(), RegistryError> {
        if self.is_revoked {
            return Err(RegistryError::IssuerRevoked);
        }
        if !self.is_verified {
            return Err(RegistryError::IssuerNotVerified);
        }
        Ok(())
    }

    /// Check that [`verify()`](Self::verify) would succeed.
    pub fn ensure_verifiable(&self) -> Result<(), RegistryError> {
        if self.is_revoked {
            return Err(RegistryError::IssuerRevoked);
        }
        if self.is_verified {
            return Err(RegistryError::IssuerAlreadyVerified);
        }
        Ok(())
    }

    /// Mark the issuer verified (PENDING → VERIFIED).
    pub fn verify(&mut self) -> Result<(), RegistryError> {
        self.ensure_verifiable()?;
        self.is_verified = true;
        Ok(())
    }

    /// Check that [`revoke()`](Self::revoke) would succeed.
    pub fn ensure_revocable(&self) -> Result<(), RegistryError> {
        if self.is_revoked {
            return Err(RegistryError::IssuerRevoked);
        }
        Ok(())
    }

    /// Revoke the issuer permanently (PENDING | VERIFIED → REVOKED).
    pub fn revoke(&mut self) -> Result<(), RegistryError> {
        self.ensure_revocable()?;
        self.is_verified = false;
        self.is_revoked = true;
        Ok(())
    }

    /// Count one issuance and award `reward` reputation.
    ///
    /// Both sums are computed before either field is written, so an
    /// overflow on either counter leaves the record untouched.
    pub fn record_issuance(&mut self, reward: u64) -> Result<(), RegistryError> {
        let issued = self
            .certificates_issued
            .checked_add(1)
            .ok_or(RegistryError::Overflow {
                counter: "certificates_issued",
            })?;
        let score = self
            .reputation_score
            .checked_add(reward)
            .ok_or(RegistryError::Overflow {
                counter: "reputation_score",
            })?;
        self.certificates_issued = issued;
        self.reputation_score = score;
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// After n successful issuances the counters are exactly (n, reward*n).
        #[test]
        fn counters_track_issuances(n in 0u64..500, reward in 0u64..1_000) {
            let mut issuer = IssuerAccount::new(
                PublicKey::from_bytes([4; 32]),
                "Prop U".to_string(),
                Timestamp::now(),
            );
            issuer.verify().unwrap();
            for _ in 0..n {
                issuer.record_issuance(reward).unwrap();
            }
            prop_assert_eq!(issuer.certificates_issued, n);
            prop_assert_eq!(issuer.reputation_score, reward * n);
        }

        /// A failed issuance never moves either counter.
        #[test]
        fn overflow_is_all_or_nothing(issued in any::<u64>(), score in any::<u64>(), reward in any::<u64>()) {
            let mut issuer = IssuerAccount::new(
                PublicKey::from_bytes([5; 32]),
                "Prop U".to_string(),
                Timestamp::now(),
            );
            issuer.certificates_issued = issued;
            issuer.reputation_score = score;
            let before = issuer.clone();
            match issuer.record_issuance(reward) {
                Ok(()) => {
                    prop_assert_eq!(issuer.certificates_issued, issued + 1);
                    prop_assert_eq!(issuer.reputation_score, score + reward);
                }
                Err(_) => prop_assert_eq!(issuer, before),
            }
        }
    }
}
