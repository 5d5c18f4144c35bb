//! # Admin Record
//!
//! The registry administrator singleton. Its only job is to name the key
//! allowed to verify and revoke issuers.

use serde::{Deserialize, Serialize};

use certichain_core::{PublicKey, RegistryError, Timestamp};

/// The admin singleton stored at `admin_address()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    /// Key with admin privileges.
    pub authority: PublicKey,
    /// When the admin was initialized.
    pub created_at: Timestamp,
}

impl AdminAccount {
    /// Create the admin record for `authority`.
    pub fn new(authority: PublicKey, created_at: Timestamp) -> Self {
        Self {
            authority,
            created_at,
        }
    }

    /// Reject any caller other than the admin authority.
    pub fn require_authority(&self, caller: &PublicKey) -> Result<(), RegistryError> {
        if &self.authority != caller {
            return Err(RegistryError::UnauthorizedAdmin);
        }
        Ok(())
    }
}
