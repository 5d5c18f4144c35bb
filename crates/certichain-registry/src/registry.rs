//! # Registry Write Side
//!
//! The six state transitions. Each one is a single
//! [`AccountStore::transact()`] call; an `Err` from any check or mutation
//! inside it discards every staged write.

use certichain_core::{
    admin_address, certificate_address, issuer_address, Address, PublicKey, RegistryError,
};
use certichain_state::{AdminAccount, CertificateAccount, IssuerAccount};
use certichain_store::AccountStore;

use crate::clock::{Clock, SystemClock};
use crate::config::RegistryConfig;
use crate::guard::{self, CertificateFields};

/// The credential registry over an account store.
#[derive(Debug)]
pub struct Registry<S, C = SystemClock> {
    pub(crate) store: S,
    clock: C,
    config: RegistryConfig,
}

impl<S: AccountStore> Registry<S, SystemClock> {
    /// Create a registry with the wall clock and default configuration.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, RegistryConfig::default())
    }
}

impl<S: AccountStore, C: Clock> Registry<S, C> {
    /// Create a registry with an explicit clock and configuration.
    pub fn with_clock(store: S, clock: C, config: RegistryConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Create the admin singleton with `caller` as its authority.
    ///
    /// Fails with `AddressOccupied` once an admin exists.
    pub fn initialize_admin(&self, caller: &PublicKey) -> Result<Address, RegistryError> {
        let address = admin_address();
        let now = self.clock.now();
        self.store
            .transact(|txn| {
                txn.create_if_absent(&address, AdminAccount::new(*caller, now))
                    .map_err(RegistryError::from)
            })
            .map_err(rejected("initialize_admin"))?;
        tracing::info!(authority = %caller, %address, "admin initialized");
        Ok(address)
    }

    /// Register `caller` as an unverified issuer named `institution_name`.
    pub fn register_issuer(
        &self,
        caller: &PublicKey,
        institution_name: &str,
    ) -> Result<Address, RegistryError> {
        guard::validate_institution_name(institution_name, &self.config.limits)
            .map_err(rejected("register_issuer"))?;

        let address = issuer_address(caller);
        let issuer = IssuerAccount::new(*caller, institution_name.to_string(), self.clock.now());
        self.store
            .transact(|txn| {
                txn.create_if_absent(&address, issuer)
                    .map_err(RegistryError::from)
            })
            .map_err(rejected("register_issuer"))?;
        tracing::info!(authority = %caller, institution = institution_name, %address, "issuer registered");
        Ok(address)
    }

    /// Admin verifies the issuer owned by `issuer_authority`.
    pub fn verify_issuer(
        &self,
        caller: &PublicKey,
        issuer_authority: &PublicKey,
    ) -> Result<Address, RegistryError> {
        let address = issuer_address(issuer_authority);
        self.store
            .transact(|txn| {
                guard::authorize_admin(txn, caller)?;
                txn.atomic_update(
                    &address,
                    IssuerAccount::ensure_verifiable,
                    IssuerAccount::verify,
                )
            })
            .map_err(rejected("verify_issuer"))?;
        tracing::info!(issuer = %issuer_authority, %address, "issuer verified");
        Ok(address)
    }

    /// Admin permanently revokes the issuer owned by `issuer_authority`.
    pub fn revoke_issuer(
        &self,
        caller: &PublicKey,
        issuer_authority: &PublicKey,
    ) -> Result<Address, RegistryError> {
        let address = issuer_address(issuer_authority);
        self.store
            .transact(|txn| {
                guard::authorize_admin(txn, caller)?;
                txn.atomic_update(
                    &address,
                    IssuerAccount::ensure_revocable,
                    IssuerAccount::revoke,
                )
            })
            .map_err(rejected("revoke_issuer"))?;
        tracing::info!(issuer = %issuer_authority, %address, "issuer revoked");
        Ok(address)
    }

    /// Mint a certificate as the issuer owned by `caller`.
    ///
    /// The certificate creation and the issuer's counter bump commit
    /// together; a duplicate id or a counter overflow leaves both untouched.
    pub fn issue_certificate(
        &self,
        caller: &PublicKey,
        student_name: &str,
        course_name: &str,
        certificate_hash: &str,
        certificate_id: &str,
    ) -> Result<Address, RegistryError> {
        let fields = CertificateFields {
            student_name,
            course_name,
            certificate_hash,
            certificate_id,
        };
        guard::validate_certificate_fields(&fields, &self.config.limits)
            .map_err(rejected("issue_certificate"))?;

        let address = certificate_address(caller, certificate_id);
        let reward = self.config.reputation_per_certificate;
        let certificate = CertificateAccount::new(
            *caller,
            student_name.to_string(),
            course_name.to_string(),
            certificate_hash.to_string(),
            certificate_id.to_string(),
            self.clock.now(),
        );

        let issuer = self
            .store
            .transact(|txn| {
                let (issuer_addr, issuer) = guard::authorize_issuer(txn, caller)?;
                issuer.ensure_can_issue()?;
                txn.create_if_absent(&address, certificate)?;
                txn.atomic_update(
                    &issuer_addr,
                    IssuerAccount::ensure_can_issue,
                    |issuer: &mut IssuerAccount| issuer.record_issuance(reward),
                )?;
                txn.read::<IssuerAccount>(&issuer_addr)
                    .map_err(RegistryError::from)
            })
            .map_err(rejected("issue_certificate"))?;

        tracing::info!(
            issuer = %caller,
            institution = %issuer.institution_name,
            certificate_id,
            %address,
            certificates_issued = issuer.certificates_issued,
            reputation_score = issuer.reputation_score,
            "certificate issued"
        );
        Ok(address)
    }

    /// Revoke the certificate at `certificate`, as the issuer that minted it.
    pub fn revoke_certificate(
        &self,
        caller: &PublicKey,
        certificate: &Address,
    ) -> Result<Address, RegistryError> {
        let revoked = self
            .store
            .transact(|txn| {
                guard::authorize_certificate_issuer(txn, caller, certificate)?;
                txn.atomic_update(
                    certificate,
                    CertificateAccount::ensure_revocable,
                    CertificateAccount::revoke,
                )?;
                txn.read::<CertificateAccount>(certificate)
                    .map_err(RegistryError::from)
            })
            .map_err(rejected("revoke_certificate"))?;
        tracing::info!(
            issuer = %caller,
            certificate_id = %revoked.certificate_id,
            address = %certificate,
            "certificate revoked"
        );
        Ok(*certificate)
    }
}

/// Log a rejected operation and pass the error through.
fn rejected(operation: &'static str) -> impl Fn(RegistryError) -> RegistryError {
    move |err| {
        tracing::debug!(
            operation,
            code = err.code(),
            category = %err.category(),
            error = %err,
            "operation rejected"
        );
        err
    }
}
