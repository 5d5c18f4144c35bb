//! # Read Side
//!
//! Queries over committed state. None of them require authority, and none
//! of them mutate anything.

use serde::Serialize;

use certichain_core::{
    admin_address, certificate_address, issuer_address, Address, PublicKey, RegistryError,
};
use certichain_state::{
    AdminAccount, CertificateAccount, CertificateStatus, IssuerAccount, Record,
};
use certichain_store::AccountStore;

use crate::clock::Clock;
use crate::registry::Registry;

/// A certificate together with the issuer standing it is judged under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Address of the certificate record.
    pub address: Address,
    /// The certificate as stored.
    pub certificate: CertificateAccount,
    /// The minting issuer as stored.
    pub issuer: IssuerAccount,
    /// Combined verdict.
    pub status: CertificateStatus,
}

impl VerificationReport {
    /// Whether a relying party should accept the certificate.
    pub fn is_valid(&self) -> bool {
        self.status.is_valid()
    }
}

impl<S: AccountStore, C: Clock> Registry<S, C> {
    /// The admin singleton.
    pub fn get_admin(&self) -> Result<AdminAccount, RegistryError> {
        Ok(self.store.read(&admin_address())?)
    }

    /// The issuer owned by `authority`.
    pub fn get_issuer(&self, authority: &PublicKey) -> Result<IssuerAccount, RegistryError> {
        Ok(self.store.read(&issuer_address(authority))?)
    }

    /// The certificate `certificate_id` minted by `issuer`.
    pub fn get_certificate(
        &self,
        issuer: &PublicKey,
        certificate_id: &str,
    ) -> Result<CertificateAccount, RegistryError> {
        self.get_certificate_at(&certificate_address(issuer, certificate_id))
    }

    /// The certificate stored at `address`.
    pub fn get_certificate_at(&self, address: &Address) -> Result<CertificateAccount, RegistryError> {
        Ok(self.store.read(address)?)
    }

    /// Every registered issuer, ordered by address.
    pub fn list_issuers(&self) -> Result<Vec<(Address, IssuerAccount)>, RegistryError> {
        Ok(self
            .store
            .records()?
            .into_iter()
            .filter_map(|(address, record)| match record {
                Record::Issuer(issuer) => Some((address, issuer)),
                _ => None,
            })
            .collect())
    }

    /// Every certificate minted by `issuer`, ordered by address.
    pub fn list_certificates_by_issuer(
        &self,
        issuer: &PublicKey,
    ) -> Result<Vec<(Address, CertificateAccount)>, RegistryError> {
        Ok(self
            .store
            .records()?
            .into_iter()
            .filter_map(|(address, record)| match record {
                Record::Certificate(cert) if cert.issuer == *issuer => Some((address, cert)),
                _ => None,
            })
            .collect())
    }

    /// Judge the certificate at `address` against its issuer's current
    /// standing.
    pub fn verify_certificate(&self, address: &Address) -> Result<VerificationReport, RegistryError> {
        let certificate = self.get_certificate_at(address)?;
        let issuer = self.get_issuer(&certificate.issuer)?;
        let status = certificate.status_under(&issuer);
        tracing::debug!(%address, %status, "certificate checked");
        Ok(VerificationReport {
            address: *address,
            certificate,
            issuer,
            status,
        })
    }
}
