//! # Authorization Guard
//!
//! Precondition checks, grouped by phase. Callers run them in phase order
//! (validation, then authorization, then record state) so that an input
//! failing several checks always reports the same error.
//!
//! String limits are byte lengths (`str::len`), not character counts.
//! Within a validation phase, length limits are checked for every field
//! before emptiness.

use certichain_core::{admin_address, issuer_address, Address, PublicKey, RegistryError};
use certichain_state::{AdminAccount, CertificateAccount, IssuerAccount};
use certichain_store::StoreTxn;

use crate::config::FieldLimits;

/// Caller-supplied certificate fields, borrowed for validation.
#[derive(Debug, Clone, Copy)]
pub struct CertificateFields<'a> {
    /// Recipient name.
    pub student_name: &'a str,
    /// Course or credential name.
    pub course_name: &'a str,
    /// Commitment to the off-ledger content.
    pub certificate_hash: &'a str,
    /// Issuer-scoped identifier.
    pub certificate_id: &'a str,
}

// ─── Phase (a): validation ───────────────────────────────────────────

/// Validate an institution name.
pub fn validate_institution_name(name: &str, limits: &FieldLimits) -> Result<(), RegistryError> {
    if name.len() > limits.institution_name {
        return Err(RegistryError::InstitutionNameTooLong {
            len: name.len(),
            max: limits.institution_name,
        });
    }
    if name.is_empty() {
        return Err(RegistryError::EmptyInstitutionName);
    }
    Ok(())
}

/// Validate the fields of a certificate to be issued.
pub fn validate_certificate_fields(
    fields: &CertificateFields<'_>,
    limits: &FieldLimits,
) -> Result<(), RegistryError> {
    if fields.student_name.len() > limits.student_name {
        return Err(RegistryError::StudentNameTooLong {
            len: fields.student_name.len(),
            max: limits.student_name,
        });
    }
    if fields.course_name.len() > limits.course_name {
        return Err(RegistryError::CourseNameTooLong {
            len: fields.course_name.len(),
            max: limits.course_name,
        });
    }
    if fields.certificate_hash.len() > limits.certificate_hash {
        return Err(RegistryError::CertificateHashTooLong {
            len: fields.certificate_hash.len(),
            max: limits.certificate_hash,
        });
    }
    if fields.certificate_id.len() > limits.certificate_id {
        return Err(RegistryError::CertificateIdTooLong {
            len: fields.certificate_id.len(),
            max: limits.certificate_id,
        });
    }

    let required = [
        ("student_name", fields.student_name),
        ("course_name", fields.course_name),
        ("certificate_hash", fields.certificate_hash),
        ("certificate_id", fields.certificate_id),
    ];
    if let Some(&(field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(RegistryError::EmptyField { field });
    }
    Ok(())
}

// ─── Phase (b): authorization ────────────────────────────────────────

/// Require `caller` to be the admin authority.
pub fn authorize_admin(txn: &StoreTxn<'_>, caller: &PublicKey) -> Result<AdminAccount, RegistryError> {
    let admin: AdminAccount = txn.read(&admin_address())?;
    admin.require_authority(caller)?;
    Ok(admin)
}

/// Require `caller` to own a registered issuer; returns its address and record.
pub fn authorize_issuer(
    txn: &StoreTxn<'_>,
    caller: &PublicKey,
) -> Result<(Address, IssuerAccount), RegistryError> {
    let address = issuer_address(caller);
    let issuer: IssuerAccount = txn.read(&address)?;
    issuer.require_authority(caller)?;
    Ok((address, issuer))
}

/// Require `caller` to be the issuer that minted the certificate at `address`.
pub fn authorize_certificate_issuer(
    txn: &StoreTxn<'_>,
    caller: &PublicKey,
    address: &Address,
) -> Result<CertificateAccount, RegistryError> {
    let certificate: CertificateAccount = txn.read(address)?;
    certificate.require_issuer(caller)?;
    Ok(certificate)
}
