//! # Certificate Content Digest
//!
//! A certificate record stores `certificate_hash`, a commitment to the full
//! off-ledger certificate document. The registry never recomputes it. This
//! module is the helper issuers use to produce that commitment:
//!
//! ```text
//! certificate_hash = hex(SHA-256(JCS(content)))
//! ```
//!
//! JCS (RFC 8785) gives sorted keys and compact separators, so any verifier
//! holding the same content reproduces the same 64-char hex digest.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::bytes_to_hex;
use crate::identity::PublicKey;
use crate::temporal::Timestamp;

/// The off-ledger content a certificate hash commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateContent {
    /// Recipient name.
    pub student_name: String,
    /// Course or credential name.
    pub course_name: String,
    /// Issuing institution's display name.
    pub institution_name: String,
    /// Issuer authority key.
    pub issuer: PublicKey,
    /// Certificate identifier.
    pub certificate_id: String,
    /// Issue date.
    pub issued_at: Timestamp,
}

#[derive(Serialize)]
struct CanonicalView<'a> {
    certificate_id: &'a str,
    course_name: &'a str,
    institution_name: &'a str,
    issued_at: String,
    issuer: String,
    student_name: &'a str,
}

/// Compute the SHA-256 hex commitment over the canonical form of `content`.
pub fn certificate_content_hash(content: &CertificateContent) -> Result<String, serde_json::Error> {
    let view = CanonicalView {
        certificate_id: &content.certificate_id,
        course_name: &content.course_name,
        institution_name: &content.institution_name,
        issued_at: content.issued_at.to_iso8601(),
        issuer: content.issuer.to_hex(),
        student_name: &content.student_name,
    };
    let bytes = serde_jcs::to_vec(&view)?;
    Ok(bytes_to_hex(&Sha256::digest(&bytes)))
}
