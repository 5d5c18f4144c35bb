//! # Address Derivation
//!
//! Maps `(record kind, seed parts)` to a deterministic 32-byte [`Address`].
//! This replaces a lookup index: anyone holding an issuer's public key (and,
//! for certificates, the certificate id) can compute where the record lives.
//!
//! ## Encoding
//!
//! ```text
//! SHA-256( DOMAIN || lp(kind tag) || lp(seed_0) || ... || lp(seed_n) )
//! lp(x) = u64_be(len(x)) || x
//! ```
//!
//! Every part is length-prefixed, so the preimage is an injective encoding
//! of the tuple: `("ab", "c")` and `("a", "bc")` never share a preimage. The
//! kind tag is always the first part, so records of different kinds never
//! share a preimage either.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::identity::PublicKey;
use crate::{bytes_to_hex, hex_to_bytes};

const ADDRESS_DOMAIN: &[u8] = b"certichain/address/v1";

/// Kind of record stored in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// The registry administrator singleton.
    Admin,
    /// An institution that issues certificates.
    Issuer,
    /// A certificate minted by an issuer.
    Certificate,
}

impl RecordKind {
    /// The seed tag that namespaces addresses of this kind.
    pub fn seed_tag(&self) -> &'static [u8] {
        match self {
            Self::Admin => b"admin",
            Self::Issuer => b"issuer",
            Self::Certificate => b"certificate",
        }
    }

    /// Returns the kind identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Issuer => "issuer",
            Self::Certificate => "certificate",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte record address.
///
/// Serializes as a lowercase hex string so it can key JSON maps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Return the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the address as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse an address from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, String> {
        let hex = hex.trim().to_lowercase();
        if hex.len() != 64 {
            return Err(format!("address hex must be 64 chars, got {}", hex.len()));
        }
        let bytes = hex_to_bytes(&hex)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({}...)", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Derive the address of a record from its kind and seed parts.
pub fn derive_address(kind: RecordKind, seeds: &[&[u8]]) -> Address {
    let mut hasher = Sha256::new();
    hasher.update(ADDRESS_DOMAIN);
    update_prefixed(&mut hasher, kind.seed_tag());
    for seed in seeds {
        update_prefixed(&mut hasher, seed);
    }
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hasher.finalize());
    Address(bytes)
}

fn update_prefixed(hasher: &mut Sha256, part: &[u8]) {
    hasher.update((part.len() as u64).to_be_bytes());
    hasher.update(part);
}

/// The fixed, well-known address of the admin singleton.
pub fn admin_address() -> Address {
    derive_address(RecordKind::Admin, &[])
}

/// Address of the issuer record owned by `authority`.
pub fn issuer_address(authority: &PublicKey) -> Address {
    derive_address(RecordKind::Issuer, &[authority.as_bytes()])
}

/// Address of the certificate `certificate_id` minted by `issuer_authority`.
pub fn certificate_address(issuer_authority: &PublicKey, certificate_id: &str) -> Address {
    derive_address(
        RecordKind::Certificate,
        &[issuer_authority.as_bytes(), certificate_id.as_bytes()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> PublicKey {
        PublicKey::from_bytes([b; 32])
    }

    #[test]
    fn test_admin_address_is_fixed() {
        assert_eq!(admin_address(), admin_address());
        assert_eq!(admin_address(), derive_address(RecordKind::Admin, &[]));
    }

    #[test]
    fn test_issuer_address_deterministic() {
        assert_eq!(issuer_address(&key(1)), issuer_address(&key(1)));
        assert_ne!(issuer_address(&key(1)), issuer_address(&key(2)));
    }

    #[test]
    fn test_certificate_address_scoped_by_issuer() {
        let a = certificate_address(&key(1), "CERT-1");
        let b = certificate_address(&key(2), "CERT-1");
        assert_ne!(a, b);
        assert_eq!(a, certificate_address(&key(1), "CERT-1"));
    }

    #[test]
    fn test_kind_namespaces_addresses() {
        let seed = [7u8; 32];
        assert_ne!(
            derive_address(RecordKind::Issuer, &[&seed]),
            derive_address(RecordKind::Certificate, &[&seed])
        );
    }

    #[test]
    fn test_length_prefix_prevents_boundary_shift() {
        let a = derive_address(RecordKind::Certificate, &[b"ab", b"c"]);
        let b = derive_address(RecordKind::Certificate, &[b"a", b"bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_seed_is_distinct_from_no_seed() {
        let a = derive_address(RecordKind::Certificate, &[b"x"]);
        let b = derive_address(RecordKind::Certificate, &[b"x", b""]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip_and_serde() {
        let addr = issuer_address(&key(9));
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", addr.to_hex()));
        let parsed: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_from_hex_rejects_bad_length() {
        assert!(Address::from_hex("abcd").is_err());
        assert!(Address::from_hex(&"zz".repeat(32)).is_err());
    }
}
