//! # Storage Envelope
//!
//! [`Record`] is what an account store holds at each address. The `kind`
//! tag travels with the payload, so a store can report a kind mismatch
//! instead of misreading bytes as the wrong record type.

use serde::{Deserialize, Serialize};

use certichain_core::RecordKind;

use crate::admin::AdminAccount;
use crate::certificate::CertificateAccount;
use crate::issuer::IssuerAccount;

/// A persisted record of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    /// The admin singleton.
    Admin(AdminAccount),
    /// An issuer.
    Issuer(IssuerAccount),
    /// A certificate.
    Certificate(CertificateAccount),
}

impl Record {
    /// The kind of record held.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Admin(_) => RecordKind::Admin,
            Self::Issuer(_) => RecordKind::Issuer,
            Self::Certificate(_) => RecordKind::Certificate,
        }
    }
}

/// A record type that can be stored in, and viewed out of, a [`Record`].
pub trait AccountRecord: Clone + Sized {
    /// The kind tag for this record type.
    const KIND: RecordKind;

    /// Wrap this record for storage.
    fn into_record(self) -> Record;

    /// Borrow the typed view, if `record` holds this kind.
    fn view(record: &Record) -> Option<&Self>;

    /// Mutably borrow the typed view, if `record` holds this kind.
    fn view_mut(record: &mut Record) -> Option<&mut Self>;
}

macro_rules! account_record {
    ($ty:ty, $variant:ident) => {
        impl AccountRecord for $ty {
            const KIND: RecordKind = RecordKind::$variant;

            fn into_record(self) -> Record {
                Record::$variant(self)
            }

            fn view(record: &Record) -> Option<&Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn view_mut(record: &mut Record) -> Option<&mut Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

account_record!(AdminAccount, Admin);
account_record!(IssuerAccount, Issuer);
account_record!(CertificateAccount, Certificate);

#[cfg(test)]
mod tests {
    use super::*;
    use certichain_core::{PublicKey, Timestamp};

    #[test]
    fn test_kind_tag_in_json() {
        let record = AdminAccount::new(PublicKey::from_bytes([1; 32]), Timestamp::now()).into_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "admin");
        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_view_rejects_other_kind() {
        let record = AdminAccount::new(PublicKey::from_bytes([1; 32]), Timestamp::now()).into_record();
        assert_eq!(record.kind(), RecordKind::Admin);
        assert!(AdminAccount::view(&record).is_some());
        assert!(IssuerAccount::view(&record).is_none());
        assert!(CertificateAccount::view(&record).is_none());
    }

    #[test]
    fn test_view_mut_edits_in_place() {
        let mut record = IssuerAccount::new(
            PublicKey::from_bytes([2; 32]),
            "U".to_string(),
            Timestamp::now(),
        )
        .into_record();
        IssuerAccount::view_mut(&mut record).unwrap().verify().unwrap();
        assert!(IssuerAccount::view(&record).unwrap().is_verified);
    }
}
