use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Serde uses the same wire string as `as_str`, so an unknown value is
/// rejected during deserialization and never reaches the aggregator.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// The backend vocabulary, as it appears on the wire.
str_enum!(DocumentStatus {
    PendingUpload => "PENDING_UPLOAD",
    Uploaded => "UPLOADED",
    UnderReview => "UNDER_REVIEW",
    Validated => "VALIDATED",
    Rejected => "REJECTED",
});

// The engine vocabulary. Same five states, keyed for local storage
// and dossier aggregation.
str_enum!(StatusKey {
    PendingUpload => "pending-upload",
    Uploaded => "uploaded",
    UnderReview => "under-review",
    Validated => "validated",
    Rejected => "rejected",
});

str_enum!(DocumentKind {
    IdentityProof => "IDENTITY_PROOF",
    TaxNotice => "TAX_NOTICE",
    AddressProof => "ADDRESS_PROOF",
});

str_enum!(KindKey {
    IdentityProof => "identity-proof",
    TaxNotice => "tax-notice",
    AddressProof => "address-proof",
});

impl From<DocumentStatus> for StatusKey {
    fn from(status: DocumentStatus) -> Self {
        match status {
            DocumentStatus::PendingUpload => StatusKey::PendingUpload,
            DocumentStatus::Uploaded => StatusKey::Uploaded,
            DocumentStatus::UnderReview => StatusKey::UnderReview,
            DocumentStatus::Validated => StatusKey::Validated,
            DocumentStatus::Rejected => StatusKey::Rejected,
        }
    }
}

impl From<StatusKey> for DocumentStatus {
    fn from(key: StatusKey) -> Self {
        match key {
            StatusKey::PendingUpload => DocumentStatus::PendingUpload,
            StatusKey::Uploaded => DocumentStatus::Uploaded,
            StatusKey::UnderReview => DocumentStatus::UnderReview,
            StatusKey::Validated => DocumentStatus::Validated,
            StatusKey::Rejected => DocumentStatus::Rejected,
        }
    }
}

impl StatusKey {
    /// Fixed display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            StatusKey::PendingUpload => "Awaiting upload",
            StatusKey::Uploaded => "Uploaded",
            StatusKey::UnderReview => "Under review",
            StatusKey::Validated => "Validated",
            StatusKey::Rejected => "Rejected",
        }
    }

    /// Terminal statuses require no further reviewer action.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StatusKey::Validated | StatusKey::Rejected)
    }
}

impl From<DocumentKind> for KindKey {
    fn from(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::IdentityProof => KindKey::IdentityProof,
            DocumentKind::TaxNotice => KindKey::TaxNotice,
            DocumentKind::AddressProof => KindKey::AddressProof,
        }
    }
}

impl KindKey {
    pub fn label(&self) -> &'static str {
        match self {
            KindKey::IdentityProof => "Identity proof",
            KindKey::TaxNotice => "Tax notice",
            KindKey::AddressProof => "Address proof",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_status_round_trip() {
        for (variant, s) in [
            (DocumentStatus::PendingUpload, "PENDING_UPLOAD"),
            (DocumentStatus::Uploaded, "UPLOADED"),
            (DocumentStatus::UnderReview, "UNDER_REVIEW"),
            (DocumentStatus::Validated, "VALIDATED"),
            (DocumentStatus::Rejected, "REJECTED"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn status_key_round_trip() {
        for (variant, s) in [
            (StatusKey::PendingUpload, "pending-upload"),
            (StatusKey::Uploaded, "uploaded"),
            (StatusKey::UnderReview, "under-review"),
            (StatusKey::Validated, "validated"),
            (StatusKey::Rejected, "rejected"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(StatusKey::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn vocabulary_mapping_is_lossless_both_ways() {
        for status in [
            DocumentStatus::PendingUpload,
            DocumentStatus::Uploaded,
            DocumentStatus::UnderReview,
            DocumentStatus::Validated,
            DocumentStatus::Rejected,
        ] {
            let key: StatusKey = status.clone().into();
            let back: DocumentStatus = key.into();
            assert_eq!(back, status);
        }
        for key in [
            StatusKey::PendingUpload,
            StatusKey::Uploaded,
            StatusKey::UnderReview,
            StatusKey::Validated,
            StatusKey::Rejected,
        ] {
            let status: DocumentStatus = key.clone().into();
            let back: StatusKey = status.into();
            assert_eq!(back, key);
        }
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&DocumentStatus::UnderReview).unwrap();
        assert_eq!(json, "\"UNDER_REVIEW\"");

        let parsed: StatusKey = serde_json::from_str("\"pending-upload\"").unwrap();
        assert_eq!(parsed, StatusKey::PendingUpload);
    }

    #[test]
    fn unknown_wire_value_is_rejected() {
        assert!(serde_json::from_str::<DocumentStatus>("\"ARCHIVED\"").is_err());
        assert!(DocumentStatus::from_str("archived").is_err());
        assert!(StatusKey::from_str("VALIDATED").is_err());
    }

    #[test]
    fn terminal_statuses() {
        assert!(StatusKey::Validated.is_terminal());
        assert!(StatusKey::Rejected.is_terminal());
        assert!(!StatusKey::PendingUpload.is_terminal());
        assert!(!StatusKey::Uploaded.is_terminal());
        assert!(!StatusKey::UnderReview.is_terminal());
    }

    #[test]
    fn kind_round_trip_and_mapping() {
        for (kind, key) in [
            (DocumentKind::IdentityProof, KindKey::IdentityProof),
            (DocumentKind::TaxNotice, KindKey::TaxNotice),
            (DocumentKind::AddressProof, KindKey::AddressProof),
        ] {
            assert_eq!(KindKey::from(kind.clone()), key);
            assert_eq!(DocumentKind::from_str(kind.as_str()).unwrap(), kind);
            assert_eq!(KindKey::from_str(key.as_str()).unwrap(), key);
        }
    }
}
