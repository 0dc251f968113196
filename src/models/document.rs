use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{DocumentKind, DocumentStatus, KindKey, StatusKey};

/// Canonical document as served by the catalog backend.
///
/// The canonical status only ever changes through a backend commit; the
/// engine never mutates it locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDocument {
    /// Absent for placeholder rows created before the applicant uploads.
    pub id: Option<String>,
    /// Subject identity: the applicant key grouping documents into a dossier.
    pub subject: String,
    pub display_name: String,
    pub kind: DocumentKind,
    pub status: DocumentStatus,
    pub original_file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

/// A document re-expressed in the engine vocabulary.
///
/// Reconciliation swaps `status_key`/`status_label` for a pending override;
/// everything else mirrors the canonical document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    pub id: Option<String>,
    pub subject: String,
    pub display_name: String,
    pub kind_key: KindKey,
    pub kind_label: String,
    pub status_key: StatusKey,
    pub status_label: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl From<CatalogDocument> for DocumentView {
    fn from(doc: CatalogDocument) -> Self {
        let kind_key: KindKey = doc.kind.into();
        let status_key: StatusKey = doc.status.into();
        Self {
            id: doc.id,
            subject: doc.subject,
            display_name: doc.display_name,
            kind_label: kind_key.label().to_string(),
            kind_key,
            status_label: status_key.label().to_string(),
            status_key,
            file_name: doc.original_file_name,
            uploaded_at: doc.uploaded_at,
            last_updated_at: doc.last_updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_catalog_document() -> CatalogDocument {
        CatalogDocument {
            id: Some("doc-1".into()),
            subject: "alice@example.com".into(),
            display_name: "Alice Martin".into(),
            kind: DocumentKind::IdentityProof,
            status: DocumentStatus::UnderReview,
            original_file_name: "passport.pdf".into(),
            uploaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            last_updated_at: Utc.with_ymd_and_hms(2024, 3, 2, 14, 30, 0).unwrap(),
        }
    }

    #[test]
    fn view_maps_both_vocabularies() {
        let view = DocumentView::from(make_catalog_document());
        assert_eq!(view.status_key, StatusKey::UnderReview);
        assert_eq!(view.status_label, "Under review");
        assert_eq!(view.kind_key, KindKey::IdentityProof);
        assert_eq!(view.kind_label, "Identity proof");
        assert_eq!(view.file_name, "passport.pdf");
    }

    #[test]
    fn view_keeps_missing_id() {
        let mut doc = make_catalog_document();
        doc.id = None;
        doc.status = DocumentStatus::PendingUpload;
        let view = DocumentView::from(doc);
        assert!(view.id.is_none());
        assert_eq!(view.status_key, StatusKey::PendingUpload);
    }

    #[test]
    fn catalog_document_deserializes_camel_case() {
        let json = r#"{
            "id": "doc-9",
            "subject": "bob@example.com",
            "displayName": "Bob Durand",
            "kind": "TAX_NOTICE",
            "status": "UPLOADED",
            "originalFileName": "tax-2023.pdf",
            "uploadedAt": "2024-03-01T09:00:00Z",
            "lastUpdatedAt": "2024-03-02T10:00:00Z"
        }"#;
        let doc: CatalogDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.kind, DocumentKind::TaxNotice);
        assert_eq!(doc.status, DocumentStatus::Uploaded);
        assert_eq!(doc.display_name, "Bob Durand");
    }

    #[test]
    fn unknown_status_fails_at_the_boundary() {
        let json = r#"{
            "id": "doc-9",
            "subject": "bob@example.com",
            "displayName": "Bob Durand",
            "kind": "TAX_NOTICE",
            "status": "SOMETHING_NEW",
            "originalFileName": "tax-2023.pdf",
            "uploadedAt": "2024-03-01T09:00:00Z",
            "lastUpdatedAt": "2024-03-02T10:00:00Z"
        }"#;
        assert!(serde_json::from_str::<CatalogDocument>(json).is_err());
    }
}
