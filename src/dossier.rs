//! Dossier listing — reconciliation, status aggregation, grouping.
//!
//! Pure functions over document views: merge pending local decisions into
//! the canonical listing, derive one status per dossier from its documents,
//! and build the grouped rows the listing screen renders. Only the listing
//! merge touches the status store, through its infallible read surface;
//! nothing here can fail given well-typed input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::OverrideMap;
use crate::models::document::DocumentView;
use crate::models::enums::StatusKey;
use crate::status_store::StatusStore;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One dossier row: every document sharing a subject identity, summarized.
///
/// The aggregate status is recomputed from the documents on every build,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DossierSummary {
    pub subject: String,
    pub display_name: String,
    pub status_key: StatusKey,
    pub status_label: String,
    /// "N / M documents", counting documents past the upload stage.
    pub docs_summary: String,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub documents: Vec<DocumentView>,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Merge pending overrides into a canonical document list.
///
/// A document whose id carries an override takes the override's status and
/// label; everything else passes through unchanged. Order-preserving, and
/// idempotent under an empty override map. Documents without an id (not yet
/// uploaded) never match.
pub fn reconcile(documents: &[DocumentView], overrides: &OverrideMap) -> Vec<DocumentView> {
    documents
        .iter()
        .cloned()
        .map(|mut doc| {
            if let Some(entry) = doc.id.as_deref().and_then(|id| overrides.get(id)) {
                doc.status_key = entry.status.clone();
                doc.status_label = entry.label.clone();
            }
            doc
        })
        .collect()
}

/// Merge pending overrides into a listing that spans subjects.
///
/// Each document looks up its own subject's override map, so one dossier's
/// pending decisions never leak into another. This is how the listing screen
/// reflects local decisions the backend has not been told about yet.
pub fn reconcile_listing(documents: &[DocumentView], store: &StatusStore) -> Vec<DocumentView> {
    documents
        .iter()
        .cloned()
        .map(|mut doc| {
            if let Some(entry) = doc
                .id
                .as_deref()
                .and_then(|id| store.get_status(&doc.subject, id))
            {
                doc.status_key = entry.status;
                doc.status_label = entry.label;
            }
            doc
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Derive one dossier-level status from its documents' effective statuses.
///
/// Precedence, first match wins: any rejection marks the dossier rejected;
/// full validation is the only way to reach validated; partial progress
/// ranks above no progress. An empty dossier aggregates like an all-pending
/// one.
pub fn aggregate_status(statuses: &[StatusKey]) -> StatusKey {
    if statuses.contains(&StatusKey::Rejected) {
        return StatusKey::Rejected;
    }
    if !statuses.is_empty() && statuses.iter().all(|s| *s == StatusKey::Validated) {
        return StatusKey::Validated;
    }
    if statuses.contains(&StatusKey::UnderReview) {
        return StatusKey::UnderReview;
    }
    if statuses.contains(&StatusKey::Uploaded) {
        return StatusKey::Uploaded;
    }
    StatusKey::PendingUpload
}

/// Whether every status is terminal (validated or rejected).
pub fn all_terminal(statuses: &[StatusKey]) -> bool {
    statuses.iter().all(StatusKey::is_terminal)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group effective documents by subject into dossier rows.
///
/// Output is ordered by subject so listings are deterministic; documents
/// keep their input order within each dossier.
pub fn build_dossiers(documents: Vec<DocumentView>) -> Vec<DossierSummary> {
    let mut grouped: std::collections::BTreeMap<String, Vec<DocumentView>> =
        std::collections::BTreeMap::new();
    for doc in documents {
        grouped.entry(doc.subject.clone()).or_default().push(doc);
    }

    grouped
        .into_iter()
        .map(|(subject, docs)| {
            let statuses: Vec<StatusKey> =
                docs.iter().map(|d| d.status_key.clone()).collect();
            let status_key = aggregate_status(&statuses);
            let treated = docs
                .iter()
                .filter(|d| d.status_key != StatusKey::PendingUpload)
                .count();

            DossierSummary {
                display_name: docs
                    .first()
                    .map(|d| d.display_name.clone())
                    .unwrap_or_default(),
                status_label: status_key.label().to_string(),
                status_key,
                docs_summary: format!("{treated} / {} documents", docs.len()),
                last_updated_at: docs.iter().map(|d| d.last_updated_at).max(),
                subject,
                documents: docs,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
