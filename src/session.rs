//! Per-dossier review session.
//!
//! Holds the ordered effective document list and a cursor, and drives the
//! validate / reject / commit workflow. Decisions are local and instant:
//! they write an override and touch nothing canonical. Only the commit
//! talks back to the catalog, and only with a fully-treated dossier.
//!
//! All I/O failures are caught here and converted into the session's
//! visible state and message; nothing propagates into the pure dossier
//! functions. Dropping a session abandons it — its overrides live in the
//! status store and come back when the dossier is reopened.

use std::sync::Arc;

use crate::catalog::{DocumentCatalog, StatusUpdate};
use crate::dossier::reconcile;
use crate::models::document::DocumentView;
use crate::models::enums::{DocumentStatus, StatusKey};
use crate::status_store::StatusStore;

/// Workflow states of one review session.
///
/// Validate/reject are instantaneous self-loops on `Ready`; `Committing`
/// only exists to guard against overlapping submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    /// The initial fetch failed; the session is non-interactive and there
    /// is no automatic retry.
    LoadFailed,
    Ready,
    Committing,
    Committed,
}

/// One dossier being actively reviewed.
pub struct ReviewSession {
    subject: String,
    documents: Vec<DocumentView>,
    cursor: usize,
    read_only: bool,
    state: SessionState,
    last_error: Option<String>,
    catalog: Arc<dyn DocumentCatalog>,
    statuses: Arc<StatusStore>,
}

impl ReviewSession {
    /// Open a dossier: fetch its canonical documents, merge the subject's
    /// pending overrides, and point the cursor at the first document.
    pub fn open(
        subject: impl Into<String>,
        catalog: Arc<dyn DocumentCatalog>,
        statuses: Arc<StatusStore>,
        read_only: bool,
    ) -> Self {
        let subject = subject.into();
        let mut session = Self {
            subject,
            documents: Vec::new(),
            cursor: 0,
            read_only,
            state: SessionState::Loading,
            last_error: None,
            catalog,
            statuses,
        };

        match session.catalog.fetch_by_subject(&session.subject) {
            Ok(docs) => {
                let views: Vec<DocumentView> =
                    docs.into_iter().map(DocumentView::from).collect();
                let overrides = session.statuses.get_overrides(&session.subject);
                session.documents = reconcile(&views, &overrides);
                session.state = SessionState::Ready;
                tracing::debug!(
                    subject = %session.subject,
                    documents = session.documents.len(),
                    "Review session opened"
                );
            }
            Err(e) => {
                tracing::error!(subject = %session.subject, error = %e, "Dossier load failed");
                session.state = SessionState::LoadFailed;
                session.last_error = Some(e.to_string());
            }
        }

        session
    }

    // ── Accessors ────────────────────────────────────────

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Effective documents, in catalog order.
    pub fn documents(&self) -> &[DocumentView] {
        &self.documents
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<&DocumentView> {
        self.documents.get(self.cursor)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Message from the last failed fetch, persist, or commit.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Navigation ───────────────────────────────────────

    /// Move to the previous document. No-op at the first.
    pub fn prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move to the next document. No-op at the last; never wraps.
    pub fn next(&mut self) {
        if self.cursor + 1 < self.documents.len() {
            self.cursor += 1;
        }
    }

    // ── Decisions ────────────────────────────────────────

    /// Mark the current document validated.
    pub fn validate_current(&mut self) {
        self.decide(StatusKey::Validated);
    }

    /// Mark the current document rejected.
    pub fn reject_current(&mut self) {
        self.decide(StatusKey::Rejected);
    }

    /// The single path that creates or updates an override. No-op unless
    /// the session is interactive and the cursor sits on an uploaded
    /// document (one with an id).
    fn decide(&mut self, status: StatusKey) {
        if self.read_only || self.state != SessionState::Ready {
            return;
        }
        let Some(doc) = self.documents.get_mut(self.cursor) else {
            return;
        };
        let Some(id) = doc.id.clone() else {
            return;
        };

        let label = status.label().to_string();
        doc.status_key = status.clone();
        doc.status_label = label.clone();

        if let Err(e) = self
            .statuses
            .set_status(&self.subject, &id, status, &label)
        {
            // The in-memory decision stands; the next write retries the
            // whole subject map anyway.
            tracing::warn!(subject = %self.subject, doc_id = %id, error = %e, "Override persist failed");
            self.last_error = Some(e.to_string());
        }
    }

    // ── Commit ───────────────────────────────────────────

    /// Whether the dossier is ready to be committed: interactive, and every
    /// document decided one way or the other.
    pub fn can_commit(&self) -> bool {
        !self.read_only
            && self.state == SessionState::Ready
            && !self.documents.is_empty()
            && self.documents.iter().all(|d| d.status_key.is_terminal())
    }

    /// Submit the batch decision to the catalog.
    ///
    /// Returns true when the backend accepted the batch: the subject's
    /// overrides are cleared and the session flips to read-only. On failure
    /// the session returns to `Ready` with its overrides untouched, so a
    /// retry resubmits the identical batch. A no-op (false) when the
    /// session is not committable.
    pub fn commit(&mut self) -> bool {
        if !self.can_commit() {
            return false;
        }

        self.state = SessionState::Committing;

        let updates: Vec<StatusUpdate> = self
            .documents
            .iter()
            .filter_map(|doc| {
                doc.id.as_ref().map(|id| StatusUpdate {
                    id: id.clone(),
                    status: DocumentStatus::from(doc.status_key.clone()),
                })
            })
            .collect();

        match self.catalog.commit_statuses(&updates) {
            Ok(ack) => {
                tracing::info!(
                    subject = %self.subject,
                    updated = ack.updated,
                    "Dossier committed"
                );
                if let Err(e) = self.statuses.clear_subject(&self.subject) {
                    // The backend has the batch; the stale record will be
                    // superseded on the next decision for this subject.
                    tracing::warn!(subject = %self.subject, error = %e, "Override clear failed");
                    self.last_error = Some(e.to_string());
                } else {
                    self.last_error = None;
                }
                self.read_only = true;
                self.state = SessionState::Committed;
                true
            }
            Err(e) => {
                tracing::error!(subject = %self.subject, error = %e, "Commit failed");
                self.last_error = Some(e.to_string());
                self.state = SessionState::Ready;
                false
            }
        }
    }
}
