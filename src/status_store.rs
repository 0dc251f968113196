//! Per-subject override cache.
//!
//! Single in-memory source of truth for pending review decisions while the
//! process is live, backed by a persistent [`OverrideStore`].
//!
//! Key properties:
//! - Lazy-loads a subject's record on first access (absent reads as empty)
//! - Write-through on every mutation — there is no other flush point
//! - Cleared for a whole subject only after that subject's batch commit
//! - Per-subject maps; mutation of two subjects never contends

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::{OverrideMap, OverrideStore, StatusOverride, StoreError};
use crate::models::enums::StatusKey;

// ═══════════════════════════════════════════════════════════
// StatusStore — cache over the persistent override store
// ═══════════════════════════════════════════════════════════

/// Cache of pending status overrides, keyed by subject identity.
///
/// All mutation happens under one mutex, so a multi-threaded host keeps the
/// single-writer-at-a-time property the engine assumes; on the intended
/// single UI thread the lock is never contended.
pub struct StatusStore {
    store: Arc<dyn OverrideStore>,
    cache: Mutex<HashMap<String, OverrideMap>>,
}

impl StatusStore {
    pub fn new(store: Arc<dyn OverrideStore>) -> Self {
        Self {
            store,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, OverrideMap>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Cached map for `subject`, loading from the store on first access.
    ///
    /// Load failures degrade to an empty map: a local-storage anomaly must
    /// not take the review flow down with it.
    fn entry<'a>(
        &self,
        cache: &'a mut HashMap<String, OverrideMap>,
        subject: &str,
    ) -> &'a mut OverrideMap {
        match cache.entry(subject.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let loaded = match self.store.load(subject) {
                    Ok(found) => found.unwrap_or_default(),
                    Err(e) => {
                        tracing::warn!(subject, error = %e, "Override load failed; starting empty");
                        OverrideMap::new()
                    }
                };
                entry.insert(loaded)
            }
        }
    }

    // ── Reads ────────────────────────────────────────────

    /// All pending overrides for a subject. Never stale once a mutation
    /// has happened in-process.
    pub fn get_overrides(&self, subject: &str) -> OverrideMap {
        let mut cache = self.lock();
        self.entry(&mut cache, subject).clone()
    }

    /// The pending override for one document, if any.
    pub fn get_status(&self, subject: &str, doc_id: &str) -> Option<StatusOverride> {
        let mut cache = self.lock();
        self.entry(&mut cache, subject).get(doc_id).cloned()
    }

    // ── Mutations (write-through) ────────────────────────

    /// Insert or overwrite one document's override, then persist the
    /// subject's entire updated map.
    pub fn set_status(
        &self,
        subject: &str,
        doc_id: &str,
        status: StatusKey,
        label: &str,
    ) -> Result<(), StoreError> {
        let mut cache = self.lock();
        let map = self.entry(&mut cache, subject);
        map.insert(
            doc_id.to_string(),
            StatusOverride {
                status,
                label: label.to_string(),
            },
        );
        self.store.save(subject, map)
    }

    /// Remove a subject's overrides from cache and store.
    /// Called exactly once, after that subject's batch commit succeeds.
    pub fn clear_subject(&self, subject: &str) -> Result<(), StoreError> {
        let mut cache = self.lock();
        cache.remove(subject);
        self.store.delete(subject)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
