//! Durable storage for pending status overrides.
//!
//! One record per subject identity: the subject's whole override map,
//! serialized as a JSON payload. Records are subject-scoped; nothing
//! enumerates across subjects. A payload that fails to parse reads as
//! absent so a corrupt row can never block the review flow.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::StoreError;
use crate::models::enums::StatusKey;

/// A locally pending, uncommitted status decision for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub status: StatusKey,
    pub label: String,
}

/// Document id → pending override, for one subject.
pub type OverrideMap = BTreeMap<String, StatusOverride>;

/// Storage seam for override records.
///
/// The cache owns one of these behind `Arc`, so tests inject an in-memory
/// fake and assert subject isolation without touching disk.
pub trait OverrideStore: Send + Sync {
    fn save(&self, subject: &str, overrides: &OverrideMap) -> Result<(), StoreError>;
    fn load(&self, subject: &str) -> Result<Option<OverrideMap>, StoreError>;
    fn delete(&self, subject: &str) -> Result<(), StoreError>;
}

/// SQLite-backed override store.
pub struct SqliteOverrideStore {
    conn: Mutex<Connection>,
}

impl SqliteOverrideStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (and migrate) the store at the given path.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(super::open_database(path)?))
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl OverrideStore for SqliteOverrideStore {
    fn save(&self, subject: &str, overrides: &OverrideMap) -> Result<(), StoreError> {
        let payload = serde_json::to_string(overrides)?;
        self.conn()?.execute(
            "INSERT INTO status_overrides (subject, payload, updated_at)
             VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(subject) DO UPDATE SET
                 payload = excluded.payload,
                 updated_at = excluded.updated_at",
            params![subject, payload],
        )?;
        Ok(())
    }

    fn load(&self, subject: &str) -> Result<Option<OverrideMap>, StoreError> {
        let raw: Option<String> = self
            .conn()?
            .query_row(
                "SELECT payload FROM status_overrides WHERE subject = ?1",
                params![subject],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(map) => Ok(Some(map)),
            Err(e) => {
                tracing::warn!(subject, error = %e, "Discarding unparseable override record");
                Ok(None)
            }
        }
    }

    fn delete(&self, subject: &str) -> Result<(), StoreError> {
        self.conn()?.execute(
            "DELETE FROM status_overrides WHERE subject = ?1",
            params![subject],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    fn make_store() -> SqliteOverrideStore {
        SqliteOverrideStore::new(open_memory_database().unwrap())
    }

    fn make_map(entries: &[(&str, StatusKey)]) -> OverrideMap {
        entries
            .iter()
            .map(|(id, status)| {
                (
                    id.to_string(),
                    StatusOverride {
                        label: status.label().to_string(),
                        status: status.clone(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = make_store();
        let map = make_map(&[("doc-1", StatusKey::Validated), ("doc-2", StatusKey::Rejected)]);

        store.save("alice@example.com", &map).unwrap();
        let loaded = store.load("alice@example.com").unwrap().unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn load_unknown_subject_is_absent() {
        let store = make_store();
        assert!(store.load("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn save_overwrites_previous_record() {
        let store = make_store();
        store
            .save("alice@example.com", &make_map(&[("doc-1", StatusKey::Validated)]))
            .unwrap();
        store
            .save("alice@example.com", &make_map(&[("doc-1", StatusKey::Rejected)]))
            .unwrap();

        let loaded = store.load("alice@example.com").unwrap().unwrap();
        assert_eq!(loaded["doc-1"].status, StatusKey::Rejected);
    }

    #[test]
    fn delete_removes_record() {
        let store = make_store();
        store
            .save("alice@example.com", &make_map(&[("doc-1", StatusKey::Validated)]))
            .unwrap();
        store.delete("alice@example.com").unwrap();
        assert!(store.load("alice@example.com").unwrap().is_none());
    }

    #[test]
    fn delete_unknown_subject_is_noop() {
        let store = make_store();
        assert!(store.delete("nobody@example.com").is_ok());
    }

    #[test]
    fn records_are_subject_scoped() {
        let store = make_store();
        store
            .save("alice@example.com", &make_map(&[("doc-1", StatusKey::Validated)]))
            .unwrap();
        store
            .save("bob@example.com", &make_map(&[("doc-7", StatusKey::Rejected)]))
            .unwrap();

        let alice = store.load("alice@example.com").unwrap().unwrap();
        assert_eq!(alice.len(), 1);
        assert!(alice.contains_key("doc-1"));

        store.delete("alice@example.com").unwrap();
        assert!(store.load("bob@example.com").unwrap().is_some());
    }

    #[test]
    fn corrupt_payload_reads_as_absent() {
        let store = make_store();
        store
            .conn()
            .unwrap()
            .execute(
                "INSERT INTO status_overrides (subject, payload) VALUES (?1, ?2)",
                params!["alice@example.com", "{not json"],
            )
            .unwrap();

        assert!(store.load("alice@example.com").unwrap().is_none());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.db");

        {
            let store = SqliteOverrideStore::open(&path).unwrap();
            store
                .save("alice@example.com", &make_map(&[("doc-1", StatusKey::Validated)]))
                .unwrap();
        }

        let store = SqliteOverrideStore::open(&path).unwrap();
        let loaded = store.load("alice@example.com").unwrap().unwrap();
        assert_eq!(loaded["doc-1"].status, StatusKey::Validated);
    }
}
