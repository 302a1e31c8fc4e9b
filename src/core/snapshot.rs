//! Single-slot persistence of the manual-mode state.
//!
//! The snapshot lives at `<state_dir>/<storage_key>.json` and is always
//! replaced as a whole: written to a temp file in the same directory, then
//! persisted over the old one. There is never more than one snapshot.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::mode::{Confirm, ManualContent, ModeState};

/// Key the snapshot is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "wp_playground_blueprint_v1";

pub const RESTORE_QUESTION: &str = "Found unsaved blueprint edits from a previous session. Restore them?";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to access snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// On-disk record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub is_manual_mode: bool,
    #[serde(default)]
    pub manual_blueprint: Option<ManualContent>,
    /// Capture time, Unix milliseconds.
    pub timestamp: i64,
}

impl PersistedState {
    /// Capture `state` now. Content is only recorded in manual mode.
    pub fn capture(state: &ModeState) -> Self {
        Self {
            is_manual_mode: state.is_manual_mode(),
            manual_blueprint: state.manual_content().cloned(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn captured_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Manual content worth offering back to the user.
    fn restorable(self) -> Option<ManualContent> {
        if !self.is_manual_mode {
            return None;
        }
        match self.manual_blueprint {
            Some(ManualContent::Text(t)) if t.is_empty() => None,
            Some(ManualContent::Document(serde_json::Value::Null)) | None => None,
            other => other,
        }
    }
}

/// What happened at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// Nothing stored, nothing manual, or unreadable.
    Empty,
    /// User accepted; re-enter manual mode with this content.
    Accepted(ManualContent),
    /// User declined; the stored snapshot has been deleted.
    Declined,
}

/// Durable key-value slot for the mode state.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
    key: String,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self { dir: dir.into(), key: key.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    /// Overwrite the slot with the current mode state.
    pub fn save(&self, state: &ModeState) -> Result<(), SnapshotError> {
        let record = PersistedState::capture(state);
        let path = self.path();
        let io_err = |source| SnapshotError::Io { path: path.clone(), source };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        let text = serde_json::to_string(&record)
            .map_err(|source| SnapshotError::Malformed { path: path.clone(), source })?;

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(path = %path.display(), manual = record.is_manual_mode, "snapshot saved");
        Ok(())
    }

    /// Read the slot. `Ok(None)` when nothing is stored.
    pub fn load(&self) -> Result<Option<PersistedState>, SnapshotError> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SnapshotError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| SnapshotError::Malformed { path, source })
    }

    /// Delete the slot. Missing is fine.
    pub fn clear(&self) -> Result<(), SnapshotError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SnapshotError::Io { path, source }),
        }
    }

    /// Startup check. A manual snapshot is offered through `confirm`:
    /// accepting hands the content back, declining deletes the snapshot so the
    /// question is not asked again. Unreadable snapshots are logged and skipped.
    pub fn restore(&self, confirm: &mut dyn Confirm) -> RestoreOutcome {
        let record = match self.load() {
            Ok(Some(r)) => r,
            Ok(None) => return RestoreOutcome::Empty,
            Err(e) => {
                warn!("Failed to restore state: {e}");
                return RestoreOutcome::Empty;
            }
        };

        let Some(content) = record.restorable() else {
            return RestoreOutcome::Empty;
        };

        if confirm.confirm(RESTORE_QUESTION) {
            RestoreOutcome::Accepted(content)
        } else {
            if let Err(e) = self.clear() {
                warn!("Failed to discard snapshot: {e}");
            }
            RestoreOutcome::Declined
        }
    }
}

/// Store rooted at `dir` with the default key.
pub fn default_store(dir: &Path) -> SnapshotStore {
    SnapshotStore::new(dir, DEFAULT_STORAGE_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mode::FixedAnswer;
    use tempfile::TempDir;

    fn manual(text: &str) -> ModeState {
        ModeState::Manual(ManualContent::Text(text.into()))
    }

    #[test]
    fn missing_snapshot_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(store.restore(&mut FixedAnswer(true)), RestoreOutcome::Empty);
    }

    #[test]
    fn save_overwrites_single_slot() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());

        store.save(&manual("{\"a\":1}")).unwrap();
        store.save(&manual("{\"a\":2}")).unwrap();

        let rec = store.load().unwrap().unwrap();
        assert!(rec.is_manual_mode);
        assert_eq!(rec.manual_blueprint, Some(ManualContent::Text("{\"a\":2}".into())));
        assert!(rec.captured_at().is_some());

        let files: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn auto_state_drops_content() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        store.save(&ModeState::Auto).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["isManualMode"], false);
        assert!(v["manualBlueprint"].is_null());
        assert!(v["timestamp"].is_i64());
    }

    #[test]
    fn accept_returns_content() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        store.save(&manual("{ broken")).unwrap();

        assert_eq!(
            store.restore(&mut FixedAnswer(true)),
            RestoreOutcome::Accepted(ManualContent::Text("{ broken".into()))
        );
        assert!(store.path().exists());
    }

    #[test]
    fn decline_deletes_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        store.save(&manual("{}")).unwrap();

        assert_eq!(store.restore(&mut FixedAnswer(false)), RestoreOutcome::Declined);
        assert!(!store.path().exists());
        assert_eq!(store.restore(&mut FixedAnswer(true)), RestoreOutcome::Empty);
    }

    #[test]
    fn unwritable_dir_reports_io_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("state");
        fs::write(&blocker, "not a directory").unwrap();

        let store = default_store(&blocker);
        assert!(matches!(store.save(&ModeState::Auto), Err(SnapshotError::Io { .. })));
    }

    #[test]
    fn malformed_snapshot_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        fs::write(store.path(), "not json at all").unwrap();

        assert!(matches!(store.load(), Err(SnapshotError::Malformed { .. })));
        assert_eq!(store.restore(&mut FixedAnswer(true)), RestoreOutcome::Empty);
    }

    #[test]
    fn reads_object_form_written_by_browser() {
        let tmp = TempDir::new().unwrap();
        let store = default_store(tmp.path());
        fs::write(
            store.path(),
            r#"{"isManualMode":true,"manualBlueprint":{"steps":[]},"timestamp":1700000000000}"#,
        )
        .unwrap();

        assert_eq!(
            store.restore(&mut FixedAnswer(true)),
            RestoreOutcome::Accepted(ManualContent::Document(serde_json::json!({ "steps": [] })))
        );
    }
}
