//! File-based persistence for the attendee store.
//!
//! On every mutation the current store contents are serialized to a JSON
//! file. On startup the file is loaded back so attendees survive restarts.
//!
//! The file is written atomically: first to a `.tmp` sibling, then renamed
//! over the final path, so a crash mid-write never corrupts the stored state.

use ers_core::attendee::Attendee;
use ers_core::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The shape serialized to / deserialized from the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// Write `attendees` to `path`, replacing any previous snapshot.
pub fn save_snapshot(path: &Path, attendees: Vec<Attendee>) -> Result<()> {
    let persisted = PersistedState { attendees };
    let json = serde_json::to_string_pretty(&persisted)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    // Atomic write: tmp file → rename
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json)?;
    std::fs::rename(&tmp, path)?;

    tracing::debug!(
        path = %path.display(),
        attendees = persisted.attendees.len(),
        "persist: state saved"
    );
    Ok(())
}

/// Load a previously saved snapshot.
///
/// * If the file does not exist            → empty (first run).
/// * If the file exists but is unreadable  → logs a warning, empty.
/// * If the file exists but is malformed   → logs a warning, empty.
pub fn load_snapshot(path: &Path) -> Vec<Attendee> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "persist: no state file found, starting fresh");
        return Vec::new();
    }

    let data = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "persist: failed to read state file");
            return Vec::new();
        }
    };

    let persisted: PersistedState = match serde_json::from_str(&data) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "persist: state file is malformed, ignoring");
            return Vec::new();
        }
    };

    tracing::info!(
        attendees = persisted.attendees.len(),
        path = %path.display(),
        "persist: state restored from file"
    );
    persisted.attendees
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_attendee(id: u64, first: &str) -> Attendee {
        Attendee {
            id,
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email_address: format!("{}@example.com", first.to_lowercase()),
            created_at: None,
        }
    }

    #[test]
    fn save_then_load_returns_same_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        save_snapshot(&path, vec![make_attendee(1, "Phil"), make_attendee(2, "Marcelo")]).unwrap();

        let loaded = load_snapshot(&path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].first_name, "Phil");
        assert_eq!(loaded[1].id, 2);
    }

    #[test]
    fn save_creates_missing_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("state.json");
        save_snapshot(&path, vec![make_attendee(1, "Ada")]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_leaves_no_tmp_file_behind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        save_snapshot(&path, Vec::new()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        assert!(load_snapshot(&dir.path().join("nonexistent.json")).is_empty());
    }

    #[test]
    fn load_malformed_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not valid json {{{{").unwrap();
        assert!(load_snapshot(&path).is_empty());
    }
}
