use crate::persist;
use crate::repository::AttendeeRepository;
use chrono::Utc;
use dashmap::DashMap;
use ers_core::attendee::{Attendee, PageRequest};
use ers_core::error::{ErsError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory attendee store, optionally snapshotted to a JSON file.
///
/// Clones share the same underlying records.
#[derive(Clone)]
pub struct AttendeeStore {
    attendees: Arc<DashMap<u64, Attendee>>,
    next_id: Arc<AtomicU64>,
    state_file: Option<Arc<PathBuf>>,
    /// Serializes snapshot writes so two mutations never race on the
    /// temp-file rename.
    write_lock: Arc<Mutex<()>>,
}

impl AttendeeStore {
    /// A store that keeps attendees in memory only.
    pub fn new() -> Self {
        Self {
            attendees: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            state_file: None,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// A store backed by `state_file`, restoring any attendees saved there.
    pub fn open(state_file: impl Into<PathBuf>) -> Self {
        let path = state_file.into();
        let mut store = Self::new();

        let mut max_id = 0;
        for attendee in persist::load_snapshot(&path) {
            max_id = max_id.max(attendee.id);
            store.attendees.insert(attendee.id, attendee);
        }
        store.next_id.store(max_id.saturating_add(1), Ordering::SeqCst);
        store.state_file = Some(Arc::new(path));
        store
    }

    pub fn state_file(&self) -> Option<&Path> {
        self.state_file.as_deref().map(PathBuf::as_path)
    }

    fn sorted(&self, mut attendees: Vec<Attendee>) -> Vec<Attendee> {
        attendees.sort_by_key(|a| a.id);
        attendees
    }

    fn snapshot(&self) -> Result<()> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        persist::save_snapshot(path, self.find_all())
    }
}

impl Default for AttendeeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AttendeeRepository for AttendeeStore {
    fn save(&self, mut attendee: Attendee) -> Result<Attendee> {
        if attendee.id == 0 {
            attendee.id = self
                .next_id
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
                .map_err(|_| ErsError::IdsExhausted)?;
        } else {
            self.next_id
                .fetch_max(attendee.id.saturating_add(1), Ordering::SeqCst);
        }
        if attendee.created_at.is_none() {
            attendee.created_at = Some(Utc::now());
        }

        self.attendees.insert(attendee.id, attendee.clone());
        debug!(id = attendee.id, "Attendee stored");

        self.snapshot()?;
        Ok(attendee)
    }

    fn delete_all(&self) -> Result<()> {
        let removed = self.attendees.len();
        self.attendees.clear();
        debug!(removed, "Attendees cleared");
        self.snapshot()
    }

    fn find_all(&self) -> Vec<Attendee> {
        self.sorted(self.attendees.iter().map(|e| e.value().clone()).collect())
    }

    fn find_by_first_name_contains_ignore_case(
        &self,
        fragment: &str,
        page: PageRequest,
    ) -> Vec<Attendee> {
        let needle = fragment.to_lowercase();
        let matches = self.sorted(
            self.attendees
                .iter()
                .filter(|e| e.value().first_name.to_lowercase().contains(&needle))
                .map(|e| e.value().clone())
                .collect(),
        );
        matches
            .into_iter()
            .skip(page.offset())
            .take(page.size)
            .collect()
    }

    fn count(&self) -> usize {
        self.attendees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ers_core::attendee::AttendeeForm;
    use tempfile::tempdir;

    fn person(first: &str, last: &str) -> Attendee {
        Attendee::from(AttendeeForm {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email_address: String::new(),
        })
    }

    #[test]
    fn save_assigns_increasing_ids() {
        let store = AttendeeStore::new();
        let a = store.save(person("Phil", "Berman")).unwrap();
        let b = store.save(person("Marcelo", "Borges")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(a.created_at.is_some());
        assert_eq!(store.count(), 2);
    }

    #[test]
    fn save_with_existing_id_replaces_record() {
        let store = AttendeeStore::new();
        let mut a = store.save(person("Phil", "Berman")).unwrap();
        a.last_name = "Bergman".into();
        store.save(a).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.find_all()[0].last_name, "Bergman");
    }

    #[test]
    fn explicit_id_advances_counter() {
        let store = AttendeeStore::new();
        let mut a = person("Ada", "Lovelace");
        a.id = 41;
        store.save(a).unwrap();
        assert_eq!(store.save(person("Alan", "Turing")).unwrap().id, 42);
    }

    #[test]
    fn explicit_max_id_does_not_wrap_the_counter() {
        let store = AttendeeStore::new();
        let mut a = person("Ada", "Lovelace");
        a.id = u64::MAX;
        store.save(a).unwrap();

        let err = store.save(person("Alan", "Turing")).unwrap_err();
        assert!(matches!(err, ErsError::IdsExhausted));
        assert_eq!(store.count(), 1);
        assert_eq!(store.find_all()[0].first_name, "Ada");
    }

    #[test]
    fn find_all_is_ordered_by_id() {
        let store = AttendeeStore::new();
        for name in ["c", "a", "b"] {
            store.save(person(name, "x")).unwrap();
        }
        let names: Vec<String> = store.find_all().into_iter().map(|a| a.first_name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn delete_all_empties_store() {
        let store = AttendeeStore::new();
        store.save(person("Phil", "Berman")).unwrap();
        store.delete_all().unwrap();
        assert_eq!(store.count(), 0);
        assert!(store.find_all().is_empty());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = AttendeeStore::new();
        store.save(person("Marcelo", "Borges")).unwrap();
        store.save(person("Phil", "Berman")).unwrap();
        store.save(person("MARCIA", "Lopes")).unwrap();

        let hits = store.find_by_first_name_contains_ignore_case("marc", PageRequest::first());
        let names: Vec<&str> = hits.iter().map(|a| a.first_name.as_str()).collect();
        assert_eq!(names, vec!["Marcelo", "MARCIA"]);
    }

    #[test]
    fn search_does_not_match_last_name() {
        let store = AttendeeStore::new();
        store.save(person("Phil", "Berman")).unwrap();
        assert!(store
            .find_by_first_name_contains_ignore_case("berman", PageRequest::first())
            .is_empty());
    }

    #[test]
    fn search_with_empty_fragment_matches_everyone() {
        let store = AttendeeStore::new();
        store.save(person("Phil", "Berman")).unwrap();
        store.save(person("Marcelo", "Borges")).unwrap();
        assert_eq!(
            store.find_by_first_name_contains_ignore_case("", PageRequest::first()).len(),
            2
        );
    }

    #[test]
    fn search_returns_only_requested_page() {
        let store = AttendeeStore::new();
        for i in 0..7 {
            store.save(person(&format!("Sam{i}"), "x")).unwrap();
        }
        let first = store.find_by_first_name_contains_ignore_case("sam", PageRequest::new(0, 3));
        let third = store.find_by_first_name_contains_ignore_case("sam", PageRequest::new(2, 3));
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].first_name, "Sam0");
        assert_eq!(third.len(), 1);
        assert_eq!(third[0].first_name, "Sam6");
    }

    #[test]
    fn clones_share_records() {
        let store = AttendeeStore::new();
        let other = store.clone();
        store.save(person("Phil", "Berman")).unwrap();
        assert_eq!(other.count(), 1);
    }

    #[test]
    fn open_restores_saved_attendees_and_counter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("attendees.json");

        let store = AttendeeStore::open(&path);
        store.save(person("Phil", "Berman")).unwrap();
        store.save(person("Marcelo", "Borges")).unwrap();
        drop(store);

        let reopened = AttendeeStore::open(&path);
        assert_eq!(reopened.count(), 2);
        assert_eq!(reopened.save(person("Ada", "Lovelace")).unwrap().id, 3);
        assert_eq!(reopened.state_file(), Some(path.as_path()));
    }

    #[test]
    fn open_with_max_id_on_disk_keeps_existing_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("attendees.json");
        let mut a = person("Ada", "Lovelace");
        a.id = u64::MAX;
        persist::save_snapshot(&path, vec![a]).unwrap();

        let store = AttendeeStore::open(&path);
        assert_eq!(store.count(), 1);
        assert!(matches!(
            store.save(person("Alan", "Turing")),
            Err(ErsError::IdsExhausted)
        ));
    }

    #[test]
    fn delete_all_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("attendees.json");

        let store = AttendeeStore::open(&path);
        store.save(person("Phil", "Berman")).unwrap();
        store.delete_all().unwrap();

        assert_eq!(AttendeeStore::open(&path).count(), 0);
    }

    #[test]
    fn memory_store_has_no_state_file() {
        assert!(AttendeeStore::new().state_file().is_none());
    }
}
