//! Interfaces to the collaborators the editor writes to and reads from.
//!
//! The editor only ever hands them its current text; rendering of lists,
//! dialogs and preview windows lives on the other side of these traits.

use std::cell::RefCell;

use anyhow::Result;
use chrono::Local;

use crate::snapshot::{SavedSnapshot, SnapshotList};

/// Durable key-value persistence for the current code and saved snapshots.
pub trait CodeStore {
    /// Overwrites the autosaved current code.
    fn save_current(&self, content: &str) -> Result<()>;

    /// Returns the autosaved current code, if any.
    fn load_current(&self) -> Result<Option<String>>;

    /// Returns all snapshots, newest first. Corrupt data reads as empty.
    fn list_snapshots(&self) -> Result<SnapshotList>;

    /// Stores a new snapshot, evicting the oldest beyond the limit.
    fn save_snapshot(&self, title: Option<&str>, content: &str) -> Result<SavedSnapshot>;

    /// Deletes the snapshot with `id`. Returns it if it existed.
    fn delete_snapshot(&self, id: i64) -> Result<Option<SavedSnapshot>>;
}

/// A surface that renders markup verbatim (a browser tab, a window...).
pub trait PreviewSurface {
    /// Opens a new surface showing `content` unescaped.
    fn open_preview(&self, content: &str) -> Result<()>;
}

/// A [`CodeStore`] that lives and dies with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    limit: usize,
    current: RefCell<Option<String>>,
    snapshots: RefCell<SnapshotList>,
    writes: RefCell<usize>,
}

impl MemoryStore {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Number of `save_current` calls so far.
    pub fn current_writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl CodeStore for MemoryStore {
    fn save_current(&self, content: &str) -> Result<()> {
        *self.current.borrow_mut() = Some(content.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn load_current(&self) -> Result<Option<String>> {
        Ok(self.current.borrow().clone())
    }

    fn list_snapshots(&self) -> Result<SnapshotList> {
        Ok(self.snapshots.borrow().clone())
    }

    fn save_snapshot(&self, title: Option<&str>, content: &str) -> Result<SavedSnapshot> {
        Ok(self
            .snapshots
            .borrow_mut()
            .create(title, content, Local::now(), self.limit))
    }

    fn delete_snapshot(&self, id: i64) -> Result<Option<SavedSnapshot>> {
        Ok(self.snapshots.borrow_mut().remove(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_current() {
        let store = MemoryStore::new(10);
        assert!(store.load_current().unwrap().is_none());
        store.save_current("abc").unwrap();
        assert_eq!(store.load_current().unwrap().as_deref(), Some("abc"));
        assert_eq!(store.current_writes(), 1);
    }

    #[test]
    fn test_memory_store_snapshots() {
        let store = MemoryStore::new(2);
        let a = store.save_snapshot(Some("a"), "1").unwrap();
        store.save_snapshot(Some("b"), "2").unwrap();
        store.save_snapshot(Some("c"), "3").unwrap();

        let list = store.list_snapshots().unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.find(a.id).is_none());

        let newest = list.items()[0].id;
        assert_eq!(store.delete_snapshot(newest).unwrap().unwrap().title, "c");
        assert_eq!(store.list_snapshots().unwrap().len(), 1);
    }
}
