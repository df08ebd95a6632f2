//! Snapshot and preview workflows for the editor.

use std::time::Instant;

use anyhow::{bail, Context, Result};

use super::Editor;
use crate::notice::NoticeKind;
use crate::snapshot::{SavedSnapshot, SnapshotList};

impl Editor {
    /// Returns all saved snapshots, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn snapshots(&self) -> Result<SnapshotList> {
        self.store().list_snapshots()
    }

    /// Saves the current text as a new snapshot and reports the outcome as
    /// a notice. Returns the snapshot on success.
    pub fn save_snapshot(&mut self, title: Option<&str>, now: Instant) -> Option<SavedSnapshot> {
        match self.try_save_snapshot(title) {
            Ok(snapshot) => {
                self.notify(format!("Saved \"{}\"", snapshot.title), NoticeKind::Success, now);
                Some(snapshot)
            }
            Err(e) => {
                self.notify(format!("{e}"), NoticeKind::Error, now);
                None
            }
        }
    }

    fn try_save_snapshot(&self, title: Option<&str>) -> Result<SavedSnapshot> {
        let text = self.buffer.text();
        let code = text.trim();
        if code.is_empty() {
            bail!("Nothing to save");
        }
        self.store()
            .save_snapshot(title, code)
            .context("Failed to save snapshot")
    }

    /// Replaces the document with snapshot `id` and writes it as the current
    /// code right away. An unknown id changes nothing and returns false.
    pub fn load_snapshot(&mut self, id: i64, now: Instant) -> bool {
        let list = match self.snapshots() {
            Ok(list) => list,
            Err(e) => {
                self.notify(format!("Could not read snapshots: {e}"), NoticeKind::Error, now);
                return false;
            }
        };
        let Some(snapshot) = list.find(id).cloned() else {
            tracing::debug!("No snapshot {id} to load");
            return false;
        };

        self.replace_text(&snapshot.code);
        self.autosave.cancel();
        match self.write_current() {
            Ok(()) => {
                self.notify(format!("Loaded \"{}\"", snapshot.title), NoticeKind::Success, now)
            }
            Err(e) => {
                tracing::warn!("Failed to save loaded snapshot as current code: {e:#}");
                self.notify(
                    format!("Loaded \"{}\" but could not save it: {e}", snapshot.title),
                    NoticeKind::Error,
                    now,
                );
            }
        }
        true
    }

    /// Deletes snapshot `id`. Returns the removed snapshot if it existed;
    /// an unknown id changes nothing.
    pub fn delete_snapshot(&mut self, id: i64, now: Instant) -> Option<SavedSnapshot> {
        match self.store().delete_snapshot(id) {
            Ok(Some(snapshot)) => {
                self.notify(format!("Deleted \"{}\"", snapshot.title), NoticeKind::Success, now);
                Some(snapshot)
            }
            Ok(None) => {
                tracing::debug!("No snapshot {id} to delete");
                None
            }
            Err(e) => {
                self.notify(format!("Failed to delete snapshot: {e}"), NoticeKind::Error, now);
                None
            }
        }
    }

    /// Opens the current text in the preview surface.
    pub fn preview(&mut self, now: Instant) {
        let text = self.buffer.text();
        self.open_preview(&text, now);
    }

    /// Opens snapshot `id` in the preview surface without loading it.
    /// Returns false if there is no such snapshot.
    pub fn preview_snapshot(&mut self, id: i64, now: Instant) -> bool {
        let code = match self.snapshots() {
            Ok(list) => list.find(id).map(|s| s.code.clone()),
            Err(e) => {
                tracing::warn!("Failed to read snapshots: {e:#}");
                None
            }
        };
        match code {
            Some(code) => {
                self.open_preview(&code, now);
                true
            }
            None => false,
        }
    }

    fn open_preview(&mut self, content: &str, now: Instant) {
        let content = content.trim();
        if content.is_empty() {
            self.notify("Nothing to preview", NoticeKind::Error, now);
            return;
        }
        match self.preview.open_preview(content) {
            Ok(()) => self.notify("Preview opened", NoticeKind::Success, now),
            Err(e) => {
                tracing::warn!("Preview failed: {e:#}");
                self.notify(format!("Preview blocked: {e}"), NoticeKind::Error, now);
            }
        }
    }
}
