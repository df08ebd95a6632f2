/// Named copies of the document, kept newest first and capped in length.
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format of [`SavedSnapshot::timestamp`].
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Chars of code shown in a list-item preview.
const PREVIEW_CHARS: usize = 50;

/// One saved copy of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSnapshot {
    /// Creation time in milliseconds since the epoch; unique within a list.
    pub id: i64,
    pub title: String,
    pub code: String,
    /// Local creation time, formatted for display.
    pub timestamp: String,
}

impl SavedSnapshot {
    /// First 50 chars of the code with `<`/`>` escaped, `...` if truncated.
    pub fn preview_line(&self) -> String {
        let head: String = self.code.chars().take(PREVIEW_CHARS).collect();
        let mut preview = head.replace('<', "&lt;").replace('>', "&gt;");
        if self.code.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

/// Title used when the user gives none.
pub fn default_title(timestamp: &str) -> String {
    format!("Saved {timestamp}")
}

/// The ordered snapshot list (index 0 = newest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotList {
    items: Vec<SavedSnapshot>,
}

impl SnapshotList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a stored list. Corrupt data reads as an empty list.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Vec<SavedSnapshot>>(json) {
            Ok(items) => Self { items },
            Err(e) => {
                tracing::warn!("Discarding unreadable snapshot list: {e}");
                Self::default()
            }
        }
    }

    /// Serializes the list for storage.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.items).context("Failed to serialize snapshot list")
    }

    pub fn items(&self) -> &[SavedSnapshot] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SavedSnapshot> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, id: i64) -> Option<&SavedSnapshot> {
        self.items.iter().find(|s| s.id == id)
    }

    /// Creates a snapshot at `at`, puts it first and trims to `limit`.
    pub fn create(
        &mut self,
        title: Option<&str>,
        code: &str,
        at: DateTime<Local>,
        limit: usize,
    ) -> SavedSnapshot {
        let timestamp = at.format(TIMESTAMP_FORMAT).to_string();
        let mut id = at.timestamp_millis();
        if let Some(max) = self.items.iter().map(|s| s.id).max() {
            if id <= max {
                id = max + 1;
            }
        }
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => default_title(&timestamp),
        };
        let snapshot = SavedSnapshot {
            id,
            title,
            code: code.to_string(),
            timestamp,
        };
        self.items.insert(0, snapshot.clone());

        let limit = limit.max(1);
        if self.items.len() > limit {
            for evicted in self.items.drain(limit..) {
                tracing::debug!("Evicting snapshot {} ({})", evicted.id, evicted.title);
            }
        }
        snapshot
    }

    /// Removes the snapshot with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: i64) -> Option<SavedSnapshot> {
        let idx = self.items.iter().position(|s| s.id == id)?;
        Some(self.items.remove(idx))
    }
}

impl<'a> IntoIterator for &'a SnapshotList {
    type Item = &'a SavedSnapshot;
    type IntoIter = std::slice::Iter<'a, SavedSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
