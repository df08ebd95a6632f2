/// Key-value persistence of the current code and the snapshot list, backed by redb.
///
/// A single table maps fixed keys to text values:
/// - `current`: the autosaved document, stored raw
/// - `snapshots`: the snapshot list as JSON
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use markpad_core::collab::CodeStore;
use markpad_core::snapshot::{SavedSnapshot, SnapshotList};

/// Code table: fixed key → text.
const CODE_TABLE: TableDefinition<&str, &str> = TableDefinition::new("code");

const CURRENT_KEY: &str = "current";
const SNAPSHOTS_KEY: &str = "snapshots";

/// Database file name inside the data directory.
const DB_FILE: &str = "markpad.redb";

/// [`CodeStore`] persisted in a redb file.
pub struct RedbStore {
    db: Database,
    snapshot_limit: usize,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("snapshot_limit", &self.snapshot_limit)
            .finish()
    }
}

impl RedbStore {
    /// Path of the database file inside `data_dir`.
    pub fn db_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DB_FILE)
    }

    /// Opens or creates the database in `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub fn open(data_dir: &Path, snapshot_limit: usize) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        let db_path = Self::db_path(data_dir);
        let db = Database::create(&db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        // Ensure the table exists
        let write_txn = db
            .begin_write()
            .context("Failed to begin initial write transaction")?;
        {
            let _ = write_txn
                .open_table(CODE_TABLE)
                .context("Failed to create code table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initial transaction")?;

        tracing::debug!("Opened code store at {}", db_path.display());
        Ok(Self { db, snapshot_limit })
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;
        let table = read_txn
            .open_table(CODE_TABLE)
            .context("Failed to open code table")?;

        match table
            .get(key)
            .with_context(|| format!("Failed to read '{key}'"))?
        {
            Some(guard) => Ok(Some(guard.value().to_string())),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        {
            let mut table = write_txn
                .open_table(CODE_TABLE)
                .context("Failed to open code table")?;
            table
                .insert(key, value)
                .with_context(|| format!("Failed to write '{key}'"))?;
        }
        write_txn
            .commit()
            .with_context(|| format!("Failed to commit '{key}'"))?;
        Ok(())
    }

    /// Reads, modifies and writes back the snapshot list in one transaction.
    fn update_snapshots<T>(&self, f: impl FnOnce(&mut SnapshotList) -> T) -> Result<T> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;
        let out = {
            let mut table = write_txn
                .open_table(CODE_TABLE)
                .context("Failed to open code table")?;
            let mut list = match table
                .get(SNAPSHOTS_KEY)
                .context("Failed to read snapshot list")?
            {
                Some(guard) => SnapshotList::from_json(guard.value()),
                None => SnapshotList::new(),
            };
            let out = f(&mut list);
            let json = list.to_json()?;
            table
                .insert(SNAPSHOTS_KEY, json.as_str())
                .context("Failed to write snapshot list")?;
            out
        };
        write_txn
            .commit()
            .context("Failed to commit snapshot list")?;
        Ok(out)
    }
}

impl CodeStore for RedbStore {
    fn save_current(&self, content: &str) -> Result<()> {
        self.write(CURRENT_KEY, content)
    }

    fn load_current(&self) -> Result<Option<String>> {
        self.read(CURRENT_KEY)
    }

    fn list_snapshots(&self) -> Result<SnapshotList> {
        Ok(self
            .read(SNAPSHOTS_KEY)?
            .map(|json| SnapshotList::from_json(&json))
            .unwrap_or_default())
    }

    fn save_snapshot(&self, title: Option<&str>, content: &str) -> Result<SavedSnapshot> {
        let limit = self.snapshot_limit;
        let snapshot =
            self.update_snapshots(|list| list.create(title, content, Local::now(), limit))?;
        tracing::info!("Saved snapshot {} ({})", snapshot.id, snapshot.title);
        Ok(snapshot)
    }

    fn delete_snapshot(&self, id: i64) -> Result<Option<SavedSnapshot>> {
        let removed = self.update_snapshots(|list| list.remove(id))?;
        if removed.is_some() {
            tracing::info!("Deleted snapshot {id}");
        }
        Ok(removed)
    }
}
