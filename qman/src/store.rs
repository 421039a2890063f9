//! In-memory queue store with full-file persistence.
//!
//! Mutations are serialized on the control thread. Every save rewrites the
//! whole file from the in-memory collection, staged through a sibling temp
//! path and renamed so readers never observe a partial file.

use std::fs;
use std::path::{Path, PathBuf};

use ccdobs::{decode, encode, Queue, QueueCollection, QueueRow, RejectedLine, CURRENT_QUEUE_NAME};
use tracing::{info, warn};

use crate::error::StoreError;

/// All named queues, backed by one CCDOBS queue file.
#[derive(Debug)]
pub struct QueueStore {
    path: PathBuf,
    queues: QueueCollection,
}

impl QueueStore {
    /// Open a store backed by `path`, loading existing content.
    ///
    /// A missing or unreadable file degrades to an empty collection with a
    /// warning; per-line parse rejects are returned for surfacing to the
    /// operator.
    pub fn open(path: impl Into<PathBuf>) -> (Self, Vec<RejectedLine>) {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let decoded = decode(&text);
                let store = Self {
                    path,
                    queues: decoded.collection,
                };
                (store, decoded.rejected)
            }
            Err(e) => {
                warn!("cannot read queue file {}: {}", path.display(), e);
                let store = Self {
                    path,
                    queues: QueueCollection::new(),
                };
                (store, Vec::new())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot of the whole collection.
    pub fn collection(&self) -> QueueCollection {
        self.queues.clone()
    }

    /// Snapshot of one queue.
    pub fn get(&self, name: &str) -> Option<Queue> {
        self.queues.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.queues.contains(name)
    }

    /// Queue names sorted case-insensitively.
    pub fn list_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .queues
            .iter()
            .map(|q| q.name.clone())
            .collect();
        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()));
        names
    }

    /// Add a new named queue.
    ///
    /// Fails with [`StoreError::DuplicateName`] if the name is taken; the
    /// reserved name is always replaceable.
    pub fn add(&mut self, name: &str, rows: Vec<QueueRow>) -> Result<(), StoreError> {
        if name != CURRENT_QUEUE_NAME && self.queues.contains(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        self.queues.insert(Queue::with_rows(name, rows));
        Ok(())
    }

    /// Remove a queue. Removing the reserved name is permitted and leaves
    /// no current queue until the next promotion.
    pub fn remove(&mut self, name: &str) -> Result<Queue, StoreError> {
        self.queues
            .remove(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Rename a queue.
    ///
    /// Collisions with an existing non-reserved queue fail with
    /// [`StoreError::DuplicateName`]; renaming onto the reserved name
    /// replaces the current queue.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        if !self.queues.contains(old) {
            return Err(StoreError::NotFound(old.to_string()));
        }
        if new != old && new != CURRENT_QUEUE_NAME && self.queues.contains(new) {
            return Err(StoreError::DuplicateName(new.to_string()));
        }
        if new == CURRENT_QUEUE_NAME {
            self.queues.remove(CURRENT_QUEUE_NAME);
        }
        if let Some(mut queue) = self.queues.remove(old) {
            queue.name = new.to_string();
            self.queues.insert(queue);
        }
        Ok(())
    }

    /// Atomically substitute the reserved current queue with one built
    /// from `rows`. Always leaves exactly one queue under the reserved
    /// name.
    pub fn promote_to_current(&mut self, rows: Vec<QueueRow>) {
        self.queues.replace_current(rows);
    }

    /// Rewrite the backing file from the in-memory collection.
    pub fn save(&self) -> Result<(), StoreError> {
        let text = encode(&self.queues);
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, text)?;
        fs::rename(&temp, &self.path)?;
        info!("queue file saved: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(number: u32) -> QueueRow {
        QueueRow {
            number,
            image_type: "Image".to_string(),
            filter: "V".to_string(),
            exposure: 30.0,
            readout: "16".to_string(),
        }
    }

    fn test_store() -> QueueStore {
        let (mut store, _) = QueueStore::open("unused.lst");
        store.add("M31", vec![row(1)]).unwrap();
        store.add("M42", vec![row(1), row(2)]).unwrap();
        store
    }

    #[test]
    fn test_open_missing_file_degrades_to_empty() {
        let (store, rejected) = QueueStore::open("/nonexistent/ccdobs.lst");
        assert!(rejected.is_empty());
        assert!(store.collection().is_empty());
    }

    #[test]
    fn test_add_duplicate_leaves_store_unchanged() {
        let mut store = test_store();
        let before = store.collection();

        let err = store.add("M31", vec![row(1), row(2)]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(store.collection(), before);
    }

    #[test]
    fn test_add_reserved_name_always_replaceable() {
        let mut store = test_store();
        store.add(CURRENT_QUEUE_NAME, vec![row(1)]).unwrap();
        store.add(CURRENT_QUEUE_NAME, vec![row(1), row(2)]).unwrap();
        assert!(store.contains(CURRENT_QUEUE_NAME));
        assert_eq!(store.get(CURRENT_QUEUE_NAME).unwrap().rows.len(), 2);
    }

    #[test]
    fn test_remove_missing_leaves_store_unchanged() {
        let mut store = test_store();
        let before = store.collection();

        let err = store.remove("NGC 7000").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert_eq!(store.collection(), before);
    }

    #[test]
    fn test_remove_reserved_queue_is_permitted() {
        let mut store = test_store();
        store.promote_to_current(vec![row(1)]);
        store.remove(CURRENT_QUEUE_NAME).unwrap();
        assert!(store.get(CURRENT_QUEUE_NAME).is_none());
    }

    #[test]
    fn test_rename_collision_keeps_source_intact() {
        let mut store = test_store();

        let err = store.rename("M31", "M42").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName(_)));
        assert_eq!(store.get("M31").unwrap().rows.len(), 1);
        assert_eq!(store.get("M42").unwrap().rows.len(), 2);
    }

    #[test]
    fn test_rename_moves_rows() {
        let mut store = test_store();
        store.rename("M31", "Andromeda").unwrap();
        assert!(store.get("M31").is_none());
        assert_eq!(store.get("Andromeda").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_promote_always_leaves_one_current_queue() {
        let mut store = test_store();
        assert!(store.get(CURRENT_QUEUE_NAME).is_none());

        for n in 1..4 {
            store.promote_to_current(vec![row(n)]);
            let reserved: Vec<String> = store
                .list_names()
                .into_iter()
                .filter(|name| name == CURRENT_QUEUE_NAME)
                .collect();
            assert_eq!(reserved.len(), 1);
        }
    }

    #[test]
    fn test_list_names_sorted_case_insensitively() {
        let (mut store, _) = QueueStore::open("unused.lst");
        store.add("beta", vec![]).unwrap();
        store.add("Alpha", vec![]).unwrap();
        store.promote_to_current(vec![]);

        assert_eq!(
            store.list_names(),
            vec![CURRENT_QUEUE_NAME.to_string(), "Alpha".to_string(), "beta".to_string()]
        );
    }

    #[test]
    fn test_snapshots_do_not_alias_the_store() {
        let store = test_store();
        let mut snapshot = store.get("M31").unwrap();
        snapshot.rows.clear();
        assert_eq!(store.get("M31").unwrap().rows.len(), 1);
    }

    #[test]
    fn test_save_and_reopen_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ccdobs.lst");

        let (mut store, _) = QueueStore::open(&path);
        store.add("M31", vec![row(1)]).unwrap();
        store.promote_to_current(vec![row(1), row(2)]);
        store.save().unwrap();

        let (reloaded, rejected) = QueueStore::open(&path);
        assert!(rejected.is_empty());
        assert_eq!(reloaded.collection(), store.collection());
        // Staging file is gone after the rename
        assert!(!path.with_extension("tmp").exists());
    }
}
