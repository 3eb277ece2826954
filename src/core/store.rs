//! Process-wide file registry with push notifications
//!
//! The store owns the latest snapshot of every known file. Writers call
//! [`FileStore::update`], which replaces the snapshot and notifies every
//! listener with a [`FileUpdate`]. Listeners receive updates for all files and
//! filter by id themselves.
//!
//! Listeners are invoked on the writer's thread after all internal locks have
//! been released, so a listener may freely call back into the store.

use crate::core::file::{FileEntity, FileId, FileUpdate, Snapshot};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Read access to current file snapshots.
///
/// The tracker only needs lookups; keeping this as a trait lets tests and
/// hosts with their own registries supply snapshots directly.
pub trait FileSource {
    fn get(&self, id: FileId) -> Option<Snapshot>;
}

/// Token returned by [`FileStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&FileUpdate) + Send + Sync>;

#[derive(Default)]
pub struct FileStore {
    files: RwLock<HashMap<FileId, Snapshot>>,
    listeners: Mutex<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("files", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot for `file.id` and notifies listeners.
    ///
    /// Returns the snapshot that was stored, so callers can keep the exact
    /// allocation that listeners observed.
    pub fn update(&self, file: impl Into<Snapshot>) -> Snapshot {
        let file: Snapshot = file.into();
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file.id, Arc::clone(&file));

        let listeners: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        tracing::trace!(
            file_id = file.id,
            listeners = listeners.len(),
            "Publishing file update"
        );

        let update = FileUpdate {
            file: Arc::clone(&file),
        };
        for listener in listeners {
            listener(&update);
        }
        file
    }

    /// Drops a file from the registry without notifying anyone.
    pub fn remove(&self, id: FileId) -> Option<Snapshot> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&FileUpdate) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push((id, Arc::new(listener)));
        tracing::debug!(listener = id.0, "File store listener added");
        id
    }

    /// Removes a listener. Returns `false` if the token was unknown.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        let removed = listeners.len() != before;
        if removed {
            tracing::debug!(listener = id.0, "File store listener removed");
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileSource for FileStore {
    fn get(&self, id: FileId) -> Option<Snapshot> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

impl<S: FileSource + ?Sized> FileSource for Arc<S> {
    fn get(&self, id: FileId) -> Option<Snapshot> {
        (**self).get(id)
    }
}

/// Fixed set of snapshots, mostly useful in tests and one-off renders
impl FileSource for HashMap<FileId, Snapshot> {
    fn get(&self, id: FileId) -> Option<Snapshot> {
        HashMap::get(self, &id).cloned()
    }
}

/// Source that knows no files; the tracker falls back to caller snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFiles;

impl FileSource for NoFiles {
    fn get(&self, _id: FileId) -> Option<Snapshot> {
        None
    }
}

impl From<Vec<FileEntity>> for FileStore {
    fn from(files: Vec<FileEntity>) -> Self {
        let store = Self::new();
        {
            let mut map = store.files.write().unwrap_or_else(PoisonError::into_inner);
            for file in files {
                map.insert(file.id, Arc::new(file));
            }
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_get_returns_stored_allocation() {
        let store = FileStore::new();
        let stored = store.update(FileEntity::new(1, 10));
        let fetched = store.get(1).unwrap();
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_listeners_see_every_update() {
        let store = FileStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.update(FileEntity::new(1, 10));
        store.update(FileEntity::new(2, 10));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = FileStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.update(FileEntity::new(1, 10));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_read_store_during_notification() {
        let store = Arc::new(FileStore::new());
        let inner = Arc::clone(&store);
        let observed = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&observed);
        store.subscribe(move |update| {
            if inner.get(update.file.id).is_some() {
                flag.fetch_add(1, Ordering::SeqCst);
            }
        });

        store.update(FileEntity::new(5, 1));
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_from_vec_seeds_without_notifying() {
        let store = FileStore::from(vec![FileEntity::new(1, 1), FileEntity::new(2, 2)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(2).unwrap().size, 2);
    }
}
