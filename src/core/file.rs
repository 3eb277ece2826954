//! File entity snapshots as published by the file store
//!
//! A [`FileEntity`] is an immutable snapshot. The store hands out
//! [`Arc<FileEntity>`](std::sync::Arc) so that trackers can tell two snapshots
//! apart by identity, which is what the render gate compares.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique file identifier assigned by the store.
pub type FileId = i64;

/// Shared, immutable file snapshot.
pub type Snapshot = Arc<FileEntity>;

/// Download half of a file's transfer state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFile {
    #[serde(default)]
    pub is_downloading_active: bool,
    #[serde(default)]
    pub is_downloading_completed: bool,
    #[serde(default)]
    pub downloaded_size: u64,
}

/// Upload half of a file's transfer state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub is_uploading_active: bool,
    #[serde(default)]
    pub is_uploading_completed: bool,
    #[serde(default)]
    pub uploaded_size: u64,
}

/// One file's transfer state as known to the store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntity {
    pub id: FileId,
    /// Total size in bytes, 0 when unknown
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<LocalFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteFile>,
    /// Secondary storage key, attached by the store after a download completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idb_key: Option<String>,
}

impl FileEntity {
    pub fn new(id: FileId, size: u64) -> Self {
        Self {
            id,
            size,
            ..Default::default()
        }
    }

    pub fn with_local(mut self, local: LocalFile) -> Self {
        self.local = Some(local);
        self
    }

    pub fn with_remote(mut self, remote: RemoteFile) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_idb_key(mut self, key: impl Into<String>) -> Self {
        self.idb_key = Some(key.into());
        self
    }

    pub fn is_downloading_active(&self) -> bool {
        self.local.as_ref().is_some_and(|l| l.is_downloading_active)
    }

    pub fn is_downloading_completed(&self) -> bool {
        self.local.as_ref().is_some_and(|l| l.is_downloading_completed)
    }

    pub fn is_uploading_active(&self) -> bool {
        self.remote.as_ref().is_some_and(|r| r.is_uploading_active)
    }

    pub fn is_uploading_completed(&self) -> bool {
        self.remote.as_ref().is_some_and(|r| r.is_uploading_completed)
    }

    pub fn downloaded_size(&self) -> u64 {
        self.local.as_ref().map_or(0, |l| l.downloaded_size)
    }

    pub fn uploaded_size(&self) -> u64 {
        self.remote.as_ref().map_or(0, |r| r.uploaded_size)
    }

    pub fn has_idb_key(&self) -> bool {
        self.idb_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Store notification payload
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub file: Snapshot,
}

impl FileUpdate {
    pub fn new(file: impl Into<Snapshot>) -> Self {
        Self { file: file.into() }
    }
}

/// Identity comparison for optional snapshots.
///
/// Two snapshots are the same only if they are the same allocation; equal
/// values published separately by the store count as a change.
pub fn same_snapshot(a: Option<&Snapshot>, b: Option<&Snapshot>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sub_records_read_as_idle() {
        let file = FileEntity::new(7, 100);
        assert!(!file.is_downloading_active());
        assert!(!file.is_uploading_active());
        assert_eq!(file.downloaded_size(), 0);
        assert_eq!(file.uploaded_size(), 0);
    }

    #[test]
    fn test_empty_idb_key_is_not_a_key() {
        let file = FileEntity::new(1, 0).with_idb_key("");
        assert!(!file.has_idb_key());
        assert!(FileEntity::new(1, 0).with_idb_key("k").has_idb_key());
    }

    #[test]
    fn test_same_snapshot_is_identity_not_value() {
        let a: Snapshot = Arc::new(FileEntity::new(1, 10));
        let b: Snapshot = Arc::new(FileEntity::new(1, 10));
        assert!(same_snapshot(Some(&a), Some(&a.clone())));
        assert!(!same_snapshot(Some(&a), Some(&b)));
        assert!(same_snapshot(None, None));
        assert!(!same_snapshot(Some(&a), None));
    }

    #[test]
    fn test_deserialize_partial_entity() {
        let file: FileEntity = serde_json::from_str(
            r#"{"id": 3, "size": 1000, "local": {"is_downloading_active": true, "downloaded_size": 250}}"#,
        )
        .unwrap();
        assert!(file.is_downloading_active());
        assert!(!file.is_downloading_completed());
        assert_eq!(file.downloaded_size(), 250);
        assert!(file.remote.is_none());
    }
}
