//! Snapshot builders shared by the core unit tests

use crate::core::file::{FileEntity, FileId, LocalFile, RemoteFile};

pub fn downloading(id: FileId, size: u64, downloaded: u64) -> FileEntity {
    FileEntity::new(id, size).with_local(LocalFile {
        is_downloading_active: true,
        is_downloading_completed: false,
        downloaded_size: downloaded,
    })
}

pub fn completed_download(id: FileId, size: u64) -> FileEntity {
    FileEntity::new(id, size).with_local(LocalFile {
        is_downloading_active: false,
        is_downloading_completed: true,
        downloaded_size: size,
    })
}

pub fn uploading(id: FileId, size: u64, uploaded: u64) -> FileEntity {
    FileEntity::new(id, size).with_remote(RemoteFile {
        is_uploading_active: true,
        is_uploading_completed: false,
        uploaded_size: uploaded,
    })
}

pub fn completed_upload(id: FileId, size: u64) -> FileEntity {
    FileEntity::new(id, size).with_remote(RemoteFile {
        is_uploading_active: false,
        is_uploading_completed: true,
        uploaded_size: size,
    })
}

/// File known to the store with no transfer running
pub fn idle(id: FileId, size: u64) -> FileEntity {
    FileEntity::new(id, size).with_local(LocalFile::default())
}
