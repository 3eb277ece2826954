//! Transfer phase derivation and progress arithmetic
//!
//! Everything here is a pure function of two snapshots and the caller's
//! tracking flags. The tracker calls into this module on every render and the
//! render gate calls it on every candidate state, so nothing here allocates.

use crate::core::file::FileEntity;
use serde::{Deserialize, Serialize};

/// Which transfer directions a display slot cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackOptions {
    pub track_download: bool,
    pub track_upload: bool,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            track_download: true,
            track_upload: false,
        }
    }
}

impl TrackOptions {
    pub fn download_only() -> Self {
        Self::default()
    }

    pub fn upload_only() -> Self {
        Self {
            track_download: false,
            track_upload: true,
        }
    }

    pub fn both() -> Self {
        Self {
            track_download: true,
            track_upload: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransferPhase {
    #[default]
    Idle,
    Downloading,
    Uploading,
}

/// Flattened view of the tracked transfer direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressParams {
    pub phase: TransferPhase,
    pub was_active: bool,
    pub is_active: bool,
    pub is_completed: bool,
    pub progress_size: u64,
    pub size: u64,
}

impl ProgressParams {
    /// The transfer stopped being active since the previous snapshot,
    /// either by finishing or by being cancelled.
    pub fn start_complete_animation(&self) -> bool {
        self.was_active && !self.is_active
    }

    pub fn in_progress(&self) -> bool {
        self.is_active || self.start_complete_animation()
    }

    /// Percentage to display, 0..=100.
    pub fn percent(&self) -> f64 {
        if self.start_complete_animation() {
            return if self.is_completed { 100.0 } else { 0.0 };
        }
        if self.is_active {
            return active_percent(self.progress_size, self.size);
        }
        0.0
    }
}

/// Percentage for an active transfer.
///
/// Without byte-level data (either size unknown or nothing transferred yet)
/// this returns 1 so a spinner still shows motion.
pub fn active_percent(progress_size: u64, size: u64) -> f64 {
    if progress_size == 0 || size == 0 {
        return 1.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let (progress_size, size) = (progress_size as f64, size as f64);
    let percent = 100.0 - ((size - progress_size) / size) * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Download activity in either snapshot, regardless of what the caller tracks
pub fn has_download_activity(current: Option<&FileEntity>, previous: Option<&FileEntity>) -> bool {
    previous.is_some_and(FileEntity::is_downloading_active)
        || current.is_some_and(FileEntity::is_downloading_active)
}

/// Upload activity in either snapshot, regardless of what the caller tracks
pub fn has_upload_activity(current: Option<&FileEntity>, previous: Option<&FileEntity>) -> bool {
    previous.is_some_and(FileEntity::is_uploading_active)
        || current.is_some_and(FileEntity::is_uploading_active)
}

/// Picks the tracked transfer direction. Download is checked first and wins
/// when both directions are tracked and active.
pub fn derive_phase(
    current: Option<&FileEntity>,
    previous: Option<&FileEntity>,
    options: TrackOptions,
) -> TransferPhase {
    if options.track_download && has_download_activity(current, previous) {
        TransferPhase::Downloading
    } else if options.track_upload && has_upload_activity(current, previous) {
        TransferPhase::Uploading
    } else {
        TransferPhase::Idle
    }
}

pub fn progress_params(
    current: Option<&FileEntity>,
    previous: Option<&FileEntity>,
    options: TrackOptions,
) -> ProgressParams {
    // No file means nothing to render, whatever the previous snapshot says.
    let Some(file) = current else {
        return ProgressParams::default();
    };

    let phase = derive_phase(current, previous, options);
    match phase {
        TransferPhase::Downloading => ProgressParams {
            phase,
            was_active: previous.is_some_and(FileEntity::is_downloading_active),
            is_active: file.is_downloading_active(),
            is_completed: file.is_downloading_completed(),
            progress_size: file.downloaded_size(),
            size: file.size,
        },
        TransferPhase::Uploading => ProgressParams {
            phase,
            was_active: previous.is_some_and(FileEntity::is_uploading_active),
            is_active: file.is_uploading_active(),
            is_completed: file.is_uploading_completed(),
            progress_size: file.uploaded_size(),
            size: file.size,
        },
        TransferPhase::Idle => ProgressParams::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file::{LocalFile, RemoteFile};

    fn downloading(id: i64, size: u64, done: u64) -> FileEntity {
        FileEntity::new(id, size).with_local(LocalFile {
            is_downloading_active: true,
            is_downloading_completed: false,
            downloaded_size: done,
        })
    }

    fn uploading(id: i64, size: u64, done: u64) -> FileEntity {
        FileEntity::new(id, size).with_remote(RemoteFile {
            is_uploading_active: true,
            is_uploading_completed: false,
            uploaded_size: done,
        })
    }

    #[test]
    fn test_half_downloaded() {
        let file = downloading(1, 1000, 500);
        let params = progress_params(Some(&file), None, TrackOptions::default());
        assert_eq!(params.phase, TransferPhase::Downloading);
        assert!(params.in_progress());
        assert_eq!(params.percent(), 50.0);
    }

    #[test]
    fn test_zero_size_shows_placeholder() {
        let file = downloading(1, 0, 0);
        let params = progress_params(Some(&file), None, TrackOptions::default());
        let percent = params.percent();
        assert_eq!(percent, 1.0);
        assert!(percent.is_finite());
    }

    #[test]
    fn test_untracked_direction_is_idle() {
        let file = uploading(1, 100, 10);
        let params = progress_params(Some(&file), None, TrackOptions::download_only());
        assert_eq!(params.phase, TransferPhase::Idle);
        assert!(!params.in_progress());
        assert_eq!(params.percent(), 0.0);
    }

    #[test]
    fn test_download_wins_tie() {
        let file = downloading(1, 100, 10).with_remote(RemoteFile {
            is_uploading_active: true,
            is_uploading_completed: false,
            uploaded_size: 90,
        });
        let params = progress_params(Some(&file), None, TrackOptions::both());
        assert_eq!(params.phase, TransferPhase::Downloading);
        assert!((params.percent() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_animation_after_active() {
        let before = downloading(1, 1000, 500);
        let after = FileEntity::new(1, 1000).with_local(LocalFile {
            is_downloading_active: false,
            is_downloading_completed: true,
            downloaded_size: 1000,
        });
        let params = progress_params(Some(&after), Some(&before), TrackOptions::default());
        assert!(params.start_complete_animation());
        assert!(params.in_progress());
        assert_eq!(params.percent(), 100.0);
    }

    #[test]
    fn test_cancelled_transfer_settles_at_zero() {
        let before = uploading(1, 1000, 300);
        let after = FileEntity::new(1, 1000).with_remote(RemoteFile::default());
        let params = progress_params(Some(&after), Some(&before), TrackOptions::upload_only());
        assert_eq!(params.phase, TransferPhase::Uploading);
        assert!(params.start_complete_animation());
        assert_eq!(params.percent(), 0.0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(TransferPhase::Downloading.to_string(), "downloading");
        assert_eq!(TransferPhase::Idle.to_string(), "idle");
    }
}
