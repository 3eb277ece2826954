//! Refresh-suppression policy
//!
//! [`should_refresh`] decides whether a candidate tracker state is worth a
//! visual refresh. It runs on every store notification, so it only compares
//! flags and pointers.

use crate::core::file::same_snapshot;
use crate::core::phase::{
    TrackOptions, TransferPhase, derive_phase, has_download_activity, has_upload_activity,
};
use crate::core::tracker::TrackerState;

pub fn should_refresh(old: &TrackerState, candidate: &TrackerState, options: TrackOptions) -> bool {
    if is_untracked_activity(old, candidate, options) {
        return false;
    }

    if is_completion_echo(old, candidate) {
        return false;
    }

    !same_snapshot(candidate.current.as_ref(), old.current.as_ref())
        || !same_snapshot(candidate.previous.as_ref(), old.previous.as_ref())
}

/// Activity in a direction the caller does not track.
///
/// Only suppresses while neither state has a tracked phase. Once a tracked
/// transfer was on screen the candidate must get through so the indicator can
/// be hidden.
fn is_untracked_activity(
    old: &TrackerState,
    candidate: &TrackerState,
    options: TrackOptions,
) -> bool {
    let current = candidate.current.as_deref();
    let previous = candidate.previous.as_deref();

    if derive_phase(current, previous, options) != TransferPhase::Idle
        || derive_phase(old.current.as_deref(), old.previous.as_deref(), options)
            != TransferPhase::Idle
    {
        return false;
    }

    (!options.track_download && has_download_activity(current, previous))
        || (!options.track_upload && has_upload_activity(current, previous))
}

/// The store reports a finished download once for completion and again when
/// the secondary key is attached. The second report must not flash the UI.
fn is_completion_echo(old: &TrackerState, candidate: &TrackerState) -> bool {
    let (Some(next), Some(current)) = (candidate.current.as_deref(), old.current.as_deref()) else {
        return false;
    };
    if next.id != current.id {
        return false;
    }

    let Some(prev) = old.previous.as_deref() else {
        return false;
    };
    let (Some(prev_local), Some(next_local)) = (prev.local.as_ref(), next.local.as_ref()) else {
        return false;
    };

    let download_completed =
        !prev_local.is_downloading_completed && next_local.is_downloading_completed;
    let key_arrived = next.has_idb_key() && !prev.has_idb_key();

    download_completed && key_arrived
}
