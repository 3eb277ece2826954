//! Per-slot transfer progress state machine
//!
//! A [`FileProgress`] follows one file on behalf of one display slot. It keeps
//! the latest snapshot and the snapshot that preceded it, which is enough to
//! notice that a transfer has just stopped and to play a short completion
//! animation before the indicator disappears.
//!
//! The tracker performs no I/O and owns no timers. When a render starts the
//! completion animation it hands back a [`ScheduledClear`]; the host runs the
//! delay and reports back through [`FileProgress::on_clear_elapsed`].
//!
//! # Example
//!
//! ```
//! use fileprog::core::file::{FileEntity, LocalFile};
//! use fileprog::core::store::FileStore;
//! use fileprog::core::tracker::{FileProgress, TrackerSettings};
//!
//! let store = FileStore::new();
//! let file = store.update(FileEntity::new(1, 1000).with_local(LocalFile {
//!     is_downloading_active: true,
//!     is_downloading_completed: false,
//!     downloaded_size: 500,
//! }));
//!
//! let mut tracker = FileProgress::new(&store, Some(file), TrackerSettings::default());
//! let render = tracker.render();
//! assert!(render.state.in_progress);
//! assert_eq!(render.state.progress_percent, 50.0);
//! ```

use crate::core::file::{FileId, FileUpdate, Snapshot};
use crate::core::gate::should_refresh;
use crate::core::phase::{progress_params, TrackOptions, TransferPhase};
use crate::core::store::FileSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the settled 0% or 100% indicator stays up after a transfer stops
pub const ANIMATION_COMPLETE_PROGRESS: Duration = Duration::from_millis(300);

/// Snapshot pair owned by one tracker
#[derive(Debug, Clone, Default)]
pub struct TrackerState {
    /// Id the caller last configured, independent of what the store knows
    pub tracked_file_id: Option<FileId>,
    /// Snapshot before the latest update; cleared after the completion animation
    pub previous: Option<Snapshot>,
    pub current: Option<Snapshot>,
}

impl TrackerState {
    fn resolve<S: FileSource + ?Sized>(source: &S, requested: Option<Snapshot>) -> Self {
        let tracked_file_id = requested.as_ref().map(|f| f.id);
        let current = requested.map(|file| source.get(file.id).unwrap_or(file));
        Self {
            tracked_file_id,
            previous: None,
            current,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerSettings {
    #[serde(flatten)]
    pub options: TrackOptions,
    pub show_cancel_control: bool,
    #[serde(with = "duration_ms")]
    pub animation_complete: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            options: TrackOptions::default(),
            show_cancel_control: false,
            animation_complete: ANIMATION_COMPLETE_PROGRESS,
        }
    }
}

/// What the presentation layer draws for one slot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RenderState {
    pub file_id: Option<FileId>,
    pub phase: TransferPhase,
    /// When false the progress UI must be absent, not merely hidden
    pub in_progress: bool,
    pub progress_percent: f64,
    pub show_cancel_control: bool,
}

/// Identifies one scheduled clear of the previous snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClearTicket(u64);

/// Deferred work requested by a render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledClear {
    pub ticket: ClearTicket,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Render {
    pub state: RenderState,
    pub schedule: Option<ScheduledClear>,
}

#[derive(Debug)]
pub struct FileProgress {
    state: TrackerState,
    settings: TrackerSettings,
    rendered: RenderState,
    pending_clear: Option<ClearTicket>,
    /// Settled 0% or 100% frame, held until the pending clear fires
    settled: Option<RenderState>,
    next_ticket: u64,
    alive: bool,
}

impl FileProgress {
    /// Creates a tracker for the caller-supplied file.
    ///
    /// The store's snapshot wins over the caller's when it has one. Nothing is
    /// rendered until [`render`](Self::render) is called.
    pub fn new<S: FileSource + ?Sized>(
        source: &S,
        requested: Option<Snapshot>,
        settings: TrackerSettings,
    ) -> Self {
        Self {
            state: TrackerState::resolve(source, requested),
            settings,
            rendered: RenderState::default(),
            pending_clear: None,
            settled: None,
            next_ticket: 0,
            alive: true,
        }
    }

    /// Creates a tracker for a file known only by id.
    pub fn for_id<S: FileSource + ?Sized>(source: &S, id: FileId, settings: TrackerSettings) -> Self {
        let mut tracker = Self::new(source, source.get(id), settings);
        tracker.state.tracked_file_id = Some(id);
        tracker
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn tracked_file_id(&self) -> Option<FileId> {
        self.state.tracked_file_id
    }

    /// Last state handed to the presentation layer
    pub fn rendered(&self) -> RenderState {
        self.rendered
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// Points the tracker at a different file.
    ///
    /// Same id (or no file) is a no-op. A new id drops the previous snapshot
    /// and invalidates any clear scheduled for the old file. A retarget always
    /// renders, even when the gate would suppress the refresh, so the
    /// published state never names the old file.
    pub fn retarget<S: FileSource + ?Sized>(
        &mut self,
        source: &S,
        requested: Option<Snapshot>,
    ) -> Option<Render> {
        let requested = requested?;
        if !self.alive || self.state.tracked_file_id == Some(requested.id) {
            return None;
        }

        tracing::debug!(
            from = ?self.state.tracked_file_id,
            to = requested.id,
            "Retargeting file progress"
        );
        self.cancel_clear();
        let candidate = TrackerState::resolve(source, Some(requested));
        self.apply(candidate).or_else(|| Some(self.render()))
    }

    /// Applies a store notification. Updates for other files are ignored.
    pub fn on_update(&mut self, update: &FileUpdate) -> Option<Render> {
        if !self.alive {
            return None;
        }
        let current = self.state.current.as_ref()?;
        if current.id != update.file.id {
            tracing::trace!(
                tracked = current.id,
                file_id = update.file.id,
                "Ignoring update for other file"
            );
            return None;
        }

        let candidate = TrackerState {
            tracked_file_id: self.state.tracked_file_id,
            previous: self.state.current.clone(),
            current: Some(update.file.clone()),
        };
        self.apply(candidate)
    }

    /// Completion animation window elapsed.
    ///
    /// Stale tickets (from a retarget or an earlier window) and torn down
    /// trackers are no-ops.
    pub fn on_clear_elapsed(&mut self, ticket: ClearTicket) -> Option<Render> {
        if !self.alive || self.pending_clear != Some(ticket) {
            tracing::trace!(?ticket, "Dropping stale progress clear");
            return None;
        }
        self.cancel_clear();
        if self.state.previous.is_none() {
            return None;
        }

        let candidate = TrackerState {
            previous: None,
            ..self.state.clone()
        };
        self.apply(candidate)
    }

    /// Computes what to draw, scheduling the clear at most once per
    /// completion transition.
    ///
    /// Once the animation has started the settled frame stays up until the
    /// clear fires, even if later notifications shift the previous snapshot
    /// past the active one.
    pub fn render(&mut self) -> Render {
        let params = progress_params(
            self.state.current.as_deref(),
            self.state.previous.as_deref(),
            self.settings.options,
        );
        let in_progress = params.in_progress();

        let mut schedule = None;
        if params.start_complete_animation() && self.alive && self.pending_clear.is_none() {
            let ticket = ClearTicket(self.next_ticket);
            self.next_ticket += 1;
            self.pending_clear = Some(ticket);
            schedule = Some(ScheduledClear {
                ticket,
                delay: self.settings.animation_complete,
            });
            tracing::debug!(
                file_id = ?self.state.tracked_file_id,
                phase = %params.phase,
                completed = params.is_completed,
                "Transfer stopped, starting completion animation"
            );
        }

        let file_id = self.state.current.as_ref().map(|f| f.id);
        self.rendered = match self.settled {
            Some(settled) if !in_progress && self.pending_clear.is_some() => RenderState {
                file_id,
                ..settled
            },
            _ => RenderState {
                file_id,
                phase: params.phase,
                in_progress,
                progress_percent: if in_progress { params.percent() } else { 0.0 },
                show_cancel_control: in_progress && self.settings.show_cancel_control,
            },
        };
        if params.start_complete_animation() && self.pending_clear.is_some() {
            self.settled = Some(self.rendered);
        }

        Render {
            state: self.rendered,
            schedule,
        }
    }

    /// Stops the tracker. Later notifications and clears do nothing.
    pub fn teardown(&mut self) {
        self.alive = false;
        self.cancel_clear();
    }

    fn cancel_clear(&mut self) {
        self.pending_clear = None;
        self.settled = None;
    }

    fn apply(&mut self, candidate: TrackerState) -> Option<Render> {
        let refresh = should_refresh(&self.state, &candidate, self.settings.options);
        self.state = candidate;
        refresh.then(|| self.render())
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        #[allow(clippy::cast_possible_truncation)]
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
