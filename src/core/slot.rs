//! Async binding of a tracker to a shared store
//!
//! A [`ProgressSlot`] is what a display slot holds on to. It subscribes to the
//! [`FileStore`] on creation, feeds every notification through the tracker,
//! publishes refreshed [`RenderState`]s over a `watch` channel and runs the
//! completion-animation delay on the tokio runtime it was created in.
//!
//! Dropping (or [`close`](ProgressSlot::close)-ing) the slot unsubscribes and
//! tears the tracker down; a delay still in flight then finds a dead tracker
//! and does nothing.

use crate::core::error::{Error, Result};
use crate::core::file::{FileUpdate, Snapshot, same_snapshot};
use crate::core::store::{FileSource, FileStore, ListenerId};
use crate::core::tracker::{FileProgress, Render, RenderState, TrackerSettings, TrackerState};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;

struct Shared {
    tracker: Mutex<FileProgress>,
    publisher: watch::Sender<RenderState>,
    runtime: Handle,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FileProgress> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a refresh and starts its delay, if any.
    ///
    /// Called with the tracker lock held so that renders reach subscribers in
    /// the order they were produced.
    fn publish(self: &Arc<Self>, render: Option<Render>) {
        let Some(render) = render else {
            return;
        };
        self.publisher.send_replace(render.state);

        if let Some(clear) = render.schedule {
            let weak: Weak<Self> = Arc::downgrade(self);
            self.runtime.spawn(async move {
                tokio::time::sleep(clear.delay).await;
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let mut tracker = shared.lock();
                let render = tracker.on_clear_elapsed(clear.ticket);
                shared.publish(render);
            });
        }
    }

    fn on_update(self: &Arc<Self>, update: &FileUpdate) {
        let mut tracker = self.lock();
        // The attach catch-up may already have applied this exact snapshot
        if same_snapshot(tracker.state().current.as_ref(), Some(&update.file)) {
            return;
        }
        let render = tracker.on_update(update);
        self.publish(render);
    }

    /// Applies whatever the store wrote between the tracker's initial read
    /// and the listener being registered.
    fn catch_up(self: &Arc<Self>, store: &FileStore) {
        let mut tracker = self.lock();
        let Some(current) = tracker.state().current.clone() else {
            return;
        };
        let Some(latest) = store.get(current.id) else {
            return;
        };
        if Arc::ptr_eq(&current, &latest) {
            return;
        }

        tracing::debug!(file_id = current.id, "Store changed while attaching, catching up");
        let render = tracker.on_update(&FileUpdate { file: latest });
        self.publish(render);
    }
}

pub struct ProgressSlot {
    store: Arc<FileStore>,
    shared: Arc<Shared>,
    listener: Option<ListenerId>,
    updates: watch::Receiver<RenderState>,
}

impl std::fmt::Debug for ProgressSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSlot")
            .field("listener", &self.listener)
            .field("state", &*self.updates.borrow())
            .finish_non_exhaustive()
    }
}

impl ProgressSlot {
    /// Binds a new tracker for `requested` to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] when called outside a tokio runtime, since
    /// the completion delay needs one.
    pub fn spawn(
        store: Arc<FileStore>,
        requested: Option<Snapshot>,
        settings: TrackerSettings,
    ) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| Error::Runtime(e.to_string()))?;

        let mut tracker = FileProgress::new(&*store, requested, settings);
        let initial = tracker.render();
        let (publisher, updates) = watch::channel(initial.state);

        let shared = Arc::new(Shared {
            tracker: Mutex::new(tracker),
            publisher,
            runtime,
        });

        let weak = Arc::downgrade(&shared);
        let listener = store.subscribe(move |update| {
            if let Some(shared) = weak.upgrade() {
                shared.on_update(update);
            }
        });
        shared.catch_up(&store);

        tracing::debug!(
            file_id = ?initial.state.file_id,
            in_progress = initial.state.in_progress,
            "Progress slot attached"
        );

        Ok(Self {
            store,
            shared,
            listener: Some(listener),
            updates,
        })
    }

    /// Latest published render state
    pub fn state(&self) -> RenderState {
        *self.updates.borrow()
    }

    /// Receiver that wakes whenever the gate lets a refresh through
    pub fn subscribe(&self) -> watch::Receiver<RenderState> {
        self.updates.clone()
    }

    /// Copy of the tracker's snapshot pair
    pub fn tracker_state(&self) -> TrackerState {
        self.shared.lock().state().clone()
    }

    pub fn has_pending_clear(&self) -> bool {
        self.shared.lock().has_pending_clear()
    }

    /// Points the slot at another file. See [`FileProgress::retarget`].
    pub fn retarget(&self, requested: Option<Snapshot>) {
        let mut tracker = self.shared.lock();
        let render = tracker.retarget(&*self.store, requested);
        self.shared.publish(render);
    }

    /// Unsubscribes and tears the tracker down.
    pub fn close(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if let Some(listener) = self.listener.take() {
            self.store.unsubscribe(listener);
            self.shared.lock().teardown();
            tracing::debug!("Progress slot detached");
        }
    }
}

impl Drop for ProgressSlot {
    fn drop(&mut self) {
        self.detach();
    }
}
