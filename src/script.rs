//! Replay scripts for exercising a progress slot outside a UI
//!
//! A script seeds a store, attaches one slot and then walks through a list of
//! steps. Every state the slot publishes is recorded as a [`Frame`].
//!
//! ```json
//! {
//!   "file": {"id": 1, "size": 1000},
//!   "steps": [
//!     {"update": {"id": 1, "size": 1000, "local": {"is_downloading_active": true, "downloaded_size": 500}}},
//!     {"update": {"id": 1, "size": 1000, "local": {"is_downloading_completed": true, "downloaded_size": 1000}}},
//!     {"wait_ms": 400}
//!   ]
//! }
//! ```

use crate::core::error::{Error, Result};
use crate::core::file::{FileEntity, LocalFile, RemoteFile};
use crate::core::slot::ProgressSlot;
use crate::core::store::FileStore;
use crate::core::tracker::{RenderState, TrackerSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Longest single wait a script may ask for
pub const MAX_WAIT_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Publish a new snapshot through the store
    Update(FileEntity),
    /// Point the slot at another file
    Retarget(FileEntity),
    /// Let time pass so scheduled work can run
    WaitMs(u64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Files present in the store before the slot attaches
    #[serde(default)]
    pub seed: Vec<FileEntity>,
    /// File the slot is created for
    #[serde(default)]
    pub file: Option<FileEntity>,
    pub steps: Vec<Step>,
}

/// One published render state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    /// Step that produced this frame; `None` for the initial render
    pub step: Option<usize>,
    pub state: RenderState,
}

impl Script {
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::script(0, "script has no steps"));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if let Step::WaitMs(ms) = step
                && *ms > MAX_WAIT_MS
            {
                return Err(Error::script(
                    index,
                    format!("wait of {ms}ms exceeds {MAX_WAIT_MS}ms"),
                ));
            }
        }
        Ok(())
    }
}

pub async fn load_script(path: &Path) -> Result<Script> {
    let json = tokio::fs::read_to_string(path).await?;
    let script: Script = serde_json::from_str(&json)?;
    script.validate()?;
    Ok(script)
}

/// Runs `script` against a fresh store and returns every published state.
pub async fn run_script(script: &Script, settings: TrackerSettings) -> Result<Vec<Frame>> {
    script.validate()?;

    let store = Arc::new(FileStore::from(script.seed.clone()));
    let requested = script.file.clone().map(Arc::new);
    let slot = ProgressSlot::spawn(Arc::clone(&store), requested, settings)?;
    let mut updates = slot.subscribe();

    let mut frames = vec![Frame {
        step: None,
        state: *updates.borrow_and_update(),
    }];

    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Update(file) => {
                store.update(file.clone());
            }
            Step::Retarget(file) => slot.retarget(Some(Arc::new(file.clone()))),
            Step::WaitMs(ms) => tokio::time::sleep(Duration::from_millis(*ms)).await,
        }

        if updates.has_changed().unwrap_or(false) {
            frames.push(Frame {
                step: Some(index),
                state: *updates.borrow_and_update(),
            });
        }
    }

    tracing::debug!(steps = script.steps.len(), frames = frames.len(), "Script finished");
    slot.close();
    Ok(frames)
}

/// Parameters for a synthetic transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simulation {
    pub file_id: i64,
    pub size: u64,
    pub chunks: u64,
    pub chunk_delay_ms: u64,
    pub upload: bool,
    /// Stop halfway instead of completing
    pub cancel: bool,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            file_id: 1,
            size: 1_048_576,
            chunks: 8,
            chunk_delay_ms: 50,
            upload: false,
            cancel: false,
        }
    }
}

impl Simulation {
    /// Builds a script that transfers the file in equal chunks, then settles.
    ///
    /// Completed downloads are followed by a second notification carrying the
    /// secondary storage key, as real stores do.
    pub fn to_script(&self, animation_complete: Duration) -> Script {
        let chunks = self.chunks.max(1);
        let last_chunk = if self.cancel { (chunks / 2).max(1) } else { chunks };
        let mut steps = Vec::new();

        for chunk in 1..=last_chunk {
            let done = self.transferred(chunk, chunks);
            let active = self.cancel || chunk < chunks;
            steps.push(Step::Update(self.snapshot(active, !active, done)));
            if self.chunk_delay_ms > 0 {
                steps.push(Step::WaitMs(self.chunk_delay_ms));
            }
        }

        if self.cancel {
            let done = self.transferred(last_chunk, chunks);
            steps.push(Step::Update(self.snapshot(false, false, done)));
        } else if !self.upload {
            steps.push(Step::Update(
                self.snapshot(false, true, self.size)
                    .with_idb_key(format!("file-{}", self.file_id)),
            ));
        }

        #[allow(clippy::cast_possible_truncation)]
        let settle = animation_complete.as_millis() as u64 + 1;
        steps.push(Step::WaitMs(settle.min(MAX_WAIT_MS)));

        Script {
            seed: Vec::new(),
            file: Some(FileEntity::new(self.file_id, self.size)),
            steps,
        }
    }

    /// Bytes moved after `chunk` of `chunks`, without overflowing for huge sizes
    fn transferred(&self, chunk: u64, chunks: u64) -> u64 {
        let done = u128::from(self.size) * u128::from(chunk) / u128::from(chunks);
        u64::try_from(done).unwrap_or(self.size)
    }

    fn snapshot(&self, active: bool, completed: bool, done: u64) -> FileEntity {
        let file = FileEntity::new(self.file_id, self.size);
        if self.upload {
            file.with_remote(RemoteFile {
                is_uploading_active: active,
                is_uploading_completed: completed,
                uploaded_size: done,
            })
        } else {
            file.with_local(LocalFile {
                is_downloading_active: active,
                is_downloading_completed: completed,
                downloaded_size: done,
            })
        }
    }
}
