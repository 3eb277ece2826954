//! fileprog - transfer progress tracking for messaging clients
//!
//! Decides what a per-file progress indicator shows while a file is being
//! downloaded or uploaded, reconciling snapshots pushed by a shared file store.
//!
//! # Architecture
//!
//! - [`core`] - File snapshots, the file store, the progress tracker and its render gate
//! - [`config`] - Configuration persistence
//! - [`script`] - Replay scripts and synthetic transfers
//! - [`view`] - iced rendering of a progress slot
//! - [`helpers`] - Pure data helpers for the UI layer
//! - [`utils`] - XDG directories
//!
//! # Behavior
//!
//! - Indicator shown while a tracked transfer is active
//! - Settles at 100% (completed) or 0% (cancelled) for a short animation window
//! - Completion and secondary-key notifications do not double-flash
//! - Torn-down slots ignore late timers and notifications

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod helpers;
pub mod script;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use crate::core::error::{Error, Result};
pub use crate::core::file::{FileEntity, FileId, FileUpdate, LocalFile, RemoteFile, Snapshot};
pub use crate::core::slot::ProgressSlot;
pub use crate::core::store::{FileSource, FileStore};
pub use crate::core::tracker::{FileProgress, RenderState, TrackerSettings};
