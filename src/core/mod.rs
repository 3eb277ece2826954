//! Core transfer-progress functionality
//!
//! This module contains the types and logic for following file transfers and
//! deciding what a progress indicator should show. It provides:
//!
//! - [`file`]: File entity snapshots and store notifications
//! - [`store`]: Process-wide file registry with listeners
//! - [`phase`]: Transfer phase derivation and percentage arithmetic
//! - [`gate`]: Refresh-suppression policy
//! - [`tracker`]: Per-slot progress state machine
//! - [`slot`]: Async binding of a tracker to a store and a tokio runtime
//! - [`error`]: Error types

pub mod error;
pub mod file;
pub mod gate;
pub mod phase;
pub mod slot;
pub mod store;
pub mod tracker;

#[cfg(test)]
pub mod test_helpers;
