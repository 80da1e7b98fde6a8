//! # transpose-types
//!
//! Shared type definitions for multi-transpose.
//! This crate contains the data exchanged between the controller engine
//! (transpose-core), the window sync layer (transpose-sync) and the app.

pub mod action;
pub mod backend;
pub mod binding;
pub mod state;

pub use action::*;
pub use backend::{BackendEvent, BackendNotice, KeyConsumed, MessagePayload};
pub use binding::{Binding, KeyValue};
pub use state::SyncState;

/// Lowest transpose offset accepted in a sequence.
pub const TRANSPOSE_MIN: i32 = -50;
/// Highest transpose offset accepted in a sequence.
pub const TRANSPOSE_MAX: i32 = 50;
