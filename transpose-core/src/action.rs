//! Re-exports of the shared action and wire types.
pub use transpose_types::action::*;
pub use transpose_types::backend::{BackendEvent, BackendNotice, KeyConsumed, MessagePayload};
