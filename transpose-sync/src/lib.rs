//! Cross-window state sync for multi-transpose.
//!
//! The controller owns the authoritative state and pushes full snapshots to
//! auxiliary windows over named channels. Windows announce readiness once,
//! keep a read replica, and may send back transpose sequence edits.

pub mod broadcaster;
pub mod framing;
pub mod protocol;
pub mod registry;
pub mod replica;

pub use broadcaster::{SyncBroadcaster, WindowSpawner};
pub use protocol::{ControllerMessage, Envelope, Inbound, SyncError, WindowKind, WindowMessage};
pub use registry::{WindowHandle, WindowPhase, WindowRegistry};
pub use replica::{ReplicaEvent, WindowReplica};
