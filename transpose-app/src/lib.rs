//! multi-transpose application: the controller event loop plus the headless
//! stand-ins for the native backend and auxiliary windows.

pub mod backend;
pub mod cli;
pub mod controller;
pub mod logging;
pub mod windows;

pub use backend::{BackendError, LoopbackBackend, NativeBackend};
pub use controller::Controller;
pub use windows::{ThreadSpawner, WindowCommand};
