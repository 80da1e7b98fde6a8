mod bindings;
mod capture;
mod performance;
mod transpose;

pub use capture::{begin_capture, complete_capture};

use crate::action::{Action, BackendEvent, DispatchResult};
use crate::state::AppState;

/// Dispatch an action against the authoritative state.
///
/// Backend writes are collected into `effects` rather than sent inline; the
/// caller forwards them and broadcasts when `state_changed` is set.
pub fn dispatch_action(
    action: &Action,
    state: &mut AppState,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    match action {
        Action::Binding(a) => bindings::dispatch_binding(a, state, effects),
        Action::Transpose(a) => transpose::dispatch_transpose(a, state, effects),
        Action::Performance(a) => performance::dispatch_performance(a, state, effects),
        Action::Backend(n) => performance::dispatch_backend_notice(n, state),
    }
}

/// Bring the backend in line with loaded state: re-announce every bound key,
/// send output settings, then set the pause state from `can_operate`.
pub fn startup(state: &mut AppState, effects: &mut Vec<BackendEvent>) -> DispatchResult {
    for binding in state.bindings.bindings() {
        if let Some(code) = binding.key_code {
            effects.push(BackendEvent::Bind {
                name: binding.name.clone(),
                keycode: Some(code),
            });
        }
    }
    effects.push(BackendEvent::Muted(state.settings.muted));
    effects.push(BackendEvent::Volume(state.settings.volume));
    effects.push(BackendEvent::ScrollValue(state.settings.scroll_value));

    let was_paused = state.paused;
    state.paused = !state.can_operate();
    effects.push(BackendEvent::Pause(state.paused));

    if was_paused != state.paused {
        DispatchResult::changed()
    } else {
        DispatchResult::none()
    }
}

/// Keep `paused` consistent with `can_operate` after a binding change.
fn couple_pause(state: &mut AppState, effects: &mut Vec<BackendEvent>) {
    let operable = state.can_operate();
    if state.paused == operable {
        state.paused = !operable;
        effects.push(BackendEvent::Pause(state.paused));
    }
}
