use crate::action::{Action, BackendEvent, BindingAction, DispatchResult, UserNotice};
use crate::state::{AppState, Consumed, KeyCapture};

/// Start listening for a key for `name`.
pub fn begin_capture(
    name: &str,
    state: &AppState,
    capture: &mut KeyCapture,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    if state.bindings.get(name).is_none() {
        return DispatchResult::with_notice(UserNotice::UnknownBinding { name: name.to_string() });
    }
    if !state.bindings.is_capturable(name) {
        return DispatchResult::with_notice(UserNotice::BindingLocked { name: name.to_string() });
    }
    if !capture.begin(name, effects) {
        return DispatchResult::with_notice(UserNotice::CaptureBusy);
    }
    log::debug!("listening for '{}'", name);
    DispatchResult::none()
}

/// Resolve a `key_consume` message body into a bind.
pub fn complete_capture(
    message: &str,
    state: &mut AppState,
    capture: &mut KeyCapture,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    match capture.consume(message, effects) {
        Consumed::Ignored => {
            log::debug!("key consumed with no capture outstanding");
            DispatchResult::none()
        }
        Consumed::Malformed { .. } => DispatchResult::with_notice(UserNotice::MalformedCapture),
        Consumed::Request { name, value } => {
            let action = Action::Binding(BindingAction::Bind { name, value });
            let result = super::dispatch_action(&action, state, effects);
            capture.finish();
            result
        }
    }
}
