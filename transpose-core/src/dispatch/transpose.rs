use crate::action::{BackendEvent, DispatchResult, TransposeAction, UserNotice};
use crate::state::transpose::parse;
use crate::state::AppState;

pub(super) fn dispatch_transpose(
    action: &TransposeAction,
    state: &mut AppState,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    match action {
        TransposeAction::SetFromText(text) => apply_sequence(parse(text), state, effects),
        TransposeAction::WriteBack(values) => apply_sequence(values.clone(), state, effects),
        TransposeAction::Select(index) => {
            if !state.transposes.select(*index) {
                return DispatchResult::none();
            }
            effects.push(BackendEvent::SelectedIndex(*index));
            DispatchResult::changed()
        }
    }
}

/// Empty and unchanged sequences are dropped silently; out-of-range ones warn.
fn apply_sequence(
    values: Vec<i32>,
    state: &mut AppState,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    if values.is_empty() || values == state.transposes.values() {
        return DispatchResult::none();
    }
    if !state.transposes.replace(values.clone()) {
        return DispatchResult::with_notice(UserNotice::OutOfRange);
    }
    effects.push(BackendEvent::Transposes(values));
    DispatchResult::changed()
}
