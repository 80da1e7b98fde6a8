use crate::action::{BackendEvent, BindingAction, DispatchResult, UserNotice};
use crate::state::{AppState, BindOutcome};

pub(super) fn dispatch_binding(
    action: &BindingAction,
    state: &mut AppState,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    match action {
        BindingAction::Bind { name, value } => {
            match state.bindings.validate_and_bind(name, value.clone()) {
                BindOutcome::Restricted => {
                    DispatchResult::with_notice(UserNotice::RestrictedKey { key: value.key.clone() })
                }
                BindOutcome::Unknown => {
                    DispatchResult::with_notice(UserNotice::UnknownBinding { name: name.clone() })
                }
                BindOutcome::Locked => {
                    DispatchResult::with_notice(UserNotice::BindingLocked { name: name.clone() })
                }
                BindOutcome::Unchanged => DispatchResult::none(),
                BindOutcome::Bound { stolen_from } => {
                    let mut result = DispatchResult::changed();
                    if let Some(from) = stolen_from {
                        log::info!("key '{}' moved from '{}' to '{}'", value.key, from, name);
                        effects.push(BackendEvent::Bind { name: from.clone(), keycode: None });
                        result.push_notice(UserNotice::KeyStolen { from, key: value.key.clone() });
                    }
                    effects.push(BackendEvent::Bind {
                        name: name.clone(),
                        keycode: Some(value.key_code),
                    });
                    super::couple_pause(state, effects);
                    result
                }
            }
        }
    }
}
