use crate::action::{BackendEvent, BackendNotice, DispatchResult, PerformanceAction, UserNotice};
use crate::state::bindings::SCROLL_BINDING;
use crate::state::settings::clamp_volume;
use crate::state::AppState;

pub(super) fn dispatch_performance(
    action: &PerformanceAction,
    state: &mut AppState,
    effects: &mut Vec<BackendEvent>,
) -> DispatchResult {
    match action {
        PerformanceAction::SetPaused(paused) => {
            if !*paused && !state.can_operate() {
                return DispatchResult::with_notice(UserNotice::WaitingForBindings);
            }
            if state.paused == *paused {
                return DispatchResult::none();
            }
            state.paused = *paused;
            effects.push(BackendEvent::Pause(*paused));
            DispatchResult::changed()
        }
        PerformanceAction::SetMuted(muted) => {
            if state.settings.muted != *muted {
                state.settings.muted = *muted;
                state.save_settings();
                effects.push(BackendEvent::Muted(*muted));
            }
            DispatchResult::none()
        }
        PerformanceAction::SetVolume(volume) => {
            let Some(volume) = clamp_volume(*volume, state.limits.volume_max) else {
                log::debug!("ignoring non-finite volume");
                return DispatchResult::none();
            };
            if state.settings.volume != volume {
                state.settings.volume = volume;
                state.save_settings();
                effects.push(BackendEvent::Volume(volume));
            }
            DispatchResult::none()
        }
        PerformanceAction::SetScroll(value) => {
            let bound = state.bindings.get(SCROLL_BINDING).is_some_and(|b| b.is_bound());
            if !bound {
                return DispatchResult::with_notice(UserNotice::ScrollUnavailable);
            }
            let value = (*value).min(state.limits.scroll_max);
            if state.settings.scroll_value != value {
                state.settings.scroll_value = value;
                state.save_settings();
                effects.push(BackendEvent::ScrollValue(value));
            }
            DispatchResult::none()
        }
    }
}

/// Notices from the backend are applied as-is.
pub(super) fn dispatch_backend_notice(notice: &BackendNotice, state: &mut AppState) -> DispatchResult {
    match notice {
        BackendNotice::Paused(paused) => {
            if state.paused == *paused {
                return DispatchResult::none();
            }
            state.paused = *paused;
            DispatchResult::changed()
        }
        BackendNotice::CurrentIndex(index) => {
            if state.transposes.selected_index() == *index {
                return DispatchResult::none();
            }
            state.transposes.set_selected(*index);
            DispatchResult::changed()
        }
    }
}
