use serde::{Deserialize, Serialize};

use crate::binding::Binding;

/// Full AppState snapshot pushed to auxiliary windows.
///
/// Sent whole on every broadcast, never as a diff. Auxiliary windows keep the
/// last one they received as a disposable read replica.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub bindings: Vec<Binding>,
    pub can_operate: bool,
    pub transposes: Vec<i32>,
    pub selected_index: usize,
    pub paused: bool,
}

impl SyncState {
    /// The transpose at the selected index, if the index is in range.
    pub fn current_transpose(&self) -> Option<i32> {
        self.transposes.get(self.selected_index).copied()
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.name == name)
    }
}
