// Reliac
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! State creation and distinguished-state bookkeeping for one fragment

use crate::state::{ERROR_LABEL, INITIAL_LABEL, SUCCESS_LABEL, State, StateId};
use serde::{Deserialize, Serialize};

/// Owns state storage, the monotonic index counter, and the distinguished
/// initial/success/error references of exactly one fragment.
///
/// Indices are assigned at creation and never reused. The very first state
/// created becomes the initial state automatically.
///
/// The labeling protocol is asymmetric: reassigning the initial role clears
/// the previous holder's label, while reassigning the success or error role
/// leaves the previous holder's label in place. Callers relying on the
/// reserved labels being unique must not reassign success/error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateHandler {
    index: usize,
    states: Vec<State>,
    initial: Option<StateId>,
    success: Option<StateId>,
    error: Option<StateId>,
}

impl StateHandler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a state stamped with the given variable name and the current
    /// index, then advances the counter.
    pub(crate) fn create_state(&mut self, variable_name: Option<String>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State::new(variable_name, self.index));
        if self.index == 0 {
            self.set_initial_state(id);
        }
        self.index += 1;
        id
    }

    pub(crate) fn set_label(&mut self, id: StateId, label: &str) {
        if let Some(state) = self.states.get_mut(id.0) {
            state.set_label(label);
        }
    }

    pub(crate) fn set_initial_state(&mut self, id: StateId) {
        if let Some(previous) = self.initial {
            self.states[previous.0].clear_label();
        }
        self.initial = Some(id);
        self.states[id.0].set_label(INITIAL_LABEL);
    }

    pub(crate) fn set_success_state(&mut self, id: StateId) {
        self.success = Some(id);
        self.states[id.0].set_label(SUCCESS_LABEL);
    }

    pub(crate) fn set_error_state(&mut self, id: StateId) {
        self.error = Some(id);
        self.states[id.0].set_label(ERROR_LABEL);
    }

    /// Next index to be assigned, i.e. the number of states created so far.
    pub fn index(&self) -> usize {
        self.index
    }

    /// States in creation order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id.0)
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.0 < self.states.len()
    }

    pub fn initial_state(&self) -> Option<StateId> {
        self.initial
    }

    pub fn success_state(&self) -> Option<StateId> {
        self.success
    }

    pub fn error_state(&self) -> Option<StateId> {
        self.error
    }

    /// First state (in creation order) carrying the given label.
    ///
    /// Reserved labels are expected to be unique by convention; this is not
    /// enforced here.
    pub fn get_state_by_label(&self, label: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.label() == Some(label)).map(StateId)
    }
}
