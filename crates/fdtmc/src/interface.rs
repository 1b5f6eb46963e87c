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

use crate::state::StateId;
use crate::transition::Transition;
use serde::{Deserialize, Serialize};

/// Two-outcome probabilistic abstraction of a dependency call.
///
/// An interface spans three boundary states of the owning fragment and two
/// transitions: initial to success with probability `abstracted_id` and
/// initial to error with the complement `1 - abstracted_id`. Inlining the
/// concrete dependency model later replaces the abstract branch.
///
/// Both transitions are part of the owning fragment's transition table by the
/// time the interface is registered; the interface only borrows the boundary
/// states, it does not own them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interface {
    abstracted_id: String,
    initial: StateId,
    success: StateId,
    error: StateId,
    success_transition: Transition,
    error_transition: Transition,
}

impl Interface {
    pub(crate) fn new(
        abstracted_id: &str,
        initial: StateId,
        success: StateId,
        error: StateId,
        success_transition: Transition,
        error_transition: Transition,
    ) -> Self {
        Self {
            abstracted_id: abstracted_id.to_string(),
            initial,
            success,
            error,
            success_transition,
            error_transition,
        }
    }

    /// Identifier of the dependency fragment abstracted away by this interface.
    pub fn abstracted_id(&self) -> &str {
        &self.abstracted_id
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn success(&self) -> StateId {
        self.success
    }

    pub fn error(&self) -> StateId {
        self.error
    }

    pub fn success_transition(&self) -> &Transition {
        &self.success_transition
    }

    pub fn error_transition(&self) -> &Transition {
        &self.error_transition
    }
}
