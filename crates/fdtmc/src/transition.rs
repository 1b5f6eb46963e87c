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
use serde::{Deserialize, Serialize};

/// A directed, probability-annotated edge between two states of one fragment.
///
/// The probability is an opaque symbolic expression (e.g. `0.999`, `rPersist`
/// or `1 - rPersist`); it is never parsed or evaluated here. Several
/// transitions may share the same source state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub source: StateId,
    pub target: StateId,
    pub action: String,
    pub probability: String,
}

impl Transition {
    pub fn new(source: StateId, target: StateId, action: &str, probability: &str) -> Self {
        Self {
            source,
            target,
            action: action.to_string(),
            probability: probability.to_string(),
        }
    }
}
