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

use reliac_fdtmc::Fdtmc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One node of the Reliability Dependency Graph.
///
/// Wraps the stochastic model of one architectural unit together with the
/// presence condition (a boolean expression over features) under which the
/// unit is part of a product. Id, presence condition and model are fixed at
/// construction; dependency edges live in the owning [`Rdg`](crate::Rdg)
/// arena, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RdgNode {
    id: String,
    presence_condition: String,
    model: Fdtmc,
    height: usize,
}

impl RdgNode {
    pub(crate) fn new(id: String, presence_condition: String, model: Fdtmc) -> Self {
        Self {
            id,
            presence_condition,
            model,
            height: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn presence_condition(&self) -> &str {
        &self.presence_condition
    }

    pub fn model(&self) -> &Fdtmc {
        &self.model
    }

    /// Height of the node, defined as for tree nodes: 0 for a node without
    /// dependencies, otherwise one more than the highest dependency. Grows
    /// monotonically as edges are added.
    pub fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn raise_height(&mut self, candidate: usize) {
        self.height = self.height.max(candidate);
    }
}

impl fmt::Display for RdgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.presence_condition)
    }
}
