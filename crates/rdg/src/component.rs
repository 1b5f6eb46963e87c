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

use serde::{Deserialize, Serialize};

/// Immutable view of one dependency-graph node and the subgraph below it,
/// materialized for downstream consumers (analysis strategies, exporters).
///
/// Views form a tree: sharing present in the source DAG is not preserved, a
/// shared dependency simply appears once under each of its dependents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component<T> {
    id: String,
    presence_condition: String,
    model: T,
    dependencies: Vec<Component<T>>,
}

impl<T> Component<T> {
    pub fn new(id: &str, presence_condition: &str, model: T, dependencies: Vec<Component<T>>) -> Self {
        Self {
            id: id.to_string(),
            presence_condition: presence_condition.to_string(),
            model,
            dependencies,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn presence_condition(&self) -> &str {
        &self.presence_condition
    }

    pub fn model(&self) -> &T {
        &self.model
    }

    pub fn dependencies(&self) -> &[Component<T>] {
        &self.dependencies
    }
}
