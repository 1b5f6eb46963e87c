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

//! Dependency path counting
//!
//! Family-based analysis needs to know how often each fragment occurs along
//! the dependency paths of the node under analysis: a fragment reachable
//! twice contributes its reliability term twice.

use crate::error::RdgResult;
use crate::graph::Rdg;
use crate::sorting;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;

/// Counts the distinct dependency paths from `root` to every node of its
/// transitive closure. The root itself counts one path; a node reachable
/// through several dependents accumulates one count per path.
///
/// Fails like [`sorted_closure`](sorting::sorted_closure) when a cycle is
/// reachable.
pub fn number_of_paths(rdg: &Rdg, root: NodeIndex) -> RdgResult<HashMap<NodeIndex, usize>> {
    let closure = sorting::sorted_closure(rdg, root)?;
    let mut counts: HashMap<NodeIndex, usize> = HashMap::new();
    counts.insert(root, 1);

    // Top-down over the closure: when a node is reached, its own count is
    // final, so it can be pushed into its dependencies.
    for &node in closure.iter().rev() {
        let count = counts.get(&node).copied().unwrap_or(0);
        for child in rdg.dependencies(node) {
            *counts.entry(child).or_insert(0) += count;
        }
    }
    Ok(counts)
}
