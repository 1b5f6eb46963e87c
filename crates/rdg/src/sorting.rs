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

//! Depth-first topological resolution of dependency closures
//!
//! Implements Cormen et al.'s topological sort visit over the dependency
//! edges reachable from one node. Visiting a node that is still in progress
//! means the graph has a cycle; the traversal fails as a whole and no partial
//! ordering is produced.

use crate::error::{RdgError, RdgResult};
use crate::graph::Rdg;
use petgraph::graph::NodeIndex;
use std::collections::HashMap;
use tracing::error;

/// Visitation state of one node during a traversal.
enum VisitMark {
    /// The node's dependency subtree is being resolved.
    InProgress,
    /// The node and everything below it is already in the output.
    Done,
}

/// Returns `root` plus all its transitive dependencies in bottom-up order:
/// every dependency precedes the nodes depending on it; independent subtrees
/// keep traversal order.
///
/// Each call starts with a fresh visitation map, so the graph may change
/// between queries without stale results.
pub fn sorted_closure(rdg: &Rdg, root: NodeIndex) -> RdgResult<Vec<NodeIndex>> {
    let mut marks = HashMap::new();
    let mut sorted = Vec::new();
    visit(rdg, root, &mut marks, &mut sorted)?;
    Ok(sorted)
}

fn visit(rdg: &Rdg, node: NodeIndex, marks: &mut HashMap<NodeIndex, VisitMark>, sorted: &mut Vec<NodeIndex>) -> RdgResult<()> {
    match marks.get(&node) {
        Some(VisitMark::InProgress) => {
            // Revisiting a temporarily marked node -- a cyclic dependency.
            let id = rdg.node(node).id().to_string();
            error!("Cyclic dependency detected at RDG node {}", id);
            return Err(RdgError::CyclicDependency { id });
        }
        Some(VisitMark::Done) => return Ok(()),
        None => {}
    }

    marks.insert(node, VisitMark::InProgress);
    for child in rdg.dependencies(node) {
        visit(rdg, child, marks, sorted)?;
    }
    marks.insert(node, VisitMark::Done);
    sorted.push(node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliac_fdtmc::Fdtmc;

    fn add_empty_node(rdg: &mut Rdg, id: &str) -> NodeIndex {
        let mut model = Fdtmc::new();
        model.set_variable_name(id);
        model.create_initial_state();
        rdg.add_node(id, "true", model)
    }

    fn position(closure: &[NodeIndex], handle: NodeIndex) -> usize {
        closure.iter().position(|&h| h == handle).unwrap()
    }

    #[test]
    fn test_closure_of_dependency_free_node_is_the_node_itself() {
        let mut rdg = Rdg::new();
        let only = add_empty_node(&mut rdg, "only");
        assert_eq!(rdg.transitive_closure(only).unwrap(), vec![only]);
    }

    #[test]
    fn test_diamond_closure_is_bottom_up_with_shared_sink_once() {
        let mut rdg = Rdg::new();
        let a = add_empty_node(&mut rdg, "a");
        let b = add_empty_node(&mut rdg, "b");
        let c = add_empty_node(&mut rdg, "c");
        let d = add_empty_node(&mut rdg, "d");
        rdg.add_dependency(a, b);
        rdg.add_dependency(a, c);
        rdg.add_dependency(b, d);
        rdg.add_dependency(c, d);

        let closure = rdg.transitive_closure(a).unwrap();
        assert_eq!(closure.len(), 4);
        assert_eq!(closure.iter().filter(|&&h| h == d).count(), 1);
        assert!(position(&closure, d) < position(&closure, b));
        assert!(position(&closure, d) < position(&closure, c));
        assert!(position(&closure, b) < position(&closure, a));
        assert!(position(&closure, c) < position(&closure, a));
    }

    #[test]
    fn test_three_cycle_fails_with_cyclic_dependency() {
        let mut rdg = Rdg::new();
        let a = add_empty_node(&mut rdg, "a");
        let b = add_empty_node(&mut rdg, "b");
        let c = add_empty_node(&mut rdg, "c");
        rdg.add_dependency(a, b);
        rdg.add_dependency(b, c);
        rdg.add_dependency(c, a);

        let err = rdg.transitive_closure(a).unwrap_err();
        assert_eq!(err, RdgError::CyclicDependency { id: "a".to_string() });
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut rdg = Rdg::new();
        let a = add_empty_node(&mut rdg, "a");
        rdg.add_dependency(a, a);
        assert!(matches!(rdg.transitive_closure(a), Err(RdgError::CyclicDependency { .. })));
    }

    #[test]
    fn test_queries_do_not_cache_across_calls() {
        let mut rdg = Rdg::new();
        let parent = add_empty_node(&mut rdg, "parent");
        let child = add_empty_node(&mut rdg, "child");
        rdg.add_dependency(parent, child);

        assert_eq!(rdg.transitive_closure(parent).unwrap(), vec![child, parent]);

        // The graph may grow between queries; the next traversal sees it.
        let grandchild = add_empty_node(&mut rdg, "grandchild");
        rdg.add_dependency(child, grandchild);
        assert_eq!(rdg.transitive_closure(parent).unwrap(), vec![grandchild, child, parent]);
    }
}
