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

//! Arena owning the dependency graph of one analysis run

use crate::component::Component;
use crate::error::RdgResult;
use crate::node::RdgNode;
use crate::{paths, sorting};
use petgraph::graph::{DiGraph, NodeIndex};
use reliac_fdtmc::Fdtmc;
use std::collections::HashMap;
use tracing::{debug, trace};

/// The Reliability Dependency Graph of one analysis session.
///
/// Owns every [`RdgNode`] created during the run and the registries that go
/// with them (id lookup, creation order, the counter backing generated ids).
/// Nodes are addressed by index-based handles into the underlying directed
/// graph; edges point from a dependent node to the node it depends on. Nodes
/// are never removed, so handles stay valid for the arena's lifetime, and
/// running two analyses in one process is just a matter of using two arenas.
#[derive(Debug)]
pub struct Rdg {
    graph: DiGraph<RdgNode, ()>,
    by_id: HashMap<String, NodeIndex>,
    next_index: u64,
}

impl Default for Rdg {
    fn default() -> Self {
        Self::new()
    }
}

impl Rdg {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            by_id: HashMap::new(),
            next_index: 0,
        }
    }

    /// Returns a fresh generated node id (`n0`, `n1`, ...) and advances the
    /// counter. Generated ids never repeat within an arena.
    pub fn next_node_id(&mut self) -> String {
        let id = format!("n{}", self.next_index);
        self.next_index += 1;
        id
    }

    /// Registers a new node. Id, presence condition and model are immutable
    /// from here on; the node starts with no dependencies and height 0.
    ///
    /// Ids are expected to be unique; registering a second node under an
    /// already-used id replaces the id-lookup entry while both nodes remain
    /// in creation order.
    pub fn add_node(&mut self, id: &str, presence_condition: &str, model: Fdtmc) -> NodeIndex {
        let handle = self.graph.add_node(RdgNode::new(id.to_string(), presence_condition.to_string(), model));
        self.by_id.insert(id.to_string(), handle);
        trace!("Registered RDG node {}", id);
        handle
    }

    /// Registers a new node under a generated id.
    pub fn add_anonymous_node(&mut self, presence_condition: &str, model: Fdtmc) -> NodeIndex {
        let id = self.next_node_id();
        self.add_node(&id, presence_condition, model)
    }

    pub fn node(&self, handle: NodeIndex) -> &RdgNode {
        &self.graph[handle]
    }

    pub fn get_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Handles of all nodes in creation order.
    pub fn nodes_in_creation_order(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Records that `parent` depends on `child` and updates the parent's
    /// height. Duplicate edges are ignored (set semantics). Cycles are not
    /// checked here; they surface lazily on the next traversal.
    pub fn add_dependency(&mut self, parent: NodeIndex, child: NodeIndex) {
        if self.graph.find_edge(parent, child).is_none() {
            self.graph.add_edge(parent, child, ());
        }
        let candidate = self.graph[child].height() + 1;
        self.graph[parent].raise_height(candidate);
    }

    /// Direct dependencies of a node, in the node's own iteration order.
    pub fn dependencies(&self, handle: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors(handle).collect()
    }

    /// The node plus all its transitive dependencies, ordered bottom-up: a
    /// dependency precedes every node depending on it.
    ///
    /// Fails with [`RdgError::CyclicDependency`](crate::RdgError) if any
    /// cycle is reachable from the node. Each call starts a fresh traversal;
    /// nothing is cached across queries.
    pub fn transitive_closure(&self, handle: NodeIndex) -> RdgResult<Vec<NodeIndex>> {
        sorting::sorted_closure(self, handle)
    }

    /// Number of distinct dependency paths from the node to each of its
    /// transitive dependencies (and to itself, which counts one path).
    pub fn number_of_paths(&self, handle: NodeIndex) -> RdgResult<HashMap<NodeIndex, usize>> {
        paths::number_of_paths(self, handle)
    }

    /// First node (in creation order) other than `target` that is
    /// structurally equal to it, or `None` if there is none. Used to
    /// deduplicate structurally identical fragments discovered at different
    /// points of an architecture.
    pub fn similar_node(&self, target: NodeIndex) -> Option<NodeIndex> {
        let found = self
            .graph
            .node_indices()
            .find(|&candidate| candidate != target && self.structurally_equal(candidate, target));
        if let Some(handle) = found {
            debug!("Node {} deduplicates to {}", self.graph[target].id(), self.graph[handle].id());
        }
        found
    }

    /// Two nodes are structurally equal whenever their presence conditions
    /// match, their models are equal by value, and their dependency sets are
    /// structurally equal in turn. Ids do not participate.
    ///
    /// Only meaningful on acyclic graphs: the comparison recurses through
    /// dependencies.
    pub fn structurally_equal(&self, a: NodeIndex, b: NodeIndex) -> bool {
        if a == b {
            return true;
        }
        let node_a = &self.graph[a];
        let node_b = &self.graph[b];
        if node_a.presence_condition() != node_b.presence_condition() || node_a.model() != node_b.model() {
            return false;
        }

        let deps_a = self.dependencies(a);
        let deps_b = self.dependencies(b);
        if deps_a.len() != deps_b.len() {
            return false;
        }
        deps_a.iter().all(|&x| deps_b.iter().any(|&y| self.structurally_equal(x, y)))
            && deps_b.iter().all(|&y| deps_a.iter().any(|&x| self.structurally_equal(x, y)))
    }

    /// Materializes the immutable component view of the subgraph rooted at
    /// the node. Sharing in the source DAG is not preserved: a shared
    /// dependency reappears under each dependent.
    pub fn to_component(&self, handle: NodeIndex) -> Component<Fdtmc> {
        let dependencies = self.dependencies(handle).into_iter().map(|child| self.to_component(child)).collect();
        let node = &self.graph[handle];
        Component::new(node.id(), node.presence_condition(), node.model().clone(), dependencies)
    }

    /// Maps an ordered list of handles (typically a transitive closure) to
    /// component views, preserving order.
    pub fn to_component_list(&self, handles: &[NodeIndex]) -> Vec<Component<Fdtmc>> {
        handles.iter().map(|&handle| self.to_component(handle)).collect()
    }
}
