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

//! Reliability Dependency Graph
//!
//! An [`Rdg`] is the arena owning every node of one analysis run. Each
//! [`RdgNode`] wraps the FDTMC fragment of one architectural unit together
//! with its presence condition; dependency edges between nodes form a DAG
//! with legitimate sharing. Downstream analyzers resolve a node bottom-up via
//! [`Rdg::transitive_closure`] and materialize structural views with
//! [`Rdg::to_component`].

// Sub-modules
pub mod component;
pub mod error;
pub mod graph;
pub mod node;
pub mod paths;
pub mod sorting;

// Public exports
pub use component::Component;
pub use error::{RdgError, RdgResult};
pub use graph::Rdg;
pub use node::RdgNode;
pub use petgraph::graph::NodeIndex;
