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

//! Featured discrete-time Markov chain (FDTMC) fragments
//!
//! An [`Fdtmc`] models the reliability behavior of one architectural unit as a
//! discrete-time Markov chain whose transition probabilities are symbolic
//! expressions, left unevaluated for a downstream parametric solver. Calls to
//! other units are abstracted as two-outcome [`Interface`]s which can later be
//! resolved by inlining the concrete dependency fragment.

// Sub-modules
pub mod handler;
pub mod interface;
pub mod model;
pub mod state;
pub mod transition;

// Public exports
pub use handler::StateHandler;
pub use interface::Interface;
pub use model::Fdtmc;
pub use state::{ERROR_LABEL, INITIAL_LABEL, SUCCESS_LABEL, State, StateId};
pub use transition::Transition;
