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

//! States of a single Markov-chain fragment

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Label marking the entry state of a fragment.
pub const INITIAL_LABEL: &str = "initial";
/// Label marking the absorbing success state of a fragment.
pub const SUCCESS_LABEL: &str = "success";
/// Label marking the absorbing error state of a fragment.
pub const ERROR_LABEL: &str = "error";

/// Handle addressing one state within its owning fragment.
///
/// States are only ever created, never removed, and the fragment's index
/// counter advances by one per creation, so a handle coincides numerically
/// with the state's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in its fragment's creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of one Markov-chain fragment.
///
/// Carries the discrete-variable name of the owning fragment (stamped at
/// creation time), the creation index, and an optional label. Labels are
/// display metadata: two states are equal whenever their variable name and
/// index match, regardless of labeling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    variable_name: Option<String>,
    index: usize,
    label: Option<String>,
}

impl State {
    pub(crate) fn new(variable_name: Option<String>, index: usize) -> Self {
        Self {
            variable_name,
            index,
            label: None,
        }
    }

    /// Name of the fragment's discrete variable as it was when this state was created.
    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }

    pub(crate) fn clear_label(&mut self) {
        self.label = None;
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.variable_name == other.variable_name && self.index == other.index
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.variable_name.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.variable_name.as_deref().unwrap_or("_"), self.index)?;
        if let Some(label) = &self.label {
            write!(f, "({})", label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_label() {
        let mut a = State::new(Some("s".to_string()), 3);
        let b = State::new(Some("s".to_string()), 3);
        a.set_label(SUCCESS_LABEL);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_considers_variable_name_and_index() {
        let a = State::new(Some("s".to_string()), 0);
        let b = State::new(Some("t".to_string()), 0);
        let c = State::new(Some("s".to_string()), 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_includes_label_when_present() {
        let mut s = State::new(Some("srv".to_string()), 2);
        assert_eq!(s.to_string(), "srv=2");
        s.set_label(INITIAL_LABEL);
        assert_eq!(s.to_string(), "srv=2(initial)");
    }
}
