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

//! FDTMC fragments and their composition algebra
//!
//! The operations here never evaluate probabilities; they only rearrange
//! states, transitions and interfaces. Composition is pure: `inline`,
//! `decorated_with_presence` and `copy` build fresh fragments and leave every
//! input untouched.

use crate::handler::StateHandler;
use crate::interface::Interface;
use crate::state::{State, StateId};
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::{debug, trace};

/// All registered occurrences of one abstracted dependency.
///
/// The same dependency may be abstracted several times within a fragment
/// (e.g. a call inside a loop), so occurrences form an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceGroup {
    dependency_id: String,
    occurrences: Vec<Interface>,
}

impl InterfaceGroup {
    pub fn dependency_id(&self) -> &str {
        &self.dependency_id
    }

    pub fn occurrences(&self) -> &[Interface] {
        &self.occurrences
    }
}

/// A featured discrete-time Markov chain fragment.
///
/// Holds the fragment's discrete-variable name, its states (owned by the
/// embedded [`StateHandler`]), an ordered transition list per state, and the
/// registry of abstracted dependency interfaces in registration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fdtmc {
    variable_name: Option<String>,
    handler: StateHandler,
    transitions: Vec<Vec<Transition>>,
    interfaces: Vec<InterfaceGroup>,
}

impl Fdtmc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable_name(&mut self, name: &str) {
        self.variable_name = Some(name.to_string());
    }

    pub fn variable_name(&self) -> Option<&str> {
        self.variable_name.as_deref()
    }

    /// Next state index to be assigned.
    pub fn variable_index(&self) -> usize {
        self.handler.index()
    }

    /// Creates a state stamped with the fragment's current variable name.
    ///
    /// The state is registered with an empty outgoing-transition entry. The
    /// very first state created becomes the initial state automatically.
    pub fn create_state(&mut self) -> StateId {
        let id = self.handler.create_state(self.variable_name.clone());
        self.transitions.push(Vec::new());
        id
    }

    /// Creates a state and labels it.
    ///
    /// Applied to the very first state this overwrites the automatic
    /// `initial` label while the initial reference keeps pointing at it.
    pub fn create_labeled_state(&mut self, label: &str) -> StateId {
        let id = self.create_state();
        self.handler.set_label(id, label);
        id
    }

    pub fn create_initial_state(&mut self) -> StateId {
        let id = self.create_state();
        self.handler.set_initial_state(id);
        id
    }

    pub fn create_success_state(&mut self) -> StateId {
        let id = self.create_state();
        self.handler.set_success_state(id);
        id
    }

    pub fn create_error_state(&mut self) -> StateId {
        let id = self.create_state();
        self.handler.set_error_state(id);
        id
    }

    pub fn initial_state(&self) -> Option<StateId> {
        self.handler.initial_state()
    }

    pub fn success_state(&self) -> Option<StateId> {
        self.handler.success_state()
    }

    pub fn error_state(&self) -> Option<StateId> {
        self.handler.error_state()
    }

    /// States in creation order.
    pub fn states(&self) -> &[State] {
        self.handler.states()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.handler.state(id)
    }

    /// First state carrying the given label, in creation order.
    pub fn get_state_by_label(&self, label: &str) -> Option<StateId> {
        self.handler.get_state_by_label(label)
    }

    /// Appends a transition to the source state's outgoing list and returns a
    /// copy of it.
    ///
    /// An absent source (no handle, or a handle this fragment does not know)
    /// is a silent no-op returning `None`, not a failure; builders feeding
    /// partially-resolved models rely on this leniency. Target validity is
    /// likewise the caller's responsibility: an unknown target is dropped the
    /// same way.
    pub fn create_transition<S, T>(&mut self, source: S, target: T, action: &str, probability: &str) -> Option<Transition>
    where
        S: Into<Option<StateId>>,
        T: Into<Option<StateId>>,
    {
        let source = source.into().filter(|id| self.handler.contains(*id))?;
        let target = target.into().filter(|id| self.handler.contains(*id))?;
        let transition = Transition::new(source, target, action, probability);
        self.transitions[source.index()].push(transition.clone());
        Some(transition)
    }

    /// Creates an explicit interface to another fragment.
    ///
    /// The interface spans the three given boundary states and two fresh
    /// transitions: initial to success with probability `id` and initial to
    /// error with probability `1 - id`. Returns `None` without registering
    /// anything if any boundary state is unknown to this fragment.
    pub fn create_interface(&mut self, id: &str, initial: StateId, success: StateId, error: StateId) -> Option<Interface> {
        if !(self.handler.contains(initial) && self.handler.contains(success) && self.handler.contains(error)) {
            return None;
        }
        let success_transition = self.create_transition(initial, success, "", id)?;
        let error_transition = self.create_transition(initial, error, "", &format!("1 - {}", id))?;
        let interface = Interface::new(id, initial, success, error, success_transition, error_transition);
        self.register_interface(id, interface.clone());
        Some(interface)
    }

    /// Interface groups in registration order.
    pub fn interfaces(&self) -> &[InterfaceGroup] {
        &self.interfaces
    }

    /// Occurrence list for one abstracted dependency, if any.
    pub fn interface_occurrences(&self, dependency_id: &str) -> Option<&[Interface]> {
        self.interfaces
            .iter()
            .find(|group| group.dependency_id == dependency_id)
            .map(|group| group.occurrences.as_slice())
    }

    /// Outgoing transitions of a state in registration order.
    pub fn transitions_from(&self, id: StateId) -> &[Transition] {
        self.transitions.get(id.index()).map(|list| list.as_slice()).unwrap_or(&[])
    }

    /// All transitions, in state creation order then registration order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().flatten()
    }

    /// First transition whose action matches, in iteration order.
    pub fn get_transition_by_action(&self, action: &str) -> Option<&Transition> {
        self.transitions().find(|t| t.action == action)
    }

    /// Inlines the given fragments wherever an interface abstracts the
    /// corresponding id.
    ///
    /// The result is a structural copy of this fragment (fresh state handles,
    /// same variable name, non-distinguished labels stripped) in which every
    /// interface occurrence whose id appears in `dependency_models` is
    /// expanded: the symbolic branch is dropped and probability-`1`
    /// transitions stitch a copy of the dependency fragment in between the
    /// interface's boundary states. Occurrences whose id is absent keep their
    /// symbolic branch and stay registered, so a later `inline` can still
    /// resolve them. Inputs are never mutated.
    pub fn inline(&self, dependency_models: &HashMap<String, Fdtmc>) -> Fdtmc {
        debug!(
            "Inlining {} dependency models into fragment {}",
            dependency_models.len(),
            self.variable_name.as_deref().unwrap_or("_")
        );
        let mut inlined = Fdtmc::new();
        let mapping = inlined.copy_base_from(self);

        for group in &self.interfaces {
            match dependency_models.get(&group.dependency_id) {
                Some(fragment) => {
                    trace!("Expanding {} occurrences of dependency {}", group.occurrences.len(), group.dependency_id);
                    for interface in &group.occurrences {
                        inlined.expand_interface(interface, fragment, &mapping);
                    }
                }
                None => {
                    for interface in &group.occurrences {
                        inlined.carry_interface(&group.dependency_id, interface, &mapping);
                    }
                }
            }
        }
        inlined
    }

    /// Copies this fragment.
    ///
    /// Equivalent to inlining with no dependency models: states are rebuilt
    /// (stripping non-distinguished labels), transitions and all interface
    /// registrations are carried over, and the result shares no storage with
    /// the original.
    pub fn copy(&self) -> Fdtmc {
        self.inline(&HashMap::new())
    }

    /// Returns a copy decorated with "presence transitions": one new initial
    /// state branching into the original initial state with probability
    /// `presence_variable` (present: behave as modeled) and into the original
    /// success state with the complement (absent: short-circuit to success).
    pub fn decorated_with_presence(&self, presence_variable: &str) -> Fdtmc {
        let mut decorated = self.copy();
        let original_initial = decorated.initial_state();
        let original_success = decorated.success_state();
        let new_initial = decorated.create_initial_state();

        // Enter the original chain in case of presence
        decorated.create_transition(new_initial, original_initial, "", presence_variable);
        // Short-circuit in case of absence
        decorated.create_transition(new_initial, original_success, "", &format!("1-{}", presence_variable));
        decorated
    }

    /// Selects between two fragments by presence.
    ///
    /// Only the "present" branch is composed, via
    /// [`decorated_with_presence`](Self::decorated_with_presence); the absent
    /// fragment is currently ignored.
    // TODO: compose the absent branch as well.
    pub fn if_then_else(presence_variable: &str, if_present: &Fdtmc, _if_absent: &Fdtmc) -> Fdtmc {
        if_present.decorated_with_presence(presence_variable)
    }

    /// Rebuilds `origin`'s states, distinguished references and
    /// non-interface transitions into this (empty) fragment. Returns the
    /// old-to-new state mapping.
    fn copy_base_from(&mut self, origin: &Fdtmc) -> HashMap<StateId, StateId> {
        self.variable_name = origin.variable_name.clone();

        let mapping = self.absorb_states(origin);
        if let Some(initial) = origin.initial_state() {
            self.handler.set_initial_state(mapping[&initial]);
        }
        if let Some(success) = origin.success_state() {
            self.handler.set_success_state(mapping[&success]);
        }
        if let Some(error) = origin.error_state() {
            self.handler.set_error_state(mapping[&error]);
        }

        self.absorb_transitions(origin, &mapping);
        mapping
    }

    /// Creates one fresh state per state of `origin`, stripped of labels.
    fn absorb_states(&mut self, origin: &Fdtmc) -> HashMap<StateId, StateId> {
        let mut mapping = HashMap::new();
        for (index, _) in origin.states().iter().enumerate() {
            let new_id = self.create_state();
            mapping.insert(StateId(index), new_id);
        }
        mapping
    }

    /// Copies all transitions of `origin` that are not part of an interface.
    fn absorb_transitions(&mut self, origin: &Fdtmc, mapping: &HashMap<StateId, StateId>) {
        let interface_transitions = origin.interface_transitions();
        for list in &origin.transitions {
            for transition in list {
                if !interface_transitions.contains(transition) {
                    self.absorb_transition(transition, mapping);
                }
            }
        }
    }

    fn absorb_transition(&mut self, transition: &Transition, mapping: &HashMap<StateId, StateId>) -> Option<Transition> {
        self.create_transition(
            mapping.get(&transition.source).copied(),
            mapping.get(&transition.target).copied(),
            &transition.action,
            &transition.probability,
        )
    }

    /// Re-registers an unresolved interface occurrence, including its
    /// symbolic branch, under the state mapping of the new fragment.
    fn carry_interface(&mut self, dependency_id: &str, interface: &Interface, mapping: &HashMap<StateId, StateId>) {
        let success_transition = self.absorb_transition(interface.success_transition(), mapping);
        let error_transition = self.absorb_transition(interface.error_transition(), mapping);
        if let (Some(success_transition), Some(error_transition)) = (success_transition, error_transition) {
            let carried = Interface::new(
                dependency_id,
                mapping[&interface.initial()],
                mapping[&interface.success()],
                mapping[&interface.error()],
                success_transition,
                error_transition,
            );
            self.register_interface(dependency_id, carried);
        }
    }

    /// Stitches a copy of `fragment` in between the boundary states of a
    /// resolved interface occurrence.
    fn expand_interface(&mut self, interface: &Interface, fragment: &Fdtmc, mapping: &HashMap<StateId, StateId>) {
        let fragment_mapping = self.absorb_states(fragment);
        self.absorb_transitions(fragment, &fragment_mapping);

        let entry = mapping.get(&interface.initial()).copied();
        let back_success = mapping.get(&interface.success()).copied();
        let back_error = mapping.get(&interface.error()).copied();
        let fragment_initial = fragment.initial_state().and_then(|id| fragment_mapping.get(&id).copied());
        let fragment_success = fragment.success_state().and_then(|id| fragment_mapping.get(&id).copied());

        self.create_transition(entry, fragment_initial, "", "1");
        self.create_transition(fragment_success, back_success, "", "1");
        if let Some(error) = fragment.error_state() {
            let fragment_error = fragment_mapping.get(&error).copied();
            self.create_transition(fragment_error, back_error, "", "1");
        }
    }

    fn register_interface(&mut self, dependency_id: &str, interface: Interface) {
        match self.interfaces.iter_mut().find(|group| group.dependency_id == dependency_id) {
            Some(group) => group.occurrences.push(interface),
            None => self.interfaces.push(InterfaceGroup {
                dependency_id: dependency_id.to_string(),
                occurrences: vec![interface],
            }),
        }
    }

    /// The boundary transitions of every registered interface; these are
    /// skipped when copying so expansion can decide their fate.
    fn interface_transitions(&self) -> HashSet<&Transition> {
        self.interfaces
            .iter()
            .flat_map(|group| &group.occurrences)
            .flat_map(|interface| [interface.success_transition(), interface.error_transition()])
            .collect()
    }
}

/// Two fragments are equal whenever their states, their three distinguished
/// states, their full transition tables and their interface registrations are
/// pairwise equal by value. The fragment-level variable name only enters
/// through the per-state stamps.
impl PartialEq for Fdtmc {
    fn eq(&self, other: &Self) -> bool {
        self.handler.states() == other.handler.states()
            && self.initial_state() == other.initial_state()
            && self.success_state() == other.success_state()
            && self.error_state() == other.error_state()
            && self.transitions == other.transitions
            && self.interfaces == other.interfaces
    }
}

impl Eq for Fdtmc {}

impl Hash for Fdtmc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handler.states().hash(state);
        self.transitions.hash(state);
        self.interfaces.hash(state);
    }
}

impl fmt::Display for Fdtmc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in self.states() {
            for transition in &self.transitions[state.index()] {
                let target = &self.states()[transition.target.index()];
                writeln!(f, "{} --- {} / {} ---> {}", state, transition.action, transition.probability, target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{INITIAL_LABEL, SUCCESS_LABEL};
    use std::collections::hash_map::DefaultHasher;

    /// initial --run/0.99--> success, initial --run/0.01--> error
    fn sample_fragment(name: &str) -> Fdtmc {
        let mut fragment = Fdtmc::new();
        fragment.set_variable_name(name);
        let initial = fragment.create_initial_state();
        let success = fragment.create_success_state();
        let error = fragment.create_error_state();
        fragment.create_transition(initial, success, "run", "0.99");
        fragment.create_transition(initial, error, "run", "0.01");
        fragment
    }

    /// Caller whose only behavior is one abstracted call to `dep_id`.
    fn abstracting_fragment(name: &str, dep_id: &str) -> Fdtmc {
        let mut fragment = Fdtmc::new();
        fragment.set_variable_name(name);
        let initial = fragment.create_initial_state();
        let success = fragment.create_success_state();
        let error = fragment.create_error_state();
        fragment.create_interface(dep_id, initial, success, error).unwrap();
        fragment
    }

    fn hash_of(fragment: &Fdtmc) -> u64 {
        let mut hasher = DefaultHasher::new();
        fragment.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_copy_is_equal_and_independent() {
        let original = sample_fragment("srv");
        let mut copied = original.copy();
        assert_eq!(original, copied);
        assert_eq!(hash_of(&original), hash_of(&copied));

        copied.create_state();
        assert_ne!(original, copied);
    }

    #[test]
    fn test_copy_strips_custom_labels_but_keeps_distinguished_ones() {
        let mut original = sample_fragment("srv");
        original.create_labeled_state("retry");
        let copied = original.copy();

        assert_eq!(copied.get_state_by_label("retry"), None);
        assert_eq!(copied.get_state_by_label(INITIAL_LABEL), copied.initial_state());
        assert_eq!(copied.get_state_by_label(SUCCESS_LABEL), copied.success_state());
        assert_eq!(original, copied);
    }

    #[test]
    fn test_create_transition_with_absent_source_is_silent_noop() {
        let mut fragment = sample_fragment("srv");
        let before: Vec<Transition> = fragment.transitions().cloned().collect();

        assert_eq!(fragment.create_transition(StateId(99), StateId(0), "x", "1"), None);
        assert_eq!(fragment.create_transition(None, StateId(0), "x", "1"), None);
        let after: Vec<Transition> = fragment.transitions().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_create_interface_builds_complement_probabilities() {
        let fragment = abstracting_fragment("client", "srv");
        let occurrences = fragment.interface_occurrences("srv").unwrap();
        assert_eq!(occurrences.len(), 1);

        let interface = &occurrences[0];
        assert_eq!(interface.success_transition().probability, "srv");
        assert_eq!(interface.error_transition().probability, "1 - srv");
        // Both boundary transitions are part of the transition table.
        let outgoing = fragment.transitions_from(interface.initial());
        assert_eq!(outgoing.len(), 2);
    }

    #[test]
    fn test_create_interface_with_unknown_state_registers_nothing() {
        let mut fragment = sample_fragment("srv");
        assert!(fragment.create_interface("dep", StateId(42), StateId(0), StateId(1)).is_none());
        assert!(fragment.interfaces().is_empty());
        assert!(fragment.transitions_from(StateId(0)).iter().all(|t| t.probability != "dep"));
    }

    #[test]
    fn test_same_dependency_abstracted_twice_appends_occurrences() {
        let mut fragment = Fdtmc::new();
        fragment.set_variable_name("looped");
        let initial = fragment.create_initial_state();
        let mid = fragment.create_state();
        let success = fragment.create_success_state();
        let error = fragment.create_error_state();
        fragment.create_interface("dep", initial, mid, error).unwrap();
        fragment.create_interface("dep", mid, success, error).unwrap();

        assert_eq!(fragment.interfaces().len(), 1);
        assert_eq!(fragment.interface_occurrences("dep").unwrap().len(), 2);
    }

    #[test]
    fn test_inline_stitches_dependency_between_boundary_states() {
        let caller = abstracting_fragment("client", "x");
        let dependency = sample_fragment("x");
        let mut models = HashMap::new();
        models.insert("x".to_string(), dependency);

        let inlined = caller.inline(&models);

        // Base copy keeps indices 0..=2; the dependency copy lands at 3..=5.
        assert_eq!(inlined.states().len(), 6);
        let entry = inlined.transitions_from(StateId(0));
        assert_eq!(entry.len(), 1);
        assert_eq!(entry[0].target, StateId(3));
        assert_eq!(entry[0].probability, "1");

        // Dependency success (index 4) links back to the interface success;
        // dependency error (index 5) links back to the interface error.
        let back_success = inlined.transitions_from(StateId(4)).iter().find(|t| t.probability == "1").unwrap();
        assert_eq!(back_success.target, StateId(1));
        let back_error = inlined.transitions_from(StateId(5)).iter().find(|t| t.probability == "1").unwrap();
        assert_eq!(back_error.target, StateId(2));

        // The symbolic branch is gone, and so is the registration.
        assert!(inlined.transitions_from(StateId(0)).iter().all(|t| t.probability != "x"));
        assert!(inlined.interface_occurrences("x").is_none());
    }

    #[test]
    fn test_inline_omits_error_link_when_dependency_has_no_error_state() {
        let caller = abstracting_fragment("client", "x");
        let mut dependency = Fdtmc::new();
        dependency.set_variable_name("x");
        let initial = dependency.create_initial_state();
        let success = dependency.create_success_state();
        dependency.create_transition(initial, success, "", "0.9");
        let mut models = HashMap::new();
        models.insert("x".to_string(), dependency);

        let inlined = caller.inline(&models);
        // Caller error state (index 2) receives no incoming link.
        assert!(inlined.transitions().all(|t| t.target != StateId(2)));
    }

    #[test]
    fn test_inline_keeps_unresolved_interfaces_resolvable() {
        let caller = abstracting_fragment("client", "x");
        let unresolved = caller.inline(&HashMap::new());

        // Symbolic branch and registration both survive.
        assert_eq!(unresolved.interface_occurrences("x").unwrap().len(), 1);
        assert!(unresolved.transitions_from(StateId(0)).iter().any(|t| t.probability == "x"));

        // A later inline still resolves it.
        let mut models = HashMap::new();
        models.insert("x".to_string(), sample_fragment("x"));
        let resolved = unresolved.inline(&models);
        assert!(resolved.interface_occurrences("x").is_none());
        assert_eq!(resolved.states().len(), 6);
    }

    #[test]
    fn test_inline_never_mutates_inputs() {
        let caller = abstracting_fragment("client", "x");
        let dependency = sample_fragment("x");
        let caller_snapshot = caller.clone();
        let dependency_snapshot = dependency.clone();

        let mut models = HashMap::new();
        models.insert("x".to_string(), dependency);
        let _ = caller.inline(&models);

        assert_eq!(caller, caller_snapshot);
        assert_eq!(models["x"], dependency_snapshot);
    }

    #[test]
    fn test_inline_with_empty_map_equals_copy() {
        let caller = abstracting_fragment("client", "x");
        assert_eq!(caller.inline(&HashMap::new()), caller.copy());
    }

    #[test]
    fn test_decorated_with_presence_adds_one_state_and_two_transitions() {
        let fragment = sample_fragment("srv");
        let decorated = fragment.decorated_with_presence("fSrv");

        assert_eq!(decorated.states().len(), fragment.states().len() + 1);
        assert_eq!(decorated.transitions().count(), fragment.transitions().count() + 2);

        let new_initial = decorated.initial_state().unwrap();
        assert_eq!(new_initial.index(), fragment.states().len());
        let branches = decorated.transitions_from(new_initial);
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].probability, "fSrv");
        assert_eq!(branches[0].target, StateId(0));
        assert_eq!(branches[1].probability, "1-fSrv");
        assert_eq!(branches[1].target, decorated.success_state().unwrap());
    }

    #[test]
    fn test_if_then_else_composes_only_the_present_branch() {
        let present = sample_fragment("srv");
        let absent = sample_fragment("alt");
        let composed = Fdtmc::if_then_else("fSrv", &present, &absent);
        assert_eq!(composed, present.decorated_with_presence("fSrv"));
    }

    #[test]
    fn test_get_transition_by_action_finds_first_match() {
        let fragment = sample_fragment("srv");
        let found = fragment.get_transition_by_action("run").unwrap();
        assert_eq!(found.probability, "0.99");
        assert!(fragment.get_transition_by_action("missing").is_none());
    }

    #[test]
    fn test_equality_is_structural_not_identity() {
        let a = sample_fragment("srv");
        let b = sample_fragment("srv");
        assert_eq!(a, b);

        let mut c = sample_fragment("srv");
        c.create_transition(StateId(0), StateId(0), "idle", "0.5");
        assert_ne!(a, c);

        let d = sample_fragment("other");
        assert_ne!(a, d);
    }

    #[test]
    fn test_display_matches_dump_format() {
        let fragment = sample_fragment("srv");
        let dump = fragment.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "srv=0(initial) --- run / 0.99 ---> srv=1(success)");
        assert_eq!(lines[1], "srv=0(initial) --- run / 0.01 ---> srv=2(error)");
    }
}
