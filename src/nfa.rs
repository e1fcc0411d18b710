use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::{
    math::{Bijection, Map, OrderedSet},
    prelude::*,
};

mod builder;
pub use builder::NfaBuilder;

mod closure;

/// Dense index of a state of an [`Nfa`]. Indices are handed out in the order in which the
/// states were declared, starting at zero.
pub type StateIndex = usize;

/// Identifies a declared state. This trait is implemented for every type satisfying the
/// bounds, so names can be strings, chars or numbers.
pub trait StateName: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Clone + Eq + Ord + Hash + Debug + Show> StateName for T {}

/// A nondeterministic finite automaton whose edges may be labelled with epsilon.
///
/// States are stored by index, the mapping between the declared names and the indices is a
/// [`Bijection`]. For each state we keep a map from [`Label`]s to the [`StateSet`] of
/// destinations. Values of this type are only created by [`NfaBuilder::build`], so every
/// state and symbol that occurs in the transition relation has been declared.
pub struct Nfa<Q = String, S = String> {
    names: Bijection<StateIndex, Q>,
    alphabet: Alphabet<S>,
    initial: StateSet,
    finals: StateSet,
    edges: Vec<Map<Label<S>, StateSet>>,
}

impl<Q: StateName, S: Symbol> Nfa<Q, S> {
    /// Returns a builder, which is the only way of constructing an [`Nfa`].
    pub fn builder() -> NfaBuilder<Q, S> {
        NfaBuilder::default()
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.edges.len()
    }

    /// The alphabet, epsilon is never part of it.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// The set of initial states. It is never empty.
    pub fn initial_states(&self) -> &StateSet {
        &self.initial
    }

    /// The set of final states.
    pub fn final_states(&self) -> &StateSet {
        &self.finals
    }

    /// Returns true if the state with index `state` is final.
    pub fn is_final(&self, state: StateIndex) -> bool {
        self.finals.contains(state)
    }

    /// Looks up the index of the state with the given name.
    pub fn index_of(&self, name: &Q) -> Option<StateIndex> {
        self.names.get_by_right(name).copied()
    }

    /// Looks up the name of the state with the given index.
    pub fn name_of(&self, state: StateIndex) -> Option<&Q> {
        self.names.get_by_left(&state)
    }

    /// Iterates over the indices of all states.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size()
    }

    /// Translates a set of indices back into the set of declared names.
    pub fn names_of(&self, set: &StateSet) -> OrderedSet<Q> {
        set.iter()
            .filter_map(|q| self.name_of(q))
            .cloned()
            .collect()
    }

    /// Returns the destinations of the edges leaving `state` with the given `label`, if
    /// there are any.
    pub fn successors(&self, state: StateIndex, label: &Label<S>) -> Option<&StateSet> {
        self.edges.get(state)?.get(label)
    }

    /// Iterates over all transitions as `(source, label, destinations)`, ordered by source
    /// and label.
    pub fn transitions(&self) -> impl Iterator<Item = (StateIndex, &Label<S>, &StateSet)> + '_ {
        self.edges.iter().enumerate().flat_map(|(source, edges)| {
            edges
                .iter()
                .sorted_by(|a, b| a.0.cmp(b.0))
                .map(move |(label, targets)| (source, label, targets))
        })
    }

    /// Decides whether the word is accepted, by tracking the epsilon closed set of states
    /// that the automaton can be in after each prefix.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
    {
        let mut current = self.closure_of_set(self.initial.iter());
        for symbol in word {
            if current.is_empty() {
                return false;
            }
            current = self.closure_of_set(self.move_on(&current, &symbol).iter());
        }
        current.intersects(&self.finals)
    }
}

impl<Q: StateName, S: Symbol> Clone for Nfa<Q, S> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            alphabet: self.alphabet.clone(),
            initial: self.initial.clone(),
            finals: self.finals.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<Q: StateName, S: Symbol> Debug for Nfa<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "NFA over {} with initial {} and finals {}",
            self.alphabet.show(),
            Q::show_collection(&self.names_of(&self.initial)),
            Q::show_collection(&self.names_of(&self.finals)),
        )?;
        for (source, label, targets) in self.transitions() {
            writeln!(
                f,
                "  {},{}→{}",
                self.name_of(source).map(|q| q.show()).unwrap_or_default(),
                label.show(),
                self.names_of(targets).iter().map(|q| q.show()).join(",")
            )?;
        }
        Ok(())
    }
}
