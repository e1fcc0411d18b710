use tracing::debug;

use crate::{
    math::{Map, OrderedSet},
    prelude::*,
};

/// A state of a [`Dfa`], given as the set of names of the [`Nfa`] states it consists of.
pub type Subset<Q> = OrderedSet<Q>;

/// A single transition `δ(source, symbol) = target` of a [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<'a, Q, S> {
    /// The state the transition leaves.
    pub source: &'a Subset<Q>,
    /// The symbol it reads.
    pub symbol: &'a S,
    /// The state it leads to.
    pub target: &'a Subset<Q>,
}

/// A deterministic finite automaton obtained from an [`Nfa`] through the subset construction.
///
/// Every state is a [`Subset`] of the states of the underlying [`Nfa`], the first one being
/// the start state. The transition function is total, the empty subset (if it is reachable)
/// is an ordinary, non-final state from which there is no escape. A state is final if and
/// only if it contains a final state of the [`Nfa`].
#[derive(Clone)]
pub struct Dfa<Q = String, S = String> {
    alphabet: Alphabet<S>,
    states: Vec<Subset<Q>>,
    index: Map<Subset<Q>, usize>,
    finals: Vec<bool>,
    successors: Vec<Vec<usize>>,
}

/// Assembles the result of the subset construction into a [`Dfa`], translating the sets of
/// state indices back into the declared names. States stay in discovery order, nothing is
/// merged or renamed.
pub fn materialize<Q: StateName, S: Symbol>(
    nfa: &Nfa<Q, S>,
    construction: &SubsetConstruction<S>,
) -> Dfa<Q, S> {
    let states: Vec<Subset<Q>> = construction
        .states()
        .map(|set| nfa.names_of(set))
        .collect();
    let index = states
        .iter()
        .enumerate()
        .map(|(id, subset)| (subset.clone(), id))
        .collect();
    let finals: Vec<bool> = construction
        .states()
        .map(|set| set.intersects(nfa.final_states()))
        .collect();
    let successors = (0..construction.len())
        .map(|id| construction.successor_ids(id).to_vec())
        .collect();

    debug!(
        "materialized DFA with {} states, {} of them final",
        states.len(),
        finals.iter().filter(|f| **f).count()
    );
    Dfa {
        alphabet: construction.alphabet().clone(),
        states,
        index,
        finals,
        successors,
    }
}

impl<Q: StateName, S: Symbol> Nfa<Q, S> {
    /// Converts `self` into an equivalent [`Dfa`] by running the subset construction and
    /// materializing its result.
    pub fn determinize(&self) -> Dfa<Q, S> {
        self.determinize_with(Worklist::default())
    }

    /// Works as [`Nfa::determinize`], expanding sets in the given order.
    pub fn determinize_with(&self, order: Worklist) -> Dfa<Q, S> {
        materialize(self, &self.subset_construction_with(order))
    }
}

impl<Q: StateName, S: Symbol> Dfa<Q, S> {
    /// The alphabet, epsilon is never part of it.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// The number of states, including the dead state if it is reachable.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// The start state, which is the epsilon closure of the initial states of the [`Nfa`].
    pub fn start(&self) -> &Subset<Q> {
        &self.states[0]
    }

    /// Iterates over all states in the order in which they were discovered.
    pub fn states(&self) -> std::slice::Iter<'_, Subset<Q>> {
        self.states.iter()
    }

    /// Iterates over the final states.
    pub fn final_states(&self) -> impl Iterator<Item = &Subset<Q>> + '_ {
        self.states
            .iter()
            .zip(&self.finals)
            .filter_map(|(q, f)| f.then_some(q))
    }

    /// Returns true if `state` is a final state of `self`.
    pub fn is_final(&self, state: &Subset<Q>) -> bool {
        self.id_of(state).is_some_and(|id| self.finals[id])
    }

    /// Returns true if `state` is a state of `self`.
    pub fn contains(&self, state: &Subset<Q>) -> bool {
        self.index.contains_key(state)
    }

    /// Returns the empty state if it is reachable.
    pub fn dead_state(&self) -> Option<&Subset<Q>> {
        self.states.iter().find(|q| q.is_empty())
    }

    /// Gives the state reached from `state` on `symbol`. This is `None` only if `state` is
    /// not a state of `self` or `symbol` is not in the alphabet.
    pub fn successor(&self, state: &Subset<Q>, symbol: &S) -> Option<&Subset<Q>> {
        let id = self.id_of(state)?;
        let pos = self.alphabet.position(symbol)?;
        Some(&self.states[self.successors[id][pos]])
    }

    /// Iterates over all transitions, grouped by source state in discovery order and ordered
    /// by symbol within each group.
    pub fn transitions(&self) -> impl Iterator<Item = Transition<'_, Q, S>> + '_ {
        self.states.iter().enumerate().flat_map(move |(id, source)| {
            self.alphabet
                .universe()
                .zip(&self.successors[id])
                .map(move |(symbol, &t)| Transition {
                    source,
                    symbol,
                    target: &self.states[t],
                })
        })
    }

    /// Runs `word` from the start state and returns whether a final state is reached. Words
    /// containing symbols outside of the alphabet are rejected.
    pub fn accepts<W>(&self, word: W) -> bool
    where
        W: IntoIterator<Item = S>,
    {
        let mut current = 0;
        for symbol in word {
            let Some(pos) = self.alphabet.position(&symbol) else {
                return false;
            };
            current = self.successors[current][pos];
        }
        self.finals[current]
    }

    pub(crate) fn id_of(&self, state: &Subset<Q>) -> Option<usize> {
        self.index.get(state).copied()
    }
}
