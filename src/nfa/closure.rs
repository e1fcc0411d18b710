use tracing::trace;

use crate::prelude::*;

impl<Q: StateName, S: Symbol> Nfa<Q, S> {
    /// Computes the epsilon closure of a single state, that is the smallest set containing
    /// `state` which is closed under taking epsilon edges.
    ///
    /// The closure is computed with an explicit stack, a state is only pushed if it is not
    /// yet part of the result, so every state is processed at most once.
    pub fn closure(&self, state: StateIndex) -> StateSet {
        let mut closure = StateSet::with_capacity(self.size());
        let mut stack = vec![state];

        while let Some(current) = stack.pop() {
            if !closure.insert(current) {
                continue;
            }
            if let Some(successors) = self.successors(current, &Label::Epsilon) {
                stack.extend(successors.iter().filter(|q| !closure.contains(*q)));
            }
        }

        trace!("closure of {state} is {closure:?}");
        closure
    }

    /// Computes the epsilon closure of a set of states as the union of the closures of its
    /// members.
    pub fn closure_of_set<I>(&self, states: I) -> StateSet
    where
        I: IntoIterator<Item = StateIndex>,
    {
        let mut closure = StateSet::with_capacity(self.size());
        for state in states {
            if closure.contains(state) {
                // closed under epsilon already, so its closure adds nothing
                continue;
            }
            closure.union_with(&self.closure(state));
        }
        closure
    }

    /// Collects all states that can be reached from some state in `states` by exactly one
    /// edge labelled with `symbol`. If no state has such an edge, the result is empty.
    pub fn move_on(&self, states: &StateSet, symbol: &S) -> StateSet {
        let label = Label::Sym(symbol.clone());
        let mut targets = StateSet::with_capacity(self.size());
        for state in states.iter() {
            if let Some(successors) = self.successors(state, &label) {
                targets.union_with(successors);
            }
        }
        trace!("move from {states:?} on {} gives {targets:?}", symbol.show());
        targets
    }
}
