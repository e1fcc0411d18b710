use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    math::{Map, OrderedMap},
    prelude::*,
};

mod state_set;
pub use state_set::StateSet;

/// Determines in which order the subset construction expands discovered sets. The result of
/// the construction does not depend on it, only the order in which sets are discovered does.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Worklist {
    /// Expand the most recently discovered set first.
    #[default]
    Stack,
    /// Expand sets in the order in which they were discovered.
    Queue,
}

impl Worklist {
    fn take(&self, pending: &mut VecDeque<usize>) -> Option<usize> {
        match self {
            Worklist::Stack => pending.pop_back(),
            Worklist::Queue => pending.pop_front(),
        }
    }
}

/// Result of applying the subset construction to an [`Nfa`]. It holds every set of states
/// that was discovered (the start set is the first one) and, for each of them and each symbol
/// of the alphabet, the set that is reached. The table is total: every discovered set has a
/// successor for every symbol, which may be the empty set.
#[derive(Clone)]
pub struct SubsetConstruction<S> {
    alphabet: Alphabet<S>,
    states: Vec<StateSet>,
    index: Map<StateSet, usize>,
    // state -> symbol position -> state
    successors: Vec<Vec<usize>>,
}

/// Applies the subset construction to `nfa` with the default [`Worklist`].
pub fn construct<Q: StateName, S: Symbol>(nfa: &Nfa<Q, S>) -> SubsetConstruction<S> {
    nfa.subset_construction()
}

impl<Q: StateName, S: Symbol> Nfa<Q, S> {
    /// Runs the subset construction, expanding discovered sets in stack order.
    pub fn subset_construction(&self) -> SubsetConstruction<S> {
        self.subset_construction_with(Worklist::default())
    }

    /// Runs the subset construction, expanding discovered sets in the given order.
    ///
    /// The start set is the epsilon closure of the initial states. Whenever a set is
    /// expanded, we compute for each symbol the epsilon closure of the states reachable by a
    /// single transition on that symbol. If the resulting set was not seen before, it is
    /// registered and scheduled for expansion. Sets are identified by their members, so each
    /// distinct set is expanded exactly once and the loop terminates.
    pub fn subset_construction_with(&self, order: Worklist) -> SubsetConstruction<S> {
        let alphabet = self.alphabet().clone();
        let mut states = vec![];
        let mut index = Map::default();
        let mut successors: Vec<Vec<usize>> = vec![];
        let mut pending = VecDeque::new();

        let start = self.closure_of_set(self.initial_states().iter());
        trace!("start set is {start:?}");
        index.insert(start.clone(), 0);
        states.push(start);
        successors.push(vec![]);
        pending.push_back(0);

        while let Some(current) = order.take(&mut pending) {
            let mut row = Vec::with_capacity(alphabet.size());
            for symbol in alphabet.universe() {
                let moved = self.move_on(&states[current], symbol);
                let target = self.closure_of_set(moved.iter());

                let id = match index.get(&target) {
                    Some(&id) => id,
                    None => {
                        let id = states.len();
                        trace!("discovered {target:?} as {id}");
                        index.insert(target.clone(), id);
                        states.push(target);
                        successors.push(vec![]);
                        pending.push_back(id);
                        id
                    }
                };
                row.push(id);
            }
            successors[current] = row;
        }

        debug!(
            "subset construction discovered {} sets from an NFA with {} states",
            states.len(),
            self.size()
        );
        debug_assert!(successors.iter().all(|row| row.len() == alphabet.size()));

        SubsetConstruction {
            alphabet,
            states,
            index,
            successors,
        }
    }
}

impl<S: Symbol> SubsetConstruction<S> {
    /// The alphabet of the underlying automaton.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// The start set, i.e. the epsilon closure of the initial states.
    pub fn start(&self) -> &StateSet {
        &self.states[0]
    }

    /// The number of discovered sets.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false, the start set is discovered in any case.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over the discovered sets in the order in which they were discovered.
    pub fn states(&self) -> std::slice::Iter<'_, StateSet> {
        self.states.iter()
    }

    /// Returns true if `set` was discovered.
    pub fn contains(&self, set: &StateSet) -> bool {
        self.index.contains_key(set)
    }

    /// Position of `set` in discovery order.
    pub fn id_of(&self, set: &StateSet) -> Option<usize> {
        self.index.get(set).copied()
    }

    /// The set reached from `set` on `symbol`. Returns `None` only if `set` was not
    /// discovered or `symbol` is not in the alphabet.
    pub fn successor(&self, set: &StateSet, symbol: &S) -> Option<&StateSet> {
        let id = self.id_of(set)?;
        let pos = self.alphabet.position(symbol)?;
        Some(&self.states[self.successors[id][pos]])
    }

    /// Iterates over the outgoing transitions of `set`, ordered by symbol.
    pub fn transitions_from(
        &self,
        set: &StateSet,
    ) -> Option<impl Iterator<Item = (&S, &StateSet)> + '_> {
        let id = self.id_of(set)?;
        Some(
            self.alphabet
                .universe()
                .zip(self.successors[id].iter().map(move |&t| &self.states[t])),
        )
    }

    /// Iterates over the successor ids of the set with the given id.
    pub(crate) fn successor_ids(&self, id: usize) -> &[usize] {
        &self.successors[id]
    }

    /// Returns the whole table as an ordered map, this is independent of the discovery
    /// order and thus suited for comparing constructions.
    pub fn table(&self) -> OrderedMap<StateSet, OrderedMap<S, StateSet>> {
        self.states
            .iter()
            .enumerate()
            .map(|(id, set)| {
                let row = self
                    .alphabet
                    .universe()
                    .cloned()
                    .zip(self.successors[id].iter().map(|&t| self.states[t].clone()))
                    .collect();
                (set.clone(), row)
            })
            .collect()
    }
}

impl<S: Symbol> std::fmt::Debug for SubsetConstruction<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Subset construction starting in {:?}", self.start())?;
        for (id, set) in self.states.iter().enumerate() {
            writeln!(
                f,
                "  {set:?}: {}",
                self.alphabet
                    .universe()
                    .zip(&self.successors[id])
                    .map(|(sym, &t)| format!("{} → {:?}", sym.show(), self.states[t]))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::{math::Set, prelude::*};

    fn set(nfa: &Nfa<&'static str, char>, names: &[&'static str]) -> StateSet {
        names.iter().map(|n| nfa.index_of(n).unwrap()).collect()
    }

    #[test_log::test]
    fn ends_in_01() {
        let nfa = crate::tests::ends_in_01();
        let sc = construct(&nfa);

        let a = set(&nfa, &["A"]);
        let ab = set(&nfa, &["A", "B"]);
        let c = set(&nfa, &["C"]);
        let dead = StateSet::default();

        assert_eq!(sc.start(), &a);
        assert_eq!(sc.len(), 4);
        for s in [&a, &ab, &c, &dead] {
            assert!(sc.contains(s), "{s:?} is missing");
        }

        assert_eq!(sc.successor(&a, &'0'), Some(&ab));
        assert_eq!(sc.successor(&a, &'1'), Some(&dead));
        assert_eq!(sc.successor(&ab, &'0'), Some(&ab));
        assert_eq!(sc.successor(&ab, &'1'), Some(&c));
        assert_eq!(sc.successor(&c, &'0'), Some(&dead));
        assert_eq!(sc.successor(&c, &'1'), Some(&dead));
        assert_eq!(sc.successor(&dead, &'0'), Some(&dead));
        assert_eq!(sc.successor(&a, &'x'), None);
        assert_eq!(
            sc.transitions_from(&ab).unwrap().collect_vec(),
            vec![(&'0', &ab), (&'1', &c)]
        );
    }

    #[test]
    fn epsilon_start() {
        let nfa = crate::tests::epsilon_chain();
        let sc = nfa.subset_construction();
        assert_eq!(sc.start().iter().collect_vec(), vec![0, 1, 2]);
        assert!(sc.start().intersects(nfa.final_states()));
        // `a` leads nowhere
        assert_eq!(sc.len(), 2);
    }

    #[test]
    fn no_transitions_at_all() {
        let nfa = Nfa::builder()
            .with_states(["A"])
            .with_alphabet(['x', 'y'])
            .with_initial("A")
            .build()
            .unwrap();
        let sc = nfa.subset_construction();
        assert_eq!(sc.len(), 2);
        let dead = StateSet::default();
        assert_eq!(sc.successor(sc.start(), &'x'), Some(&dead));
        assert_eq!(sc.successor(sc.start(), &'y'), Some(&dead));
    }

    #[test]
    fn empty_alphabet() {
        let nfa = Nfa::<_, char>::builder()
            .with_states(["A", "B"])
            .with_initial("A")
            .with_epsilon("A", ["B"])
            .build()
            .unwrap();
        let sc = nfa.subset_construction();
        assert_eq!(sc.len(), 1);
        assert_eq!(sc.transitions_from(sc.start()).unwrap().count(), 0);
    }

    #[test]
    fn order_does_not_matter() {
        let nfa = crate::tests::ends_in_01();
        let stack = nfa.subset_construction_with(Worklist::Stack);
        let queue = nfa.subset_construction_with(Worklist::Queue);
        assert_eq!(stack.start(), queue.start());
        assert_eq!(stack.table(), queue.table());
    }

    #[test]
    fn several_initial_states() {
        let nfa = Nfa::builder()
            .with_states([0u32, 1, 2])
            .with_alphabet(['a'])
            .with_initial_states([0, 2])
            .with_transition(0, 'a', [1])
            .with_transition(2, 'a', [2])
            .build()
            .unwrap();
        let sc = nfa.subset_construction();
        assert_eq!(sc.start().iter().collect_vec(), vec![0, 2]);
        assert_eq!(
            sc.successor(sc.start(), &'a').unwrap().iter().collect_vec(),
            vec![1, 2]
        );
    }

    #[test]
    fn everything_is_reachable_and_total() {
        let nfa = crate::tests::ends_in_01();
        let sc = nfa.subset_construction();

        let mut seen = Set::default();
        let mut stack = vec![sc.start().clone()];
        while let Some(set) = stack.pop() {
            if !seen.insert(set.clone()) {
                continue;
            }
            for symbol in sc.alphabet().universe() {
                let target = sc.successor(&set, symbol).expect("table must be total");
                assert!(sc.contains(target));
                stack.push(target.clone());
            }
        }
        assert_eq!(seen.len(), sc.len());
        assert!(sc.states().all(|s| seen.contains(s)));
    }
}
