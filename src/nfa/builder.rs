use tracing::{debug, trace};

use crate::{
    error::{Location, ValidationError, ValidationErrorKind as Kind},
    math::{Bijection, Map},
    prelude::*,
};

/// Helper struct for the construction of an [`Nfa`]. It collects the declared states, the
/// alphabet, initial and final states as well as a list of transitions. Nothing is checked
/// until [`NfaBuilder::build`] is called, which validates everything in one go.
///
/// # Example
///
/// We want an automaton over `['a', 'b']` with states `p` and `q`, where `p` is initial and
/// moves to `q` on `a` or without reading anything, and `q` is final.
/// ```
/// use nfa2dfa::prelude::*;
///
/// let nfa = Nfa::builder()
///     .with_states(["p", "q"])
///     .with_alphabet(['a', 'b'])
///     .with_initial("p")
///     .with_finals(["q"])
///     .with_transition("p", 'a', ["q"])
///     .with_epsilon("p", ["q"])
///     .build()
///     .unwrap();
/// assert_eq!(nfa.size(), 2);
/// ```
///
/// Referring to anything that was not declared is rejected, the error points at the first
/// offending piece of the description.
/// ```
/// use nfa2dfa::prelude::*;
///
/// let err = Nfa::builder()
///     .with_states(["p"])
///     .with_alphabet(['a'])
///     .with_initial("p")
///     .with_transition("p", 'a', ["x"])
///     .build()
///     .unwrap_err();
/// assert_eq!(err.location, Location::Transition(0));
/// assert_eq!(err.kind, ValidationErrorKind::UnknownDestination("x".into()));
/// ```
#[derive(Clone, Debug)]
pub struct NfaBuilder<Q, S> {
    states: Vec<Q>,
    alphabet: Vec<S>,
    initial: Vec<Q>,
    finals: Vec<Q>,
    transitions: Vec<(Q, Label<S>, Vec<Q>)>,
    replace_duplicates: bool,
}

impl<Q, S> Default for NfaBuilder<Q, S> {
    fn default() -> Self {
        Self {
            states: vec![],
            alphabet: vec![],
            initial: vec![],
            finals: vec![],
            transitions: vec![],
            replace_duplicates: false,
        }
    }
}

impl<Q: StateName, S: Symbol> NfaBuilder<Q, S> {
    /// Declares states. Declaring a state twice has no effect.
    pub fn with_states<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.states.extend(states);
        self
    }

    /// Declares alphabet symbols. Duplicates are removed.
    pub fn with_alphabet<I: IntoIterator<Item = S>>(mut self, symbols: I) -> Self {
        self.alphabet.extend(symbols);
        self
    }

    /// Adds `state` to the initial states.
    pub fn with_initial(mut self, state: Q) -> Self {
        self.initial.push(state);
        self
    }

    /// Adds several initial states at once. The construction treats them as if there was a
    /// fresh initial state with epsilon edges to each of them.
    pub fn with_initial_states<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.initial.extend(states);
        self
    }

    /// Marks the given states as final.
    pub fn with_finals<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.finals.extend(states);
        self
    }

    /// Adds edges from `source` to each of `targets` labelled with `label`. A symbol can
    /// be passed directly, it is converted into [`Label::Sym`]. An empty list of targets is
    /// allowed and adds nothing to the relation, but the source and label are validated.
    pub fn with_transition<L, I>(mut self, source: Q, label: L, targets: I) -> Self
    where
        L: Into<Label<S>>,
        I: IntoIterator<Item = Q>,
    {
        self.transitions
            .push((source, label.into(), targets.into_iter().collect()));
        self
    }

    /// Adds epsilon edges from `source` to each of `targets`.
    pub fn with_epsilon<I: IntoIterator<Item = Q>>(self, source: Q, targets: I) -> Self {
        self.with_transition(source, Label::Epsilon, targets)
    }

    /// Adds a list of transitions, see [`Self::with_transition`].
    pub fn with_transitions<L, I, J>(self, transitions: J) -> Self
    where
        L: Into<Label<S>>,
        I: IntoIterator<Item = Q>,
        J: IntoIterator<Item = (Q, L, I)>,
    {
        transitions
            .into_iter()
            .fold(self, |acc, (source, label, targets)| {
                acc.with_transition(source, label, targets)
            })
    }

    /// Makes a later transition for the same source and label replace the earlier ones
    /// instead of being merged with them. A later transition without targets then removes
    /// the edges added before. Every transition is still validated.
    pub fn replacing_duplicates(mut self) -> Self {
        self.replace_duplicates = true;
        self
    }

    /// Validates the collected description and turns it into an [`Nfa`]. The checks run in a
    /// fixed order and stop at the first violation: states are declared at all, the start
    /// state(s) are present and declared, the final states are declared, then every
    /// transition in the order it was added (source, symbol, destinations).
    ///
    /// Several transitions for the same source and label are merged, unless
    /// [`Self::replacing_duplicates`] was called, in which case the last one wins.
    pub fn build(self) -> Result<Nfa<Q, S>, ValidationError> {
        let mut names = Bijection::new();
        for name in self.states {
            if !names.contains_right(&name) {
                names.insert(names.len(), name);
            }
        }
        if names.is_empty() {
            return Err(ValidationError::new(Location::States, Kind::NoStates));
        }
        let size = names.len();
        let lookup = |name: &Q| names.get_by_right(name).copied();

        if self.initial.is_empty() {
            return Err(ValidationError::new(Location::Start, Kind::MissingStart));
        }
        let mut initial = StateSet::with_capacity(size);
        for name in &self.initial {
            let Some(idx) = lookup(name) else {
                return Err(ValidationError::new(
                    Location::Start,
                    Kind::UnknownStart(name.show()),
                ));
            };
            initial.insert(idx);
        }

        let mut finals = StateSet::with_capacity(size);
        for name in &self.finals {
            let Some(idx) = lookup(name) else {
                return Err(ValidationError::new(
                    Location::Finals,
                    Kind::UnknownFinal(name.show()),
                ));
            };
            finals.insert(idx);
        }

        let alphabet = Alphabet::from_iter(self.alphabet);
        let mut edges: Vec<Map<Label<S>, StateSet>> = vec![Map::default(); size];
        for (pos, (source, label, targets)) in self.transitions.into_iter().enumerate() {
            let fail = |kind| ValidationError::new(Location::Transition(pos), kind);

            let Some(from) = lookup(&source) else {
                return Err(fail(Kind::UnknownSource(source.show())));
            };
            if let Label::Sym(sym) = &label {
                if !alphabet.contains(sym) {
                    return Err(fail(Kind::UnknownSymbol(sym.show())));
                }
            }
            let mut destinations = StateSet::with_capacity(size);
            for target in &targets {
                let Some(to) = lookup(target) else {
                    return Err(fail(Kind::UnknownDestination(target.show())));
                };
                destinations.insert(to);
            }
            trace!(
                "edge {},{}→{}",
                source.show(),
                label.show(),
                Q::show_collection(&targets)
            );
            if self.replace_duplicates {
                edges[from].remove(&label);
            }
            if destinations.is_empty() {
                continue;
            }
            edges[from]
                .entry(label)
                .or_insert_with(|| StateSet::with_capacity(size))
                .union_with(&destinations);
        }

        debug!(
            "built NFA with {size} states and {} symbols",
            alphabet.size()
        );
        Ok(Nfa {
            names,
            alphabet,
            initial,
            finals,
            edges,
        })
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    fn base() -> NfaBuilder<&'static str, char> {
        Nfa::builder()
            .with_states(["A", "B", "C"])
            .with_alphabet(['0', '1'])
            .with_initial("A")
    }

    #[test]
    fn duplicate_states_are_merged() {
        let nfa = base().with_states(["A", "C"]).build().unwrap();
        assert_eq!(nfa.size(), 3);
        assert_eq!(nfa.index_of(&"C"), Some(2));
    }

    #[test]
    fn duplicate_transitions_are_merged() {
        let nfa = base()
            .with_transitions([("A", '0', vec!["B"]), ("A", '0', vec!["C"])])
            .with_transition("B", '1', [])
            .build()
            .unwrap();
        let targets = nfa.successors(0, &Label::Sym('0')).unwrap();
        assert_eq!(targets.iter().collect_vec(), vec![1, 2]);
        assert!(nfa.successors(1, &Label::Sym('1')).is_none());
    }

    #[test]
    fn later_transitions_replace_earlier_ones() {
        let nfa = base()
            .replacing_duplicates()
            .with_transition("A", '0', ["B"])
            .with_transition("A", '0', ["C"])
            .with_transition("A", '1', ["B"])
            .with_transition("A", '1', [])
            .build()
            .unwrap();
        let targets = nfa.successors(0, &Label::Sym('0')).unwrap();
        assert_eq!(targets.iter().collect_vec(), vec![2]);
        assert!(nfa.successors(0, &Label::Sym('1')).is_none());

        let err = base()
            .replacing_duplicates()
            .with_transition("A", '0', ["X"])
            .with_transition("A", '0', ["B"])
            .build()
            .unwrap_err();
        assert_eq!(err.location, Location::Transition(0));
    }

    #[test]
    fn several_initial_states() {
        let nfa = base().with_initial_states(["B", "A"]).build().unwrap();
        assert_eq!(nfa.initial_states().iter().collect_vec(), vec![0, 1]);
    }

    #[test]
    fn rejections() {
        let err = Nfa::<&str, char>::builder().build().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::NoStates);
        assert_eq!(err.location, Location::States);

        let err = Nfa::<&str, char>::builder()
            .with_states(["A"])
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MissingStart);

        let err = base().with_initial("Z").build().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownStart("Z".into()));
        assert_eq!(err.location, Location::Start);

        let err = base().with_finals(["C", "Y"]).build().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownFinal("Y".into()));
        assert_eq!(err.location, Location::Finals);

        let err = base()
            .with_transition("A", '0', ["B"])
            .with_transition("X", '0', ["B"])
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownSource("X".into()));
        assert_eq!(err.location, Location::Transition(1));

        let err = base().with_transition("A", '2', ["B"]).build().unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownSymbol("2".into()));

        let err = base()
            .with_epsilon("A", ["B", "D", "E"])
            .build()
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownDestination("D".into()));
        assert_eq!(err.location, Location::Transition(0));
    }

    #[test]
    fn first_violation_wins() {
        let err = base()
            .with_initial("Z")
            .with_transition("X", '9', ["Y"])
            .build()
            .unwrap_err();
        assert_eq!(err.location, Location::Start);
    }
}
