//! Library for converting nondeterministic finite automata into deterministic ones.
//!
//! An [`Nfa`] consists of a finite set of declared states, an [`Alphabet`], a set of initial
//! states, a set of final states and a transition relation. Edges are labelled with a
//! [`Label`], which is either a symbol of the alphabet or [`Label::Epsilon`], the label of a
//! transition that can be taken without reading any input. An `Nfa` can only be obtained
//! through [`NfaBuilder`] (or the text front end in [`parse`]), which validates the
//! description and fails with a [`ValidationError`] on the first violation it finds.
//!
//! The conversion is the classic subset construction. A state of the resulting automaton is a
//! [`StateSet`], i.e. a set of states of the `Nfa`. Starting from the epsilon closure of the
//! initial states, the construction repeatedly computes, for every symbol, the epsilon closure
//! of all states reachable through one transition on that symbol. Only reachable sets are ever
//! materialized and the empty set (the dead state) is kept as an ordinary state, so the
//! transition table of the result is total.
//!
//! ```
//! use nfa2dfa::prelude::*;
//!
//! let nfa = Nfa::builder()
//!     .with_states(["A", "B", "C"])
//!     .with_alphabet(['0', '1'])
//!     .with_initial("A")
//!     .with_finals(["C"])
//!     .with_transition("A", '0', ["A", "B"])
//!     .with_transition("B", '1', ["C"])
//!     .build()
//!     .unwrap();
//!
//! let dfa = nfa.determinize();
//! assert_eq!(dfa.size(), 4);
//! assert!(dfa.accepts(['0', '1']));
//! assert!(!dfa.accepts(['1']));
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use nfa2dfa::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Label, Symbol, EPSILON},
        dfa::{materialize, Dfa, Subset, Transition},
        error::{Location, ValidationError, ValidationErrorKind},
        math,
        nfa::{Nfa, NfaBuilder, StateIndex, StateName},
        parse::{transition_template, FormInput},
        subset::{construct, StateSet, SubsetConstruction, Worklist},
        Show,
    };
}

/// Type aliases for the collections used throughout the crate.
pub mod math;

/// Module that contains definitions for dealing with alphabets and edge labels.
pub mod alphabet;
pub use alphabet::{Alphabet, Label};

/// Errors reported by the validation layer.
pub mod error;
pub use error::ValidationError;

/// Nondeterministic automata, their validation and the epsilon closure.
pub mod nfa;
pub use nfa::{Nfa, NfaBuilder};

/// The subset construction.
pub mod subset;
pub use subset::{StateSet, SubsetConstruction};

/// Deterministic automata produced by the subset construction.
#[allow(clippy::upper_case_acronyms)]
pub mod dfa;
pub use dfa::Dfa;

/// Textual representations of a [`Dfa`].
pub mod display;

/// Reading automata from their textual description.
pub mod parse;

/// Implements the generation of random automata and words.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, symbols and sets of them.
pub trait Show {
    /// Returns a human readable representation of `self`. For a state this is its name, for a
    /// symbol it is the symbol itself.
    fn show(&self) -> String;

    /// Show a collection of the thing, for a collection of states this should be `{q0, q1, ...}`.
    /// An empty collection is shown as `∅`.
    fn show_collection<'a, I>(iter: I) -> String
    where
        Self: 'a,
        I: IntoIterator<Item = &'a Self>,
    {
        let inner = itertools::Itertools::join(&mut iter.into_iter().map(|x| x.show()), ", ");
        if inner.is_empty() {
            "∅".to_string()
        } else {
            format!("{{{inner}}}")
        }
    }
}

impl Show for usize {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for u32 {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for char {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for str {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl Show for String {
    fn show(&self) -> String {
        self.clone()
    }
}

impl<S: Show + ?Sized> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}

impl<S: Show, T: Show> Show for (S, T) {
    fn show(&self) -> String {
        format!("({}, {})", self.0.show(), self.1.show())
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    /// States `{A, B, C}` over `{0, 1}`, accepting words that end in `01`.
    pub fn ends_in_01() -> Nfa<&'static str, char> {
        Nfa::builder()
            .with_states(["A", "B", "C"])
            .with_alphabet(['0', '1'])
            .with_initial("A")
            .with_finals(["C"])
            .with_transition("A", '0', ["A", "B"])
            .with_transition("B", '1', ["C"])
            .build()
            .unwrap()
    }

    /// Epsilon chain `A -λ-> B -λ-> C` with `C` final.
    pub fn epsilon_chain() -> Nfa<&'static str, char> {
        Nfa::builder()
            .with_states(["A", "B", "C"])
            .with_alphabet(['a'])
            .with_initial("A")
            .with_finals(["C"])
            .with_epsilon("A", ["B"])
            .with_epsilon("B", ["C"])
            .build()
            .unwrap()
    }

    #[test]
    fn show_collections() {
        assert_eq!(char::show_collection(&['a', 'b']), "{a, b}");
        assert_eq!(usize::show_collection(&[]), "∅");
        assert_eq!(("A", 'b').show(), "(A, b)");
    }
}
