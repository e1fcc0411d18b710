use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::Show;

/// The textual form of [`Label::Epsilon`].
pub const EPSILON: &str = "λ";

/// A symbol is anything that can label a transition. This trait is implemented for every
/// type satisfying the bounds, so `char`, `String`, `&str` and integers all work.
pub trait Symbol: Clone + Eq + Ord + Hash + Debug + Show {}

impl<T: Clone + Eq + Ord + Hash + Debug + Show> Symbol for T {}

/// The label of an edge in an [`crate::Nfa`]. Either a symbol of the alphabet, or the
/// reserved empty-string label that is consumed without reading input.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label<S> {
    /// The empty word.
    Epsilon,
    /// A single symbol of the alphabet.
    Sym(S),
}

impl<S> Label<S> {
    /// Returns true if and only if `self` is [`Label::Epsilon`].
    pub fn is_epsilon(&self) -> bool {
        matches!(self, Label::Epsilon)
    }

    /// Returns the symbol if `self` is not epsilon.
    pub fn symbol(&self) -> Option<&S> {
        match self {
            Label::Epsilon => None,
            Label::Sym(sym) => Some(sym),
        }
    }
}

impl<S> From<S> for Label<S> {
    fn from(value: S) -> Self {
        Label::Sym(value)
    }
}

impl<S: Show> Show for Label<S> {
    fn show(&self) -> String {
        match self {
            Label::Epsilon => EPSILON.to_string(),
            Label::Sym(sym) => sym.show(),
        }
    }
}

/// A finite, ordered and duplicate free collection of symbols. Epsilon is never part of an
/// alphabet.
///
/// # Example
/// ```
/// use nfa2dfa::prelude::*;
///
/// let alphabet = Alphabet::from_iter(['b', 'a', 'b']);
/// assert_eq!(alphabet.size(), 2);
/// assert_eq!(alphabet.position(&'b'), Some(1));
/// ```
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Alphabet<S>(Vec<S>);

impl<S> Default for Alphabet<S> {
    fn default() -> Self {
        Self(vec![])
    }
}

impl Alphabet<char> {
    /// Creates a new alphabet of the given size. The symbols are just the first `size`
    /// letters of the alphabet, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size <= 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }
}

impl<S: Symbol> FromIterator<S> for Alphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

impl<S: Symbol> Alphabet<S> {
    /// The number of symbols.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over all symbols in ascending order.
    pub fn universe(&self) -> std::slice::Iter<'_, S> {
        self.0.iter()
    }

    /// Returns true if `symbol` is part of the alphabet.
    pub fn contains(&self, symbol: &S) -> bool {
        self.position(symbol).is_some()
    }

    /// Returns the position of `symbol` in the ascending order of the alphabet.
    pub fn position(&self, symbol: &S) -> Option<usize> {
        self.0.binary_search(symbol).ok()
    }

    /// Returns the symbol at position `pos`.
    pub fn nth(&self, pos: usize) -> Option<&S> {
        self.0.get(pos)
    }
}

impl<S: Show> Show for Alphabet<S> {
    fn show(&self) -> String {
        format!("[{}]", self.0.iter().map(|sym| sym.show()).join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_sorted_and_deduplicated() {
        let alphabet: Alphabet<String> = ["b", "a", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            alphabet.universe().cloned().collect_vec(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(alphabet.contains(&"c".to_string()));
        assert!(!alphabet.contains(&"d".to_string()));
        assert_eq!(alphabet.show(), "[a, b, c]");
    }

    #[test]
    fn labels() {
        let eps: Label<char> = Label::Epsilon;
        assert!(eps.is_epsilon());
        assert_eq!(eps.symbol(), None);
        assert_eq!(eps.show(), "λ");

        let a = Label::from('a');
        assert_eq!(a.symbol(), Some(&'a'));
        assert!(eps < a);
    }

    #[test]
    fn of_size() {
        assert_eq!(Alphabet::of_size(3).universe().collect_vec(), vec![&'a', &'b', &'c']);
        assert!(Alphabet::of_size(0).is_empty());
    }
}
