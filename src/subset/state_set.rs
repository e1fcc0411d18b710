use bit_set::BitSet;
use itertools::Itertools;

use crate::nfa::StateIndex;

/// A set of state indices of an [`crate::Nfa`], which is what a state of the subset
/// construction is. The set is stored as a bitset over the indices, so two sets are equal
/// (and hash equally) if and only if they have the same members, independently of the order
/// in which they were inserted and of the capacity they were allocated with.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateSet(BitSet);

impl StateSet {
    /// Creates an empty set with room for indices up to `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(BitSet::with_capacity(capacity))
    }

    /// Creates the set containing only `state`.
    pub fn singleton(state: StateIndex) -> Self {
        Self::from_iter([state])
    }

    /// Inserts `state`, returns false if it was present already.
    pub fn insert(&mut self, state: StateIndex) -> bool {
        self.0.insert(state)
    }

    /// Returns true if `state` is a member.
    pub fn contains(&self, state: StateIndex) -> bool {
        self.0.contains(state)
    }

    /// Adds all members of `other` to `self`.
    pub fn union_with(&mut self, other: &StateSet) {
        self.0.union_with(&other.0)
    }

    /// Returns true if the two sets share at least one member.
    pub fn intersects(&self, other: &StateSet) -> bool {
        !self.0.is_disjoint(&other.0)
    }

    /// Returns true if every member of `self` is a member of `other`.
    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true for the empty set, which is the dead state of the subset construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.0.iter()
    }
}

impl FromIterator<StateIndex> for StateSet {
    fn from_iter<T: IntoIterator<Item = StateIndex>>(iter: T) -> Self {
        Self(BitSet::from_iter(iter))
    }
}

impl Extend<StateIndex> for StateSet {
    fn extend<T: IntoIterator<Item = StateIndex>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "∅")
        } else {
            write!(f, "{{{}}}", self.iter().join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::StateSet;

    fn hash_of(set: &StateSet) -> u64 {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn value_equality() {
        let mut left = StateSet::with_capacity(64);
        left.insert(3);
        left.insert(1);
        let right = StateSet::from_iter([1, 3, 1]);

        assert_eq!(left, right);
        assert_eq!(hash_of(&left), hash_of(&right));
        assert_ne!(left, StateSet::singleton(1));
        assert_eq!(StateSet::with_capacity(10), StateSet::default());
    }

    #[test]
    fn set_operations() {
        let mut set = StateSet::from_iter([0, 2]);
        assert!(set.intersects(&StateSet::from_iter([2, 5])));
        assert!(!set.intersects(&StateSet::default()));
        set.union_with(&StateSet::from_iter([5]));
        assert_eq!(set.len(), 3);
        assert!(StateSet::singleton(5).is_subset(&set));
        assert!(!set.insert(0));
        assert_eq!(format!("{set:?}"), "{0, 2, 5}");
        assert_eq!(format!("{:?}", StateSet::default()), "∅");
    }
}
