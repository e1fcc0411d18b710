use tracing::debug;

use crate::prelude::*;

/// Generates a random [`Nfa`] with states `0..size` over the first `symbols` letters. For
/// every state and symbol each state becomes a destination with probability `density`, and
/// every state receives an epsilon edge to each state with probability `epsilon_density`.
/// State `0` is initial and every state is final with probability one half.
pub fn generate_random_nfa(
    size: usize,
    symbols: usize,
    density: f64,
    epsilon_density: f64,
) -> Nfa<usize, char> {
    assert!(size > 0, "an NFA needs at least one state");
    let alphabet = Alphabet::of_size(symbols);

    let mut builder = Nfa::builder()
        .with_states(0..size)
        .with_alphabet(alphabet.universe().copied())
        .with_initial(0)
        .with_finals((0..size).filter(|_| fastrand::bool()));

    for source in 0..size {
        for &symbol in alphabet.universe() {
            let targets = (0..size).filter(|_| fastrand::f64() < density);
            builder = builder.with_transition(source, symbol, targets.collect::<Vec<_>>());
        }
        let targets = (0..size).filter(|_| fastrand::f64() < epsilon_density);
        builder = builder.with_epsilon(source, targets.collect::<Vec<_>>());
    }

    debug!("generated random NFA with {size} states over {symbols} symbols");
    match builder.build() {
        Ok(nfa) => nfa,
        Err(err) => unreachable!("random NFA only refers to declared states: {err}"),
    }
}

/// Generate a random word over the universe of the `alphabet`, its length is drawn uniformly
/// from the range `min_len..=max_len`.
pub fn generate_random_word<S: Symbol>(
    alphabet: &Alphabet<S>,
    min_len: usize,
    max_len: usize,
) -> Vec<S> {
    if alphabet.is_empty() {
        return vec![];
    }
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .filter_map(|_| alphabet.nth(fastrand::usize(..alphabet.size())).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_nfa_has_requested_shape() {
        let nfa = generate_random_nfa(6, 3, 0.2, 0.1);
        assert_eq!(nfa.size(), 6);
        assert_eq!(nfa.alphabet().size(), 3);
        assert_eq!(nfa.initial_states().iter().count(), 1);
    }

    #[test]
    fn random_words() {
        let alphabet = Alphabet::of_size(2);
        for _ in 0..20 {
            let word = generate_random_word(&alphabet, 1, 10);
            assert!((1..=10).contains(&word.len()));
            assert!(word.iter().all(|sym| alphabet.contains(sym)));
        }
        assert!(generate_random_word(&Alphabet::<char>::default(), 3, 5).is_empty());
    }

    #[test_log::test]
    fn determinization_preserves_language() {
        for _ in 0..50 {
            let nfa = generate_random_nfa(fastrand::usize(1..7), 2, 0.25, 0.1);
            let dfa = nfa.determinize();
            for _ in 0..40 {
                let word = generate_random_word(nfa.alphabet(), 0, 8);
                assert_eq!(
                    nfa.accepts(word.iter().copied()),
                    dfa.accepts(word.iter().copied()),
                    "disagreement on {word:?} for\n{nfa:?}"
                );
            }
        }
    }

    #[test]
    fn result_does_not_depend_on_worklist() {
        for _ in 0..50 {
            let nfa = generate_random_nfa(fastrand::usize(1..8), 3, 0.3, 0.15);
            let stack = nfa.subset_construction_with(Worklist::Stack);
            let queue = nfa.subset_construction_with(Worklist::Queue);
            assert_eq!(stack.start(), queue.start());
            assert_eq!(stack.table(), queue.table());
        }
    }

    #[test]
    fn subset_construction_properties() {
        for _ in 0..50 {
            let nfa = generate_random_nfa(fastrand::usize(1..8), 2, 0.3, 0.2);
            let sc = nfa.subset_construction();

            for set in sc.states() {
                // every discovered set is epsilon closed
                assert_eq!(&nfa.closure_of_set(set.iter()), set);
                for symbol in nfa.alphabet().universe() {
                    let target = sc.successor(set, symbol).expect("table must be total");
                    assert!(sc.contains(target));
                }
            }

            let dfa = crate::dfa::materialize(&nfa, &sc);
            for (set, subset) in sc.states().zip(dfa.states()) {
                assert_eq!(set.intersects(nfa.final_states()), dfa.is_final(subset));
            }
        }
    }
}
