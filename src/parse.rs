use std::str::FromStr;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    error::{Location, ValidationError, ValidationErrorKind as Kind},
    prelude::*,
};

/// Arrows that separate the left and right hand side of a transition line.
const ARROWS: [&str; 2] = ["→", "->"];

/// Directives that hold a comma separated field, in the order of their slots.
const DIRECTIVES: [&str; 4] = ["states", "alphabet", "start", "finals"];

/// A transition as written on a single line, `source,symbol→target,target`.
pub type TransitionLine = (String, Label<String>, Vec<String>);

/// Splits a comma separated field into its trimmed, non-empty entries.
pub fn parse_list(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/// Parses a line of the form `source,symbol→target1,target2`, where `->` may be used instead
/// of `→` and the symbol `λ` stands for epsilon. Lines that contain no arrow at all are not
/// transitions and give `Ok(None)`. The list of targets may be empty.
pub fn parse_transition(line: &str) -> Result<Option<TransitionLine>, Kind> {
    let Some(arrow) = ARROWS.into_iter().find(|arrow| line.contains(arrow)) else {
        return Ok(None);
    };
    let malformed = || Kind::MalformedTransition(line.trim().to_string());

    let Some((left, right)) = line.split(arrow).collect_tuple() else {
        return Err(malformed());
    };
    let Some((source, symbol)) = left.split(',').map(str::trim).collect_tuple() else {
        return Err(malformed());
    };
    if source.is_empty() || symbol.is_empty() {
        return Err(malformed());
    }

    let label = if symbol == EPSILON {
        Label::Epsilon
    } else {
        Label::Sym(symbol.to_string())
    };
    Ok(Some((source.to_string(), label, parse_list(right))))
}

/// Generates one line `state,symbol→` for every pair of declared state and symbol, which can
/// then be completed with the destinations. States and symbols are sorted and deduplicated
/// and `λ` is always offered as a symbol.
///
/// ```
/// use nfa2dfa::prelude::*;
///
/// let template = transition_template("B, A", "0").unwrap();
/// assert_eq!(template, "A,0→\nA,λ→\nB,0→\nB,λ→");
/// ```
pub fn transition_template(states: &str, alphabet: &str) -> Result<String, ValidationError> {
    let states = parse_list(states).into_iter().unique().sorted().collect_vec();
    if states.is_empty() {
        return Err(ValidationError::new(Location::States, Kind::NoStates));
    }
    let mut alphabet = parse_list(alphabet).into_iter().unique().sorted().collect_vec();
    if !alphabet.iter().any(|sym| sym == EPSILON) {
        alphabet.push(EPSILON.to_string());
    }

    Ok(states
        .iter()
        .cartesian_product(alphabet.iter())
        .map(|(state, symbol)| format!("{state},{symbol}{}", ARROWS[0]))
        .join("\n"))
}

/// The five fields of the conversion form: comma separated states, alphabet and final
/// states, a single start state and the transitions, one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    /// Comma separated list of states.
    pub states: String,
    /// Comma separated list of symbols.
    pub alphabet: String,
    /// The start state.
    pub start: String,
    /// Comma separated list of final states.
    pub finals: String,
    /// Transitions, one per line. Lines without an arrow are ignored.
    pub transitions: String,
}

impl FormInput {
    /// Validates the form and turns it into an [`Nfa`]. Errors in a transition point at
    /// its line within the transitions field (counting from one), all other errors point at
    /// the offending field.
    pub fn to_nfa(&self) -> Result<Nfa, ValidationError> {
        let mut transitions = vec![];
        for (n, line) in self.transitions.lines().enumerate() {
            if let Some(transition) = parse_transition(line)
                .map_err(|kind| ValidationError::new(Location::Line(n + 1), kind))?
            {
                transitions.push((n + 1, transition));
            }
        }
        assemble(
            parse_list(&self.states),
            parse_list(&self.alphabet),
            self.start.trim(),
            parse_list(&self.finals),
            transitions,
        )
    }

    /// Generates the transition template for the declared states and alphabet, see
    /// [`transition_template`].
    pub fn transition_template(&self) -> Result<String, ValidationError> {
        transition_template(&self.states, &self.alphabet)
    }
}

/// Feeds the parsed pieces into an [`NfaBuilder`], translating the position of a rejected
/// transition into the line it was read from. A later line for the same state and symbol
/// replaces the earlier ones.
fn assemble(
    states: Vec<String>,
    alphabet: Vec<String>,
    start: &str,
    finals: Vec<String>,
    transitions: Vec<(usize, TransitionLine)>,
) -> Result<Nfa, ValidationError> {
    let lines = transitions.iter().map(|(line, _)| *line).collect_vec();
    let mut builder = Nfa::builder()
        .replacing_duplicates()
        .with_states(states)
        .with_alphabet(alphabet.into_iter().filter(|sym| sym != EPSILON))
        .with_finals(finals)
        .with_transitions(transitions.into_iter().map(|(_, transition)| transition));
    if !start.is_empty() {
        builder = builder.with_initial(start.to_string());
    }
    builder.build().map_err(|err| match err.location {
        Location::Transition(pos) => err.at(Location::Line(lines[pos])),
        _ => err,
    })
}

/// Reads an automaton from its textual description. The description consists of
/// `name: value` directives for `states`, `alphabet`, `start` and (optionally) `finals`,
/// followed by an optional `transitions:` directive after which every line is a transition.
/// A transition may also follow `transitions:` on the same line. Every directive may appear
/// only once, and a later transition for the same state and symbol replaces earlier ones.
/// Empty lines and lines starting with `#` are ignored.
///
/// ```
/// use nfa2dfa::prelude::*;
///
/// let nfa: Nfa = "states: A, B, C
/// alphabet: 0, 1
/// start: A
/// finals: C
/// transitions:
/// A,0→A,B
/// B,1→C"
///     .parse()
///     .unwrap();
/// assert_eq!(nfa.size(), 3);
/// assert!(nfa.accepts(["0".to_string(), "1".to_string()]));
/// ```
///
/// Errors point at the line of the description that caused them.
/// ```
/// use nfa2dfa::prelude::*;
///
/// let err = "states: A\nalphabet: 0\nstart: A\ntransitions:\nA,0→B"
///     .parse::<Nfa>()
///     .unwrap_err();
/// assert_eq!(err.to_string(), "line 5: destination state `B` is not declared");
/// ```
impl FromStr for Nfa {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields: [Option<(usize, &str)>; 4] = [None; 4];
        let mut transitions = vec![];
        let mut in_transitions = false;

        for (n, line) in s.lines().enumerate().map(|(n, line)| (n + 1, line.trim())) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if in_transitions {
                trace!("parsing transition \"{line}\"");
                if let Some(transition) = parse_transition(line)
                    .map_err(|kind| ValidationError::new(Location::Line(n), kind))?
                {
                    transitions.push((n, transition));
                }
                continue;
            }

            let Some((name, value)) = line.split_once(':') else {
                return Err(ValidationError::new(
                    Location::Line(n),
                    Kind::MalformedDirective(line.to_string()),
                ));
            };
            let name = name.trim();
            if name == "transitions" {
                in_transitions = true;
                let value = value.trim();
                if !value.is_empty() {
                    match parse_transition(value) {
                        Ok(Some(transition)) => transitions.push((n, transition)),
                        Ok(None) => {
                            return Err(ValidationError::new(
                                Location::Line(n),
                                Kind::MalformedTransition(value.to_string()),
                            ))
                        }
                        Err(kind) => return Err(ValidationError::new(Location::Line(n), kind)),
                    }
                }
                continue;
            }
            let Some(slot) = DIRECTIVES.iter().position(|directive| *directive == name) else {
                return Err(ValidationError::new(
                    Location::Line(n),
                    Kind::MalformedDirective(line.to_string()),
                ));
            };
            if fields[slot].is_some() {
                return Err(ValidationError::new(
                    Location::Line(n),
                    Kind::DuplicateDirective(DIRECTIVES[slot]),
                ));
            }
            fields[slot] = Some((n, value));
        }

        let [states, alphabet, start, finals] = fields;
        let (states_line, states) = states.ok_or(ValidationError::new(
            Location::States,
            Kind::MissingDirective("states"),
        ))?;
        let (_, alphabet) = alphabet.ok_or(ValidationError::new(
            Location::Alphabet,
            Kind::MissingDirective("alphabet"),
        ))?;
        let (start_line, start) = start.ok_or(ValidationError::new(
            Location::Start,
            Kind::MissingDirective("start"),
        ))?;
        let finals_line = finals.map(|(line, _)| line);
        let finals = finals.map(|(_, value)| parse_list(value)).unwrap_or_default();

        debug!(
            "read automaton description with {} transitions",
            transitions.len()
        );
        assemble(
            parse_list(states),
            parse_list(alphabet),
            start.trim(),
            finals,
            transitions,
        )
        .map_err(|err| match (err.location, finals_line) {
            (Location::States, _) => err.at(Location::Line(states_line)),
            (Location::Start, _) => err.at(Location::Line(start_line)),
            (Location::Finals, Some(line)) => err.at(Location::Line(line)),
            _ => err,
        })
    }
}
