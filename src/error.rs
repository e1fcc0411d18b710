use std::fmt::Display;

use thiserror::Error;

/// Points at the part of an automaton description that violates an invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// The declared states.
    States,
    /// The declared alphabet.
    Alphabet,
    /// The start state.
    Start,
    /// The final states.
    Finals,
    /// The transition with the given (zero based) position in the order it was added to an
    /// [`crate::NfaBuilder`].
    Transition(usize),
    /// A (one based) line of a textual description.
    Line(usize),
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::States => write!(f, "states"),
            Location::Alphabet => write!(f, "alphabet"),
            Location::Start => write!(f, "start state"),
            Location::Finals => write!(f, "final states"),
            Location::Transition(pos) => write!(f, "transition {}", pos + 1),
            Location::Line(line) => write!(f, "line {line}"),
        }
    }
}

/// Describes which invariant of an automaton description was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ValidationErrorKind {
    #[error("no states are declared")]
    NoStates,
    #[error("no start state is given")]
    MissingStart,
    #[error("start state `{0}` must be one of the states")]
    UnknownStart(String),
    #[error("final state `{0}` is not declared")]
    UnknownFinal(String),
    #[error("state `{0}` is not declared")]
    UnknownSource(String),
    #[error("symbol `{0}` is not in the alphabet")]
    UnknownSymbol(String),
    #[error("destination state `{0}` is not declared")]
    UnknownDestination(String),
    #[error("malformed transition `{0}`, expected `state,symbol→state1,state2`")]
    MalformedTransition(String),
    #[error("malformed directive `{0}`, expected `name: value, value`")]
    MalformedDirective(String),
    #[error("missing `{0}` directive")]
    MissingDirective(&'static str),
    #[error("`{0}` directive is given more than once")]
    DuplicateDirective(&'static str),
}

/// Error produced when an automaton description is rejected. Validation stops at the first
/// violation, so there is exactly one location and one reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {kind}")]
pub struct ValidationError {
    /// Where the violation was found.
    pub location: Location,
    /// What was violated.
    pub kind: ValidationErrorKind,
}

impl ValidationError {
    /// Creates a new error at `location`.
    pub fn new(location: Location, kind: ValidationErrorKind) -> Self {
        Self { location, kind }
    }

    /// Replaces the location, keeping the reason.
    pub fn at(self, location: Location) -> Self {
        Self { location, ..self }
    }
}
