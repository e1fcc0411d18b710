use std::fmt::Display;

use itertools::Itertools;
use owo_colors::OwoColorize;

use crate::{math::OrderedMap, prelude::*};

/// Attributes that can be attached to a node or an edge of a graphviz document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DotAttribute {
    /// The text shown for the node or edge.
    Label(String),
    /// The shape of a node.
    Shape(String),
}

impl Display for DotAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DotAttribute::Label(label) => write!(f, "label=\"{}\"", escape_dot(label)),
            DotAttribute::Shape(shape) => write!(f, "shape={shape}"),
        }
    }
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<Q: StateName, S: Symbol> Dfa<Q, S> {
    /// Renders a state as the set of names it consists of, e.g. `{A, B}`, or `∅` for the
    /// dead state.
    pub fn show_state(&self, state: &Subset<Q>) -> String {
        Q::show_collection(state)
    }

    /// Builds a table with one row per state (in discovery order) and one column per symbol.
    /// The start state is marked with `→` and final states with `*`. If `colored` is set,
    /// final states are highlighted using ANSI escape codes.
    pub fn transition_table(&self, colored: bool) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(
            std::iter::once("State".to_string())
                .chain(self.alphabet().universe().map(|sym| sym.show())),
        );
        for (id, state) in self.states().enumerate() {
            let marker = match (id == 0, self.is_final(state)) {
                (true, true) => "→*",
                (true, false) => "→",
                (false, true) => "*",
                (false, false) => "",
            };
            let mut label = format!("{marker}{}", self.show_state(state));
            if colored && self.is_final(state) {
                label = label.green().bold().to_string();
            }
            let row = std::iter::once(label).chain(self.alphabet().universe().map(|sym| {
                self.successor(state, sym)
                    .map(|target| self.show_state(target))
                    .unwrap_or_else(|| "-".to_string())
            }));
            builder.push_record(row);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }

    /// Compute the graphviz representation, for more information on the DOT format,
    /// see the [graphviz documentation](https://graphviz.org/doc/info/lang.html).
    /// Nodes are named `q0, q1, ...` in discovery order and labelled with the set of names
    /// they consist of, edges between the same pair of states are merged.
    pub fn dot_representation(&self) -> String {
        let header = [
            "digraph DFA {".to_string(),
            "rankdir=LR".to_string(),
            "init [shape=point, label=\"\"]".to_string(),
            "init -> q0".to_string(),
        ];

        let states = self.states().enumerate().map(|(id, state)| {
            let shape = if self.is_final(state) {
                "doublecircle"
            } else {
                "circle"
            };
            let attributes = [
                DotAttribute::Shape(shape.into()),
                DotAttribute::Label(self.show_state(state)),
            ];
            format!("q{id} [{}]", attributes.iter().join(", "))
        });

        let mut grouped: OrderedMap<(usize, usize), Vec<String>> = OrderedMap::new();
        for (id, state) in self.states().enumerate() {
            for symbol in self.alphabet().universe() {
                if let Some(target) = self.successor(state, symbol).and_then(|t| self.id_of(t)) {
                    grouped.entry((id, target)).or_default().push(symbol.show());
                }
            }
        }
        let transitions = grouped.into_iter().map(|((source, target), symbols)| {
            format!(
                "q{source} -> q{target} [{}]",
                DotAttribute::Label(symbols.join(", "))
            )
        });

        header
            .into_iter()
            .chain(states)
            .chain(transitions)
            .chain(std::iter::once("}".to_string()))
            .join("\n")
    }

    /// Renders the automaton to a PNG file with the given filename by handing the
    /// [`Self::dot_representation`] to the `dot` executable. This method is only available
    /// on the `graphviz` crate feature and makes use of temporary files.
    #[cfg(feature = "graphviz")]
    pub fn render_to_file_name(&self, filename: &str) -> Result<(), std::io::Error> {
        use std::io::Write;
        use tracing::trace;

        trace!("Outputting dot and rendering to png");
        let dot = self.dot_representation();
        let mut tempfile = tempfile::NamedTempFile::new()?;

        tempfile.write_all(dot.as_bytes())?;
        let tempfile_name = tempfile.path();

        let output = std::process::Command::new("dot")
            .arg("-Tpng")
            .arg("-o")
            .arg(filename)
            .arg(tempfile_name)
            .stderr(std::process::Stdio::piped())
            .output()?;
        if output.status.success() {
            return Ok(());
        }
        Err(std::io::Error::other(format!(
            "dot exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

/// Prints the description of the automaton: its alphabet, start state, final states and
/// every transition in the form `δ({A}, '0') → {A, B}`.
impl<Q: StateName, S: Symbol> Display for Dfa<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "----- DFA Description -----")?;
        writeln!(f, "Alphabet: {}", self.alphabet().show())?;
        writeln!(f, "Start State: {}", self.show_state(self.start()))?;
        writeln!(f, "Final States:")?;
        for state in self.final_states() {
            writeln!(f, "  {}", self.show_state(state))?;
        }
        writeln!(f)?;
        writeln!(f, "Transitions:")?;
        for Transition {
            source,
            symbol,
            target,
        } in self.transitions()
        {
            writeln!(
                f,
                "  δ({}, '{}') → {}",
                self.show_state(source),
                symbol.show(),
                self.show_state(target)
            )?;
        }
        Ok(())
    }
}

impl<Q: StateName, S: Symbol> std::fmt::Debug for Dfa<Q, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.transition_table(false))
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn description() {
        let dfa = crate::tests::ends_in_01().determinize();
        let text = dfa.to_string();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "----- DFA Description -----");
        assert_eq!(lines[1], "Alphabet: [0, 1]");
        assert_eq!(lines[2], "Start State: {A}");
        assert_eq!(lines[3], "Final States:");
        assert_eq!(lines[4], "  {C}");
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Transitions:");
        // start state is discovered first and its transitions come first
        assert_eq!(lines[7], "  δ({A}, '0') → {A, B}");
        assert_eq!(lines[8], "  δ({A}, '1') → ∅");
        assert!(lines.contains(&"  δ({A, B}, '1') → {C}"));
        assert!(lines.contains(&"  δ(∅, '0') → ∅"));
        assert_eq!(lines.len(), 7 + 8);
    }

    #[test]
    fn table() {
        let dfa = crate::tests::ends_in_01().determinize();
        let table = dfa.transition_table(false);
        assert!(table.contains("State"));
        assert!(table.contains("→{A}"));
        assert!(table.contains("*{C}"));
        assert_eq!(table.lines().count(), 2 + 1 + dfa.size() + 1);

        let colored = dfa.transition_table(true);
        assert!(colored.contains("\u{1b}["));
    }

    #[test]
    fn dot() {
        let dfa = crate::tests::ends_in_01().determinize();
        let dot = dfa.dot_representation();
        assert!(dot.starts_with("digraph DFA {"));
        assert!(dot.ends_with('}'));
        assert!(dot.contains("q0 [shape=circle, label=\"{A}\"]"));
        assert!(dot.contains("shape=doublecircle, label=\"{C}\""));
        assert!(dot.contains("q0 -> q1 [label=\"0\"]"));
        // both symbols lead from {C} to the dead state, they share one edge
        assert!(dot.contains("[label=\"0, 1\"]"));
    }
}
