use std::{io::Read, process::ExitCode};

use nfa2dfa::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("nfa2dfa")
        .about("Converts nondeterministic finite automata into deterministic ones")
        .subcommand_required(true)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
        .subcommand(
            Command::new("convert")
                .about("reads an NFA description from FILE (or stdin) and prints the equivalent DFA")
                .arg(Arg::new("file").value_name("FILE"))
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .value_parser(["text", "table", "dot"])
                        .default_value("text"),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .value_parser(["stack", "queue"])
                        .default_value("stack"),
                )
                .arg(
                    Arg::new("color")
                        .long("color")
                        .action(ArgAction::SetTrue)
                        .help("highlight final states in the table output"),
                )
                .arg(
                    Arg::new("render")
                        .long("render")
                        .value_name("PNG")
                        .help("additionally render the DFA with graphviz"),
                ),
        )
        .subcommand(
            Command::new("template")
                .about("prints one `state,symbol→` line for every state and symbol")
                .arg(Arg::new("states").long("states").required(true))
                .arg(Arg::new("alphabet").long("alphabet").default_value("")),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn read_input(path: Option<&String>) -> std::io::Result<String> {
    let mut input = String::new();
    match path {
        Some(path) => {
            debug!("reading NFA from {path}");
            input = std::fs::read_to_string(path)?;
        }
        None => {
            debug!("reading NFA from stdin");
            std::io::stdin().lock().read_to_string(&mut input)?;
        }
    }
    Ok(input)
}

fn convert(matches: &ArgMatches) -> ExitCode {
    let input = match read_input(matches.get_one::<String>("file")) {
        Ok(input) => input,
        Err(err) => {
            error!("could not read input: {err}");
            return ExitCode::FAILURE;
        }
    };
    let nfa: Nfa = match input.parse() {
        Ok(nfa) => nfa,
        Err(err) => {
            error!("invalid NFA description: {err}");
            return ExitCode::FAILURE;
        }
    };

    let order = match matches.get_one::<String>("order").map(String::as_str) {
        Some("queue") => Worklist::Queue,
        _ => Worklist::Stack,
    };
    let start = std::time::Instant::now();
    let dfa = nfa.determinize_with(order);
    info!(
        "conversion into a DFA with {} states took {}µs",
        dfa.size(),
        start.elapsed().as_micros()
    );

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("table") => println!("{}", dfa.transition_table(matches.get_flag("color"))),
        Some("dot") => println!("{}", dfa.dot_representation()),
        _ => print!("{dfa}"),
    }

    if let Some(target) = matches.get_one::<String>("render") {
        if let Err(err) = render(&dfa, target) {
            error!("could not render DFA to {target}: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

#[cfg(feature = "graphviz")]
fn render(dfa: &Dfa, target: &str) -> std::io::Result<()> {
    dfa.render_to_file_name(target)
}

#[cfg(not(feature = "graphviz"))]
fn render(_dfa: &Dfa, _target: &str) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "rendering requires the `graphviz` feature",
    ))
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => convert(sub_matches),
        Some(("template", sub_matches)) => {
            let states = sub_matches
                .get_one::<String>("states")
                .map(String::as_str)
                .unwrap_or_default();
            let alphabet = sub_matches
                .get_one::<String>("alphabet")
                .map(String::as_str)
                .unwrap_or_default();
            match transition_template(states, alphabet) {
                Ok(template) => {
                    println!("{template}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    error!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::cli;

    #[test]
    fn cli_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn parses_convert_arguments() {
        let matches = cli()
            .try_get_matches_from(["nfa2dfa", "-v=debug", "convert", "in.nfa", "--format", "dot"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "convert");
        assert_eq!(sub.get_one::<String>("file").unwrap(), "in.nfa");
        assert_eq!(sub.get_one::<String>("format").unwrap(), "dot");
        assert_eq!(sub.get_one::<String>("order").unwrap(), "stack");
        assert!(!sub.get_flag("color"));
    }
}
