// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use clap::crate_authors;
use structopt::StructOpt;

use std::{fs, path::PathBuf, process};

use lalr1::{compute_first, compute_follow, report, Automaton, Driver, Grammar, ParseOutcome};
use lexan::{load_rules, RegexScanner, Scanner, TokenClass};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "toycc-parse",
    about = "Lex then parse a source file against a grammar, printing the LR(1) trace",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Path to the grammar file.
    #[structopt(short, long, parse(from_os_str), default_value = "demos/grammar.txt")]
    grammar: PathBuf,
    /// Path to the token-rule file (used only to recover the keyword list).
    #[structopt(short, long, parse(from_os_str), default_value = "demos/rules.txt")]
    rules: PathBuf,
    /// Path to the source file to lex and parse.
    #[structopt(parse(from_os_str), default_value = "demos/source_parse.txt")]
    source: PathBuf,
    /// Dump productions/First/Follow/item-sets to this file.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

fn main() {
    let cl_options = CLOptions::from_args();

    let rules = match load_rules(&cl_options.rules) {
        Ok(rules) => rules,
        Err(error) => {
            eprintln!("{}: {}", cl_options.rules.display(), error);
            process::exit(1);
        }
    };
    let keywords: Vec<&str> = rules
        .iter()
        .filter(|r| r.class == TokenClass::Keyword)
        .map(|r| r.pattern.as_str())
        .collect();
    let scanner = match RegexScanner::new(&keywords) {
        Ok(scanner) => scanner,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    };

    let source = match fs::read_to_string(&cl_options.source) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("{}: {}", cl_options.source.display(), error);
            process::exit(1);
        }
    };
    let (tokens, diagnostics) = scanner.tokenize(&source);
    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }
    let token_lexemes: Vec<(String, usize)> = tokens
        .iter()
        .map(|t| (t.lexeme().to_string(), t.line()))
        .collect();

    let grammar = match Grammar::load(&cl_options.grammar) {
        Ok(grammar) => grammar,
        Err(error) => {
            eprintln!("{}: {}", cl_options.grammar.display(), error);
            process::exit(1);
        }
    };

    let first = compute_first(&grammar);
    let follow = compute_follow(&grammar, &first);
    let automaton = Automaton::build(&grammar, &first);
    for conflict in &automaton.conflicts {
        eprintln!("{}", conflict);
    }

    let driver = Driver::new(&grammar, &automaton);
    let (outcome, trace) = match driver.parse(&token_lexemes) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    report::write_trace(&mut handle, &trace).expect("stdout write failed");

    if let Some(output_path) = &cl_options.output {
        let mut file = match fs::File::create(output_path) {
            Ok(file) => file,
            Err(error) => {
                eprintln!("{}: {}", output_path.display(), error);
                process::exit(1);
            }
        };
        report::write_productions(&mut file, &grammar).expect("output write failed");
        report::write_first_sets(&mut file, &first).expect("output write failed");
        report::write_follow_sets(&mut file, &follow).expect("output write failed");
        report::write_item_sets(&mut file, &grammar, &automaton).expect("output write failed");
    }

    match outcome {
        ParseOutcome::Accepted => {
            println!("accepted");
            process::exit(0);
        }
        ParseOutcome::Rejected { state, lookahead } => {
            eprintln!(
                "rejected: no action in state {} on lookahead '{}'",
                state, lookahead
            );
            process::exit(1);
        }
    }
}
