// Copyright 2022 Peter Williams <pwil3058@gmail.com> <pwil3058@bigpond.net.au>
use clap::crate_authors;
use structopt::StructOpt;

use std::{fs, path::PathBuf, process};

use lexan::{DfaScanner, Scanner};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "toycc-lex",
    about = "Tokenize a source file against a token-rule set and print the tokens",
    author = crate_authors!(),
)]
struct CLOptions {
    /// Path to the token-rule file.
    #[structopt(short, long, parse(from_os_str), default_value = "demos/rules.txt")]
    rules: PathBuf,
    /// Path to the source file to tokenize.
    #[structopt(parse(from_os_str), default_value = "demos/source_lex.txt")]
    source: PathBuf,
}

fn main() {
    let cl_options = CLOptions::from_args();

    let scanner = match DfaScanner::load(&cl_options.rules) {
        Ok(scanner) => scanner,
        Err(error) => {
            eprintln!("{}: {}", cl_options.rules.display(), error);
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
    for token in &tokens {
        println!("{}", token);
    }
    for diagnostic in &diagnostics {
        eprintln!("{}", diagnostic);
    }
}
