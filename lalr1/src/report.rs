use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::automaton::Automaton;
use crate::driver::TraceRow;
use crate::grammar::Grammar;
use crate::item::format_item;
use crate::sets::SymbolSets;
use crate::symbol::Symbol;

fn section(dest: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(dest, "{}", title)?;
    writeln!(dest, "{}", "-".repeat(title.len()))
}

/// Prints the `Grammar Productions` section: index followed by production.
pub fn write_productions(dest: &mut impl Write, grammar: &Grammar) -> io::Result<()> {
    section(dest, "Grammar Productions")?;
    for production in &grammar.productions {
        writeln!(dest, "{}: {}", production.index, production)?;
    }
    writeln!(dest)
}

fn write_symbol_sets(dest: &mut impl Write, title: &str, sets: &SymbolSets) -> io::Result<()> {
    section(dest, title)?;
    let mut symbols: Vec<&Symbol> = sets.keys().collect();
    symbols.sort();
    for symbol in symbols {
        let set = &sets[symbol];
        let rendered: Vec<String> = set.iter().map(|s| s.to_string()).collect();
        writeln!(dest, "{}: {{{}}}", symbol, rendered.join(", "))?;
    }
    writeln!(dest)
}

pub fn write_first_sets(dest: &mut impl Write, first: &SymbolSets) -> io::Result<()> {
    write_symbol_sets(dest, "First Sets", first)
}

pub fn write_follow_sets(dest: &mut impl Write, follow: &SymbolSets) -> io::Result<()> {
    write_symbol_sets(dest, "Follow Sets", follow)
}

/// Prints the `LR(1) Item Sets` section: state id followed by indented item
/// lines, in a stable order determined by the items' own `Ord`.
pub fn write_item_sets(dest: &mut impl Write, grammar: &Grammar, automaton: &Automaton) -> io::Result<()> {
    section(dest, "LR(1) Item Sets")?;
    for (id, state) in automaton.states.iter().enumerate() {
        writeln!(dest, "State {}:", id)?;
        let mut items: Vec<_> = state.iter().collect();
        items.sort();
        for item in items {
            let production = grammar.production(item.production);
            writeln!(dest, "    {}", format_item(item, production))?;
        }
    }
    writeln!(dest)
}

/// Prints the ACTION/GOTO table, one row per state, terminals then
/// nonterminals.
pub fn write_tables(dest: &mut impl Write, grammar: &Grammar, automaton: &Automaton) -> io::Result<()> {
    section(dest, "ACTION/GOTO Table")?;
    let mut terminals: BTreeSet<&Symbol> = grammar.terminals.iter().collect();
    let end_marker = Symbol::end_marker();
    terminals.insert(&end_marker);

    for state in 0..automaton.states.len() {
        writeln!(dest, "State {}:", state)?;
        for terminal in &terminals {
            if let Some(action) = automaton.action.get(&(state, (*terminal).clone())) {
                writeln!(dest, "    action[{}] = {}", terminal, action)?;
            }
        }
        for non_terminal in &grammar.non_terminals {
            if let Some(&target) = automaton.goto_table.get(&(state, non_terminal.clone())) {
                writeln!(dest, "    goto[{}] = {}", non_terminal, target)?;
            }
        }
    }
    if !automaton.conflicts.is_empty() {
        writeln!(dest)?;
        writeln!(dest, "Conflicts:")?;
        for conflict in &automaton.conflicts {
            writeln!(dest, "    {}", conflict)?;
        }
    }
    writeln!(dest)
}

/// Prints the driver's step trace: step number, stacks, remaining input,
/// and the action taken.
pub fn write_trace(dest: &mut impl Write, trace: &[TraceRow]) -> io::Result<()> {
    section(dest, "Parse Trace")?;
    for row in trace {
        let states: Vec<String> = row.state_stack.iter().map(|s| s.to_string()).collect();
        writeln!(
            dest,
            "{:>4}  states=[{}]  symbols=[{}]  remaining=\"{}\"  action={}",
            row.step,
            states.join(" "),
            row.symbol_stack.join(" "),
            row.remaining_input,
            row.action
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::grammar::Grammar;
    use crate::sets::compute_first;

    #[test]
    fn writes_non_empty_productions_section() {
        let grammar = Grammar::parse("S -> a\n").unwrap();
        let mut buffer = Vec::new();
        write_productions(&mut buffer, &grammar).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Grammar Productions"));
        assert!(text.contains("0: S' -> S"));
        assert!(text.contains("1: S -> a"));
    }

    #[test]
    fn writes_item_sets_and_tables_without_panicking() {
        let grammar = Grammar::parse("S -> a\n").unwrap();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let mut buffer = Vec::new();
        write_item_sets(&mut buffer, &grammar, &automaton).unwrap();
        write_tables(&mut buffer, &grammar, &automaton).unwrap();
        assert!(!buffer.is_empty());
    }
}
