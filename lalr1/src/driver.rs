use crate::automaton::{Action, Automaton};
use crate::error::Error;
use crate::grammar::Grammar;
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted,
    Rejected { state: usize, lookahead: String },
}

/// One row of the driver's stepwise trace (§4.10): the stacks and remaining
/// input as they stood before the action was taken.
#[derive(Debug, Clone)]
pub struct TraceRow {
    pub step: usize,
    pub state_stack: Vec<usize>,
    pub symbol_stack: Vec<String>,
    pub remaining_input: String,
    pub action: String,
}

/// Drives the stack-based LR(1) recognition loop over a fixed token
/// sequence. Halts at the first failure; no error recovery is attempted.
pub struct Driver<'g> {
    grammar: &'g Grammar,
    automaton: &'g Automaton,
}

impl<'g> Driver<'g> {
    pub fn new(grammar: &'g Grammar, automaton: &'g Automaton) -> Self {
        Self { grammar, automaton }
    }

    /// `token_lexemes` pairs each input token's lexeme with its source line,
    /// matching the language-neutral `TokenInfo` shape: `(class, lexeme,
    /// line)` callers narrow to `(lexeme, line)` since only the lexeme is
    /// compared against terminal names.
    pub fn parse(
        &self,
        token_lexemes: &[(String, usize)],
    ) -> Result<(ParseOutcome, Vec<TraceRow>), Error> {
        for (lexeme, line) in token_lexemes {
            let symbol = Symbol::terminal(lexeme.as_str());
            if !self.grammar.terminals.contains(&symbol) {
                return Err(Error::Grammar(format!(
                    "line {}: '{}' does not match any declared terminal",
                    line, lexeme
                )));
            }
        }

        let mut input: Vec<Symbol> = token_lexemes
            .iter()
            .map(|(lexeme, _)| Symbol::terminal(lexeme.as_str()))
            .collect();
        input.push(Symbol::end_marker());

        let mut state_stack: Vec<usize> = vec![0];
        let mut symbol_stack: Vec<Symbol> = Vec::new();
        let mut trace = Vec::new();
        let mut cursor = 0usize;
        let mut step = 1usize;

        loop {
            let current_state = *state_stack.last().expect("state stack is never empty");
            let lookahead = &input[cursor];
            let directive = self
                .automaton
                .action
                .get(&(current_state, lookahead.clone()))
                .copied();

            match directive {
                Some(Action::Shift(next_state)) => {
                    state_stack.push(next_state);
                    symbol_stack.push(lookahead.clone());
                    trace.push(self.row(
                        step,
                        &state_stack,
                        &symbol_stack,
                        &input[cursor + 1..],
                        format!("shift {}", next_state),
                    ));
                    cursor += 1;
                    step += 1;
                }
                Some(Action::Reduce(production_index)) => {
                    let production = self.grammar.production(production_index);
                    let body_len = production.body().len();
                    state_stack.truncate(state_stack.len() - body_len);
                    symbol_stack.truncate(symbol_stack.len() - body_len);
                    let top = *state_stack.last().expect("state stack is never empty");
                    let goto_key = (top, production.lhs.clone());
                    let next_state = *self.automaton.goto_table.get(&goto_key).ok_or_else(|| {
                        Error::Grammar(format!(
                            "no GOTO entry for state {} on {}",
                            top, production.lhs
                        ))
                    })?;
                    symbol_stack.push(production.lhs.clone());
                    state_stack.push(next_state);
                    trace.push(self.row(
                        step,
                        &state_stack,
                        &symbol_stack,
                        &input[cursor..],
                        format!("reduce {} ({})", production_index, production),
                    ));
                    step += 1;
                }
                Some(Action::Accept) => {
                    trace.push(self.row(
                        step,
                        &state_stack,
                        &symbol_stack,
                        &input[cursor..],
                        "accept".to_string(),
                    ));
                    return Ok((ParseOutcome::Accepted, trace));
                }
                None => {
                    return Ok((
                        ParseOutcome::Rejected {
                            state: current_state,
                            lookahead: lookahead.to_string(),
                        },
                        trace,
                    ));
                }
            }
        }
    }

    fn row(
        &self,
        step: usize,
        state_stack: &[usize],
        symbol_stack: &[Symbol],
        remaining: &[Symbol],
        action: String,
    ) -> TraceRow {
        TraceRow {
            step,
            state_stack: state_stack.to_vec(),
            symbol_stack: symbol_stack.iter().map(|s| s.to_string()).collect(),
            remaining_input: remaining
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Automaton;
    use crate::grammar::Grammar;
    use crate::sets::compute_first;

    fn expr_grammar() -> Grammar {
        Grammar::parse(
            "E -> E + T\nE -> T\nT -> T * F\nT -> F\nF -> ( E )\nF -> id\n",
        )
        .unwrap()
    }

    #[test]
    fn accepts_id_plus_id_times_id_with_expected_reductions() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let driver = Driver::new(&grammar, &automaton);

        let tokens: Vec<(String, usize)> = ["id", "+", "id", "*", "id"]
            .iter()
            .map(|s| (s.to_string(), 1))
            .collect();
        let (outcome, trace) = driver.parse(&tokens).unwrap();
        assert_eq!(outcome, ParseOutcome::Accepted);

        let reductions: Vec<&str> = trace
            .iter()
            .filter(|row| row.action.starts_with("reduce"))
            .map(|row| row.action.as_str())
            .collect();
        assert_eq!(
            reductions,
            vec![
                "reduce 6 (F -> id)",
                "reduce 4 (T -> F)",
                "reduce 2 (E -> T)",
                "reduce 6 (F -> id)",
                "reduce 4 (T -> F)",
                "reduce 6 (F -> id)",
                "reduce 3 (T -> T * F)",
                "reduce 1 (E -> E + T)",
            ]
        );
    }

    #[test]
    fn rejects_id_plus_end_of_input() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let driver = Driver::new(&grammar, &automaton);

        let tokens = vec![("id".to_string(), 1), ("+".to_string(), 1)];
        let (outcome, _trace) = driver.parse(&tokens).unwrap();
        match outcome {
            ParseOutcome::Rejected { lookahead, .. } => assert_eq!(lookahead, "#"),
            ParseOutcome::Accepted => panic!("expected rejection"),
        }
    }

    #[test]
    fn unknown_terminal_is_rejected_before_parsing_starts() {
        let grammar = expr_grammar();
        let first = compute_first(&grammar);
        let automaton = Automaton::build(&grammar, &first);
        let driver = Driver::new(&grammar, &automaton);

        let tokens = vec![("id".to_string(), 1), ("?".to_string(), 1)];
        assert!(driver.parse(&tokens).is_err());
    }
}
