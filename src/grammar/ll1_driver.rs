use super::{
    analysis::AnalysisResult,
    error::{GrammarError, ParseError},
    grammar::{production_to_string, Production, Symbol},
    ll1_parsing_table::LL1ParsingTable,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Match(Symbol),
    Expand { left: String, production: Production },
    Accept,
    Reject(ParseError),
}

impl Action {
    pub fn to_plaintext(&self) -> String {
        match self {
            Action::Match(s) => format!("match {}", s),
            Action::Expand { left, production } => {
                format!("{} -> {}", left, production_to_string(production))
            }
            Action::Accept => "accept".to_string(),
            Action::Reject(e) => format!("error: {}", e),
        }
    }
}

/// One row of the trace. `stack` is bottom-first; both snapshots are taken
/// before `action` is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub stack: Vec<Symbol>,
    pub input: Vec<Symbol>,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub trace: Vec<TraceStep>,
    pub verdict: Verdict,
}

impl ParseReport {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// Splits an input string into terminal tokens: one per character, or one per
/// whitespace-separated word for multi-character terminals.
pub fn tokenize(input: &str, split_whitespace: bool) -> Vec<String> {
    if split_whitespace {
        input.split_whitespace().map(|s| s.to_string()).collect()
    } else {
        input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_string())
            .collect()
    }
}

/// Table-driven pushdown automaton for a single parse request.
pub struct ParseDriver<'a> {
    table: &'a LL1ParsingTable,
    stack: Vec<Symbol>,
    input: Vec<Symbol>,
    cursor: usize,
}

impl<'a> ParseDriver<'a> {
    /// Refuses tables with conflicting cells, since the choice there would be arbitrary.
    pub fn new<I, S>(analysis: &'a AnalysisResult, tokens: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        analysis.ensure_ll1()?;

        let mut input: Vec<Symbol> = tokens
            .into_iter()
            .map(|t| Symbol::Terminal(t.into()))
            .collect();
        input.push(Symbol::EndMarker);

        Ok(Self {
            table: analysis.table(),
            stack: vec![
                Symbol::EndMarker,
                Symbol::non_terminal(analysis.start_symbol()),
            ],
            input,
            cursor: 0,
        })
    }

    fn snapshot(&self, action: Action) -> TraceStep {
        TraceStep {
            stack: self.stack.clone(),
            input: self.input[self.cursor.min(self.input.len())..].to_vec(),
            action,
        }
    }

    pub fn run(mut self) -> ParseReport {
        let table = self.table;
        let mut trace = Vec::new();
        let verdict = loop {
            let Some(top) = self.stack.last().cloned() else {
                let e = ParseError::StackExhausted;
                trace.push(self.snapshot(Action::Reject(e.clone())));
                break Verdict::Rejected(e);
            };
            let lookahead = self
                .input
                .get(self.cursor)
                .cloned()
                .unwrap_or(Symbol::EndMarker);

            match top {
                Symbol::EndMarker if lookahead == Symbol::EndMarker => {
                    trace.push(self.snapshot(Action::Accept));
                    break Verdict::Accepted;
                }
                Symbol::Terminal(_) | Symbol::EndMarker => {
                    if top == lookahead {
                        trace.push(self.snapshot(Action::Match(top)));
                        self.stack.pop();
                        self.cursor += 1;
                    } else {
                        let e = ParseError::Mismatch {
                            expected: top,
                            found: lookahead,
                        };
                        trace.push(self.snapshot(Action::Reject(e.clone())));
                        break Verdict::Rejected(e);
                    }
                }
                Symbol::NonTerminal(left) => match table.get(&left, &lookahead) {
                    Some(production) => {
                        trace.push(self.snapshot(Action::Expand {
                            left,
                            production: production.clone(),
                        }));
                        self.stack.pop();
                        self.stack.extend(
                            production
                                .iter()
                                .rev()
                                .filter(|s| **s != Symbol::Epsilon)
                                .cloned(),
                        );
                    }
                    None => {
                        let e = ParseError::NoRule {
                            non_terminal: left,
                            lookahead,
                        };
                        trace.push(self.snapshot(Action::Reject(e.clone())));
                        break Verdict::Rejected(e);
                    }
                },
                // never pushed; treated like a broken stack rather than skipped
                Symbol::Epsilon => {
                    let e = ParseError::StackExhausted;
                    trace.push(self.snapshot(Action::Reject(e.clone())));
                    break Verdict::Rejected(e);
                }
            }
        };

        ParseReport { trace, verdict }
    }
}
