use thiserror::Error;

use super::grammar::{production_to_string, Production, Symbol};

/// Errors that make a grammar unusable for table-driven parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no nonterminal, so there is no start symbol")]
    Empty,

    #[error("{head}: nonterminal \"{symbol}\" has no productions")]
    UndefinedNonTerminal { head: String, symbol: String },

    #[error("{head}: \"$\" is reserved for the end of input")]
    ReservedEndMarker { head: String },

    #[error(
        "grammar is not LL(1): table[{non_terminal}][{lookahead}] is claimed by {}",
        join_productions(.non_terminal, .productions)
    )]
    TableConflict {
        non_terminal: String,
        lookahead: Symbol,
        productions: Vec<Production>,
    },
}

fn join_productions(left: &str, productions: &[Production]) -> String {
    productions
        .iter()
        .map(|p| format!("\"{} -> {}\"", left, production_to_string(p)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors from reading the `Head ::= alt | alt` text format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("Line {line}: too many \"::=\"")]
    TooManySeparators { line: usize },

    #[error("Line {line}: empty left side")]
    EmptyHead { line: usize },

    #[error("Line {line}: left side contains whitespace")]
    HeadContainsWhitespace { line: usize },

    #[error("Line {line}: cannot find left side")]
    MissingHead { line: usize },

    #[error("Line {line}: empty alternative, write \"@\" for the empty production")]
    EmptyAlternative { line: usize },

    #[error("Line {line}: \"$\" is reserved for the end of input")]
    ReservedEndMarker { line: usize },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

/// Why the driver rejected an input. Carried by a rejected verdict, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected \"{expected}\" but found \"{found}\"")]
    Mismatch { expected: Symbol, found: Symbol },

    #[error("no rule for {non_terminal} on lookahead \"{lookahead}\"")]
    NoRule {
        non_terminal: String,
        lookahead: Symbol,
    },

    #[error("stack exhausted before the end of input")]
    StackExhausted,
}
