use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Serialize, Serializer};

use super::{error::GrammarError, END_MARK, EPSILON};

/// A grammar symbol. Classification happens once, when the grammar is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Terminal(String),
    NonTerminal(String),
    Epsilon,
    EndMarker,
}

impl Symbol {
    pub fn terminal(name: impl Into<String>) -> Self {
        Symbol::Terminal(name.into())
    }

    pub fn non_terminal(name: impl Into<String>) -> Self {
        Symbol::NonTerminal(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name.as_str(),
            Symbol::Epsilon => EPSILON,
            Symbol::EndMarker => END_MARK,
        }
    }

    /// Terminals and the end marker are what the driver can match against input.
    pub fn is_matchable(&self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::EndMarker)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// One right-hand side alternative, e.g. `[a, S]` or `[Epsilon]`.
pub type Production = Vec<Symbol>;

pub fn production_to_string(production: &[Symbol]) -> String {
    production
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct Grammar {
    rules: IndexMap<String, Vec<Production>>,
    terminals: IndexSet<String>,
}

impl Grammar {
    /// Builds a grammar from `head -> productions`. The first key is the start symbol.
    pub fn new(rules: IndexMap<String, Vec<Production>>) -> Result<Self, GrammarError> {
        if rules.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut terminals = IndexSet::new();
        for (head, productions) in &rules {
            for symbol in productions.iter().flatten() {
                match symbol {
                    Symbol::Terminal(name) => {
                        terminals.insert(name.clone());
                    }
                    Symbol::NonTerminal(name) => {
                        if !rules.contains_key(name) {
                            return Err(GrammarError::UndefinedNonTerminal {
                                head: head.clone(),
                                symbol: name.clone(),
                            });
                        }
                    }
                    Symbol::Epsilon => {}
                    Symbol::EndMarker => {
                        return Err(GrammarError::ReservedEndMarker { head: head.clone() })
                    }
                }
            }
        }

        Ok(Self { rules, terminals })
    }

    pub fn start_symbol(&self) -> &str {
        // `new` rejects empty grammars
        self.rules
            .keys()
            .next()
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|s| s.as_str())
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.terminals.iter().map(|s| s.as_str())
    }

    pub fn rule_iter(&self) -> impl Iterator<Item = (&str, &[Production])> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Productions of `non_terminal`, empty if it is not a head.
    pub fn productions(&self, non_terminal: &str) -> &[Production] {
        self.rules
            .get(non_terminal)
            .map(|p| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_non_terminal(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}
