use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::{
    grammar::{Production, Symbol},
    Grammar,
};

/// First sets of every nonterminal and of every production right-hand side.
///
/// A nonterminal's set contains `Epsilon` iff it is nullable. The sets are
/// computed by fixpoint iteration, so left recursion and epsilon cycles
/// terminate instead of recursing forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    non_terminals: IndexMap<String, BTreeSet<Symbol>>,
    productions: IndexMap<Production, BTreeSet<Symbol>>,
}

fn first_of_sequence(
    sequence: &[Symbol],
    non_terminals: &IndexMap<String, BTreeSet<Symbol>>,
) -> BTreeSet<Symbol> {
    let mut first = BTreeSet::new();
    for symbol in sequence {
        match symbol {
            Symbol::Terminal(_) | Symbol::EndMarker => {
                first.insert(symbol.clone());
                return first;
            }
            Symbol::Epsilon => continue,
            Symbol::NonTerminal(name) => {
                let Some(nt_first) = non_terminals.get(name) else {
                    return first;
                };
                first.extend(nt_first.iter().filter(|s| **s != Symbol::Epsilon).cloned());
                if !nt_first.contains(&Symbol::Epsilon) {
                    return first;
                }
            }
        }
    }
    first.insert(Symbol::Epsilon);
    first
}

impl FirstSets {
    pub fn compute(g: &Grammar) -> Self {
        let mut non_terminals: IndexMap<String, BTreeSet<Symbol>> = g
            .non_terminal_iter()
            .map(|nt| (nt.to_string(), BTreeSet::new()))
            .collect();

        let mut changed = true;
        while changed {
            changed = false;
            for (left, productions) in g.rule_iter() {
                let first = productions
                    .iter()
                    .fold(BTreeSet::new(), |mut first, production| {
                        first.extend(first_of_sequence(production, &non_terminals));
                        first
                    });

                // sets only grow, so a size change is a real change
                if let Some(old) = non_terminals.get_mut(left) {
                    if old.len() != first.len() {
                        *old = first;
                        changed = true;
                    }
                }
            }
        }

        let mut productions = IndexMap::new();
        for (_, rights) in g.rule_iter() {
            for production in rights {
                productions
                    .entry(production.clone())
                    .or_insert_with(|| first_of_sequence(production, &non_terminals));
            }
        }

        Self {
            non_terminals,
            productions,
        }
    }

    /// First set of an arbitrary symbol sequence; the empty sequence yields `{Epsilon}`.
    pub fn first(&self, sequence: &[Symbol]) -> BTreeSet<Symbol> {
        match self.productions.get(sequence) {
            Some(first) => first.clone(),
            None => first_of_sequence(sequence, &self.non_terminals),
        }
    }

    pub fn of_non_terminal(&self, non_terminal: &str) -> Option<&BTreeSet<Symbol>> {
        self.non_terminals.get(non_terminal)
    }

    pub fn nullable(&self, non_terminal: &str) -> bool {
        self.of_non_terminal(non_terminal)
            .map_or(false, |first| first.contains(&Symbol::Epsilon))
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Symbol>)> {
        self.non_terminals.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The memoized First table, keyed by production right-hand side.
    pub fn production_iter(&self) -> impl Iterator<Item = (&[Symbol], &BTreeSet<Symbol>)> {
        self.productions.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

/// Follow sets of every nonterminal, including `EndMarker` where input may end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: IndexMap<String, BTreeSet<Symbol>>,
}

impl FollowSets {
    pub fn compute(g: &Grammar, first: &FirstSets) -> Self {
        let mut follow = Self {
            sets: g
                .non_terminal_iter()
                .map(|nt| (nt.to_string(), BTreeSet::new()))
                .collect(),
        };
        if let Some(start) = follow.sets.get_mut(g.start_symbol()) {
            start.insert(Symbol::EndMarker);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for (left, productions) in g.rule_iter() {
                for production in productions {
                    // no short-circuit: every production is scanned in every pass
                    changed |= follow.update_for_production(left, production, first);
                }
            }
        }

        follow
    }

    fn update_for_production(
        &mut self,
        left: &str,
        production: &[Symbol],
        first: &FirstSets,
    ) -> bool {
        let mut changed = false;
        let mut trailer = self.sets.get(left).cloned().unwrap_or_default();

        for symbol in production.iter().rev() {
            match symbol {
                Symbol::NonTerminal(name) => {
                    if let Some(set) = self.sets.get_mut(name) {
                        let before = set.len();
                        set.extend(trailer.iter().cloned());
                        changed |= set.len() != before;
                    }

                    let symbol_first = first.first(std::slice::from_ref(symbol));
                    if symbol_first.contains(&Symbol::Epsilon) {
                        trailer.extend(
                            symbol_first
                                .into_iter()
                                .filter(|s| *s != Symbol::Epsilon),
                        );
                    } else {
                        trailer = symbol_first;
                    }
                }
                Symbol::Terminal(_) | Symbol::EndMarker => {
                    trailer = BTreeSet::from([symbol.clone()]);
                }
                Symbol::Epsilon => {}
            }
        }

        changed
    }

    pub fn get(&self, non_terminal: &str) -> Option<&BTreeSet<Symbol>> {
        self.sets.get(non_terminal)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Symbol>)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }
}
