use crowbook_text_processing::escape::tex as escape_tex;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{
    error::GrammarError,
    first_follow::{FirstSets, FollowSets},
    grammar::{Production, Symbol},
    pretty_print::{aligned, ProductionOutput},
    Grammar,
};

/// Predictive parsing table: (nonterminal, lookahead) -> production.
///
/// Every production that claims a cell is kept, in grammar order, so that a
/// grammar which is not LL(1) shows up as a cell with more than one entry
/// instead of being resolved silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LL1ParsingTable {
    lookaheads: Vec<Symbol>,
    rows: IndexMap<String, BTreeMap<Symbol, Vec<Production>>>,
}

impl LL1ParsingTable {
    pub fn build(g: &Grammar, first: &FirstSets, follow: &FollowSets) -> Self {
        let mut lookaheads: Vec<Symbol> = g.terminal_iter().map(Symbol::terminal).collect();
        lookaheads.push(Symbol::EndMarker);

        let mut rows = IndexMap::new();
        for (left, productions) in g.rule_iter() {
            let mut row: BTreeMap<Symbol, Vec<Production>> = BTreeMap::new();
            // keyed by alternative index: identical alternatives are still two claimants
            let mut claimed: HashSet<(Symbol, usize)> = HashSet::new();
            let mut claim = |lookahead: &Symbol, index: usize, production: &Production| {
                if claimed.insert((lookahead.clone(), index)) {
                    row.entry(lookahead.clone())
                        .or_default()
                        .push(production.clone());
                }
            };

            for (index, production) in productions.iter().enumerate() {
                let production_first = first.first(production);
                for terminal in production_first.iter().filter(|s| **s != Symbol::Epsilon) {
                    claim(terminal, index, production);
                }
                if production_first.contains(&Symbol::Epsilon) {
                    for lookahead in follow.get(left).into_iter().flatten() {
                        claim(lookahead, index, production);
                    }
                }
            }

            rows.insert(left.to_string(), row);
        }

        Self { lookaheads, rows }
    }

    /// The production to expand, or `None` for an error cell. On a conflicting
    /// cell this is the earliest claimant; see [`LL1ParsingTable::conflicts`].
    pub fn get(&self, non_terminal: &str, lookahead: &Symbol) -> Option<&Production> {
        self.cell(non_terminal, lookahead).first()
    }

    pub fn cell(&self, non_terminal: &str, lookahead: &Symbol) -> &[Production] {
        self.rows
            .get(non_terminal)
            .and_then(|row| row.get(lookahead))
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    /// One `TableConflict` per cell claimed by more than one production.
    pub fn conflicts(&self) -> Vec<GrammarError> {
        self.rows
            .iter()
            .flat_map(|(left, row)| {
                row.iter()
                    .filter(|(_, cell)| cell.len() > 1)
                    .map(move |(lookahead, cell)| GrammarError::TableConflict {
                        non_terminal: left.clone(),
                        lookahead: lookahead.clone(),
                        productions: cell.clone(),
                    })
            })
            .collect()
    }

    /// Column headers: the grammar's terminals followed by `$`.
    pub fn lookahead_iter(&self) -> impl Iterator<Item = &Symbol> {
        self.lookaheads.iter()
    }

    pub fn row_iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<Symbol, Vec<Production>>)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn cell_output<'a>(&'a self, left: &'a str, lookahead: &Symbol) -> ProductionOutput<'a> {
        ProductionOutput {
            left,
            rights: self
                .cell(left, lookahead)
                .iter()
                .map(|p| p.iter().map(|s| s.name()).collect())
                .collect(),
        }
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.lookaheads.iter().map(|t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, _) in self.row_iter() {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(self.lookaheads.iter().map(|lookahead| {
                self.cell_output(left, lookahead)
                    .to_plaintext(left.chars().count(), false)
            }));
            output.push(line);
        }

        aligned(&output, true)
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.lookaheads.len()),
        )];
        header.extend(
            self.lookaheads
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.name()))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.lookaheads.iter().map(|t| t.name()).collect();
        let mut output: Vec<String> = Vec::new();
        for (left, _) in self.row_iter() {
            let mut line: Vec<String> = vec![escape_tex(left).to_string()];
            line.extend(self.lookaheads.iter().map(|lookahead| {
                let cell = self.cell_output(left, lookahead);
                let r = cell.to_latex(false, &terminal_set);
                if cell.rights.len() > 1 {
                    format!("{{\\color{{red}}{}}}", r)
                } else {
                    r
                }
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Symbol {
        Symbol::terminal(s)
    }

    fn table(grammar: &str) -> LL1ParsingTable {
        let g = Grammar::parse(grammar).unwrap();
        let first = FirstSets::compute(&g);
        let follow = FollowSets::compute(&g, &first);
        LL1ParsingTable::build(&g, &first, &follow)
    }

    #[test]
    fn single_recursive_rule() {
        let table = table("S ::= a S | @");

        assert_eq!(
            table.get("S", &t("a")),
            Some(&vec![t("a"), Symbol::non_terminal("S")])
        );
        assert_eq!(
            table.get("S", &Symbol::EndMarker),
            Some(&vec![Symbol::Epsilon])
        );
        assert_eq!(table.get("S", &t("b")), None);
        assert!(table.conflicts().is_empty());
        assert_eq!(
            table.lookahead_iter().cloned().collect::<Vec<_>>(),
            vec![t("a"), Symbol::EndMarker]
        );
    }

    #[test]
    fn expression_grammar_has_no_conflicts() {
        let table = table(
            "E ::= T X
X ::= + T X | @
T ::= F Y
Y ::= * F Y | @
F ::= ( E ) | i",
        );

        assert!(table.conflicts().is_empty());
        assert_eq!(table.get("X", &t(")")), Some(&vec![Symbol::Epsilon]));
        assert_eq!(table.get("Y", &t("+")), Some(&vec![Symbol::Epsilon]));
        assert_eq!(table.get("F", &t("i")), Some(&vec![t("i")]));
        assert_eq!(table.get("E", &t("+")), None);
    }

    #[test]
    fn conflicting_productions_are_all_kept() {
        let table = table("S ::= a b | a c");

        assert_eq!(table.cell("S", &t("a")).len(), 2);
        assert_eq!(table.get("S", &t("a")), Some(&vec![t("a"), t("b")]));
        assert_eq!(
            table.conflicts(),
            vec![GrammarError::TableConflict {
                non_terminal: "S".to_string(),
                lookahead: t("a"),
                productions: vec![vec![t("a"), t("b")], vec![t("a"), t("c")]],
            }]
        );
    }

    #[test]
    fn repeated_alternative_is_a_conflict() {
        let table = table("S ::= a | a");

        assert_eq!(
            table.conflicts(),
            vec![GrammarError::TableConflict {
                non_terminal: "S".to_string(),
                lookahead: t("a"),
                productions: vec![vec![t("a")], vec![t("a")]],
            }]
        );
    }

    #[test]
    fn repeated_head_line_is_a_conflict() {
        assert_eq!(table("S ::= a\nS ::= a").conflicts().len(), 1);
        assert_eq!(table("S ::= A | A\nA ::= a").conflicts().len(), 1);
    }

    #[test]
    fn nullable_production_claims_each_cell_once() {
        // A -> B reaches `a` through both First(B) and Follow(A)
        let table = table("S ::= A a\nA ::= B\nB ::= a | @");

        assert_eq!(table.cell("A", &t("a")), &[vec![Symbol::non_terminal("B")]]);
        assert_eq!(table.conflicts().len(), 1);
        assert_eq!(table.cell("B", &t("a")).len(), 2);
    }

    #[test]
    fn first_follow_overlap_is_a_conflict() {
        // A is nullable and `a` is both in First(A) and Follow(A)
        let table = table("S ::= A a\nA ::= a | @");

        assert_eq!(table.conflicts().len(), 1);
        assert_eq!(table.cell("A", &t("a")).len(), 2);
    }

    #[test]
    fn plaintext_cells_fit_non_ascii_heads() {
        let table = table("ΣΣ ::= a");

        assert_eq!(table.to_plaintext().lines().nth(1), Some("ΣΣ | ΣΣ -> a |"));
    }

    #[test]
    fn plaintext_layout() {
        let table = table("S ::= a S | @");

        let header = [" ", "       a", "     $"].join(" | ");
        let row = ["S", "S -> a S", "S -> @"].join(" | ");
        assert_eq!(table.to_plaintext(), format!("{}\n{}", header, row));
    }
}
