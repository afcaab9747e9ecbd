use indexmap::{IndexMap, IndexSet};

use super::{
    error::LoadError,
    grammar::{Production, Symbol},
    Grammar, END_MARK, EPSILON,
};

const SEPARATOR: &str = "::=";

fn classify(token: &str, heads: &IndexSet<&str>) -> Symbol {
    if token == EPSILON || token == "ε" {
        Symbol::Epsilon
    } else if heads.contains(token) || token.starts_with(|c: char| c.is_uppercase()) {
        Symbol::non_terminal(token)
    } else {
        Symbol::terminal(token)
    }
}

impl Grammar {
    /// Reads `Head ::= alt1 | alt2 ...`, one head per line. A line starting
    /// with `|` adds alternatives to the previous head.
    pub fn parse(grammar: &str) -> Result<Self, LoadError> {
        let mut raw_productions: Vec<(usize, &str, &str)> = Vec::new();

        let mut previous_left: Option<&str> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let parts: Vec<&str> = line.split(SEPARATOR).collect();
            if parts.len() > 2 {
                return Err(LoadError::TooManySeparators { line: i + 1 });
            }
            let (left, rights): (&str, &str) = if parts.len() == 2 {
                let left_str = parts[0].trim();
                if left_str.is_empty() {
                    return Err(LoadError::EmptyHead { line: i + 1 });
                } else if left_str.split_whitespace().count() != 1 {
                    return Err(LoadError::HeadContainsWhitespace { line: i + 1 });
                }
                (left_str, parts[1].trim())
            } else {
                match (previous_left, parts[0].trim().strip_prefix('|')) {
                    (Some(left), Some(rights)) => (left, rights.trim()),
                    _ => return Err(LoadError::MissingHead { line: i + 1 }),
                }
            };

            previous_left = Some(left);
            raw_productions.push((i + 1, left, rights));
        }

        let heads: IndexSet<&str> = raw_productions.iter().map(|(_, left, _)| *left).collect();
        let mut rules: IndexMap<String, Vec<Production>> = IndexMap::new();
        for (line, left, rights) in raw_productions {
            let productions = rules.entry(left.to_string()).or_default();
            for right in rights.split('|') {
                let production: Production = right
                    .split_whitespace()
                    .map(|s| {
                        if s == END_MARK {
                            Err(LoadError::ReservedEndMarker { line })
                        } else {
                            Ok(classify(s, &heads))
                        }
                    })
                    .collect::<Result<_, _>>()?;
                if production.is_empty() {
                    return Err(LoadError::EmptyAlternative { line });
                }
                productions.push(production);
            }
        }

        Ok(Grammar::new(rules)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar::{error::GrammarError, grammar::Symbol, LoadError};
    use crate::Grammar;

    fn t(s: &str) -> Symbol {
        Symbol::terminal(s)
    }

    fn nt(s: &str) -> Symbol {
        Symbol::non_terminal(s)
    }

    #[test]
    fn simple_parse() {
        let g = Grammar::parse("S ::= a").unwrap();

        assert_eq!(g.start_symbol(), "S");
        assert_eq!(g.productions("S"), &[vec![t("a")]]);
    }

    #[test]
    fn alternatives_and_epsilon() {
        let g = Grammar::parse("  S ::= a S |  @ ").unwrap();

        assert_eq!(
            g.productions("S"),
            &[vec![t("a"), nt("S")], vec![Symbol::Epsilon]]
        );
    }

    #[test]
    fn continuation_lines() {
        let g = Grammar::parse("S ::= a \n | b c\n\n   \nA ::= x").unwrap();

        assert_eq!(
            g.productions("S"),
            &[vec![t("a")], vec![t("b"), t("c")]]
        );
        assert_eq!(g.non_terminal_iter().collect::<Vec<_>>(), vec!["S", "A"]);
    }

    #[test]
    fn repeated_head_appends() {
        let g = Grammar::parse("S ::= a\nS ::= b").unwrap();

        assert_eq!(g.productions("S"), &[vec![t("a")], vec![t("b")]]);
    }

    #[test]
    fn lowercase_head_is_non_terminal() {
        let g = Grammar::parse("s ::= a b\nb ::= c").unwrap();

        assert_eq!(g.productions("s"), &[vec![t("a"), nt("b")]]);
        assert_eq!(g.terminal_iter().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn undefined_uppercase_symbol() {
        assert_eq!(
            Grammar::parse("S ::= a B").unwrap_err(),
            LoadError::Grammar(GrammarError::UndefinedNonTerminal {
                head: "S".to_string(),
                symbol: "B".to_string()
            })
        );
    }

    #[test]
    fn empty_text_has_no_start_symbol() {
        assert_eq!(
            Grammar::parse("  \n  ").unwrap_err(),
            LoadError::Grammar(GrammarError::Empty)
        );
    }

    #[test]
    fn malformed_lines() {
        assert_eq!(
            Grammar::parse("S ::= a ::= b").unwrap_err(),
            LoadError::TooManySeparators { line: 1 }
        );
        assert_eq!(
            Grammar::parse("::= a").unwrap_err(),
            LoadError::EmptyHead { line: 1 }
        );
        assert_eq!(
            Grammar::parse("| a b\nS ::= a").unwrap_err(),
            LoadError::MissingHead { line: 1 }
        );
        assert_eq!(
            Grammar::parse("S a ::= x").unwrap_err(),
            LoadError::HeadContainsWhitespace { line: 1 }
        );
        assert_eq!(
            Grammar::parse("S ::= a |").unwrap_err(),
            LoadError::EmptyAlternative { line: 1 }
        );
        assert_eq!(
            Grammar::parse("S ::= a\n | b $").unwrap_err(),
            LoadError::ReservedEndMarker { line: 2 }
        );
    }
}
