use super::{
    error::GrammarError,
    first_follow::{FirstSets, FollowSets},
    ll1_driver::{ParseDriver, ParseReport},
    ll1_parsing_table::LL1ParsingTable,
    Grammar,
};

/// First sets, Follow sets and the parsing table of one grammar, computed once.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    start_symbol: String,
    first: FirstSets,
    follow: FollowSets,
    table: LL1ParsingTable,
}

impl Grammar {
    pub fn analyze(&self) -> AnalysisResult {
        let first = FirstSets::compute(self);
        let follow = FollowSets::compute(self, &first);
        let table = LL1ParsingTable::build(self, &first, &follow);
        AnalysisResult {
            start_symbol: self.start_symbol().to_string(),
            first,
            follow,
            table,
        }
    }
}

impl AnalysisResult {
    pub fn start_symbol(&self) -> &str {
        &self.start_symbol
    }

    pub fn first(&self) -> &FirstSets {
        &self.first
    }

    pub fn follow(&self) -> &FollowSets {
        &self.follow
    }

    pub fn table(&self) -> &LL1ParsingTable {
        &self.table
    }

    pub fn conflicts(&self) -> Vec<GrammarError> {
        self.table.conflicts()
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts().is_empty()
    }

    /// Fails with the first `TableConflict`, if any.
    pub fn ensure_ll1(&self) -> Result<(), GrammarError> {
        match self.conflicts().into_iter().next() {
            Some(conflict) => Err(conflict),
            None => Ok(()),
        }
    }

    /// Runs a fresh driver over `tokens`.
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseReport, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(ParseDriver::new(self, tokens)?.run())
    }
}

#[cfg(test)]
mod tests {
    use crate::Grammar;

    #[test]
    fn conflicts_are_reported() {
        let analysis = Grammar::parse("S ::= a b | a c").unwrap().analyze();

        assert!(!analysis.is_ll1());
        assert!(analysis.ensure_ll1().is_err());
        assert!(analysis.parse(["a", "b"]).is_err());
    }

    #[test]
    fn repeated_alternatives_refuse_to_parse() {
        for grammar in ["S ::= a | a", "S ::= a\nS ::= a", "S ::= A | A\nA ::= a"] {
            let analysis = Grammar::parse(grammar).unwrap().analyze();

            assert_eq!(analysis.conflicts().len(), 1, "{}", grammar);
            assert!(!analysis.is_ll1());
            assert!(analysis.parse(["a"]).is_err());
        }
    }

    #[test]
    fn pipeline_exposes_every_table() {
        let analysis = Grammar::parse("S ::= a S | @").unwrap().analyze();

        assert!(analysis.is_ll1());
        assert_eq!(analysis.start_symbol(), "S");
        assert!(analysis.first().nullable("S"));
        assert_eq!(analysis.follow().iter().count(), 1);
        assert_eq!(analysis.table().row_iter().count(), 1);
    }
}
