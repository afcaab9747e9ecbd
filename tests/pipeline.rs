use ll1_course_helper::{tokenize, Grammar, ParseError, Symbol, Verdict};
use rstest::rstest;

const BALANCED: &str = "P ::= ( P ) P | @";

fn is_balanced(s: &str) -> bool {
    let mut depth = 0i32;
    for c in s.chars() {
        depth += if c == '(' { 1 } else { -1 };
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|s| alphabet.iter().map(move |c| format!("{}{}", s, c)))
            .collect();
        out.extend(frontier.iter().cloned());
    }
    out
}

#[test]
fn balanced_parentheses_match_a_direct_check() {
    let analysis = Grammar::parse(BALANCED).unwrap().analyze();
    assert!(analysis.is_ll1());

    for input in all_strings(&['(', ')'], 8) {
        let report = analysis.parse(tokenize(&input, false)).unwrap();
        assert_eq!(report.is_accepted(), is_balanced(&input), "input {:?}", input);
    }
}

#[rstest]
#[case("int x ;", true)]
#[case("int x , y , z ;", true)]
#[case("float y ;", true)]
#[case("int ;", false)]
#[case("int x y ;", false)]
#[case("x ;", false)]
fn declarations(#[case] input: &str, #[case] accepted: bool) {
    let analysis = Grammar::parse(
        "Decl ::= Type List ;
Type ::= int | float
List ::= id Rest
Rest ::= , id Rest | @",
    )
    .unwrap()
    .analyze();
    let tokens: Vec<String> = tokenize(input, true)
        .into_iter()
        .map(|t| match t.as_str() {
            "int" | "float" | ";" | "," => t,
            _ => "id".to_string(),
        })
        .collect();

    assert_eq!(analysis.parse(tokens).unwrap().is_accepted(), accepted);
}

#[test]
fn rejected_report_keeps_trace_so_far() {
    let analysis = Grammar::parse("S ::= a B\nB ::= b | c").unwrap().analyze();
    let report = analysis.parse(tokenize("ad", false)).unwrap();

    assert_eq!(
        report.verdict,
        Verdict::Rejected(ParseError::NoRule {
            non_terminal: "B".to_string(),
            lookahead: Symbol::terminal("d"),
        })
    );
    assert_eq!(report.trace.len(), 3);
}

#[test]
fn tables_are_reusable_across_parses() {
    let analysis = Grammar::parse("S ::= a S | @").unwrap().analyze();
    let before = analysis.table().clone();

    for input in ["", "a", "aaa", "b"] {
        analysis.parse(tokenize(input, false)).unwrap();
    }
    assert_eq!(analysis.table(), &before);
}
