extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::ll1_driver::{tokenize, Action, ParseDriver, ParseReport, TraceStep, Verdict};
pub use grammar::{AnalysisResult, Grammar, GrammarError, LoadError, ParseError, Symbol};

fn error_to_json(e: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => g.analyze().to_non_terminal_output_vec().to_json(),
        Err(e) => error_to_json(e),
    }
}

#[wasm_bindgen]
pub fn ll1_table_to_json(grammar: &str) -> String {
    match crate::Grammar::parse(grammar) {
        Ok(g) => g.analyze().table().to_json(),
        Err(e) => error_to_json(e),
    }
}

/// Tokens are single characters unless the input contains whitespace.
#[wasm_bindgen]
pub fn parse_to_json(grammar: &str, input: &str) -> String {
    let g = match crate::Grammar::parse(grammar) {
        Ok(g) => g,
        Err(e) => return error_to_json(e),
    };
    let split_whitespace = input.trim().contains(char::is_whitespace);
    match g.analyze().parse(tokenize(input, split_whitespace)) {
        Ok(report) => report.to_trace_output().to_json(),
        Err(e) => error_to_json(e),
    }
}
