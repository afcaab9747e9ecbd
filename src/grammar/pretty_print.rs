use std::collections::{BTreeSet, HashSet};

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    analysis::AnalysisResult,
    grammar::Symbol,
    ll1_driver::{ParseReport, Verdict},
    Grammar, EPSILON,
};

/// `symbol` for math mode; `@` becomes `\epsilon`.
fn tex_math(symbol: &str, terminal_set: &HashSet<&str>) -> String {
    if symbol == EPSILON {
        "\\epsilon".to_string()
    } else if terminal_set.contains(symbol) {
        format!("\\text{{{}}}", escape::tex(symbol))
    } else {
        escape::tex(symbol).to_string()
    }
}

/// `symbol` for text mode, e.g. inside a tabular cell.
fn tex_text(symbol: &str) -> String {
    if symbol == EPSILON {
        "$\\epsilon$".to_string()
    } else {
        escape::tex(symbol).to_string()
    }
}

pub(super) fn aligned(output: &[Vec<String>], right: bool) -> String {
    let columns = output.iter().map(|line| line.len()).max().unwrap_or(0);
    let width: Vec<usize> = (0..columns)
        .map(|j| {
            output
                .iter()
                .filter_map(|line| line.get(j))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    output
        .iter()
        .map(|line| {
            line.iter()
                .enumerate()
                .map(|(i, s)| {
                    if right {
                        format!("{:>width$}", s, width = width[i])
                    } else {
                        format!("{:<width$}", s, width = width[i])
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &HashSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| tex_math(s, terminal_set))
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        left + &right
    }
}

pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
    terminals: HashSet<&'a str>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .map(|s| s.to_latex(true, &self.terminals)),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Row<'a> {
            left: &'a str,
            rights: &'a Vec<Vec<&'a str>>,
        }
        let rows: Vec<Row> = self
            .productions
            .iter()
            .map(|p| Row {
                left: p.left,
                rights: &p.rights,
            })
            .collect();
        serde_json::to_string(&rows).unwrap_or_default()
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .rule_iter()
            .map(|(left, rights)| ProductionOutput {
                left,
                rights: rights
                    .iter()
                    .map(|p| p.iter().map(|s| s.name()).collect())
                    .collect(),
            })
            .collect();
        ProductionOutputVec {
            productions,
            terminals: self.terminal_iter().collect(),
        }
    }
}

fn names(set: &BTreeSet<Symbol>) -> Vec<&str> {
    set.iter().map(|s| s.name()).collect()
}

#[derive(Serialize)]
struct NonTerminalOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl NonTerminalOutput<'_> {
    fn to_plaintext(&self) -> Vec<String> {
        vec![
            self.name.to_string(),
            self.nullable.to_string(),
            self.first.join(", "),
            self.follow.join(", "),
        ]
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter().map(|s| tex_text(s)).collect::<Vec<_>>().join(r"\ ")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
struct SequenceFirstOutput<'a> {
    sequence: Vec<&'a str>,
    first: Vec<&'a str>,
}

/// First/Follow of every nonterminal plus First of every production.
#[derive(Serialize)]
pub struct NonTerminalOutputVec<'a> {
    data: Vec<NonTerminalOutput<'a>>,
    productions: Vec<SequenceFirstOutput<'a>>,
}

impl NonTerminalOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec![
            "Symbol".to_string(),
            "Nullable".to_string(),
            "First".to_string(),
            "Follow".to_string(),
        ]];
        output.extend(self.data.iter().map(|s| s.to_plaintext()));

        let sequences = self
            .productions
            .iter()
            .map(|p| format!("First({}) = {{{}}}", p.sequence.join(" "), p.first.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");

        aligned(&output, false) + "\n\n" + &sequences
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl AnalysisResult {
    pub fn to_non_terminal_output_vec(&self) -> NonTerminalOutputVec {
        let data = self
            .first()
            .non_terminal_iter()
            .map(|(name, first)| NonTerminalOutput {
                name,
                nullable: first.contains(&Symbol::Epsilon),
                first: names(first),
                follow: self.follow().get(name).map(names).unwrap_or_default(),
            })
            .collect();
        let productions = self
            .first()
            .production_iter()
            .map(|(sequence, first)| SequenceFirstOutput {
                sequence: sequence.iter().map(|s| s.name()).collect(),
                first: names(first),
            })
            .collect();
        NonTerminalOutputVec { data, productions }
    }
}

#[derive(Serialize)]
struct TraceStepOutput<'a> {
    stack: Vec<&'a str>,
    input: Vec<&'a str>,
    action: String,
}

#[derive(Serialize)]
pub struct TraceOutput<'a> {
    steps: Vec<TraceStepOutput<'a>>,
    accepted: bool,
    verdict: String,
}

impl TraceOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output = vec![vec![
            "Stack".to_string(),
            "Input".to_string(),
            "Action".to_string(),
        ]];
        output.extend(self.steps.iter().map(|step| {
            vec![
                step.stack.join(" "),
                step.input.join(" "),
                step.action.clone(),
            ]
        }));
        aligned(&output, false) + "\n" + &self.verdict
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .steps
            .iter()
            .map(|step| {
                let f = |a: &[&str]| a.iter().map(|s| tex_text(s)).collect::<Vec<_>>().join(r"\ ");
                format!(
                    "{} & {} & {}",
                    f(step.stack.as_slice()),
                    f(step.input.as_slice()),
                    escape::tex(step.action.as_str())
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        "\\begin{tabular}{l|r|l}\n".to_string()
            + "Stack & Input & Action\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}\n"
            + &escape::tex(self.verdict.as_str())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl ParseReport {
    pub fn to_trace_output(&self) -> TraceOutput {
        let steps = self
            .trace
            .iter()
            .map(|step| TraceStepOutput {
                stack: step.stack.iter().map(|s| s.name()).collect(),
                input: step.input.iter().map(|s| s.name()).collect(),
                action: step.action.to_plaintext(),
            })
            .collect();
        let verdict = match &self.verdict {
            Verdict::Accepted => "accepted: the input is a sentence of the grammar".to_string(),
            Verdict::Rejected(e) => format!("rejected: {}", e),
        };
        TraceOutput {
            steps,
            accepted: self.is_accepted(),
            verdict,
        }
    }
}
