use std::{fs, io::Read, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ll1_course_helper::{tokenize, Grammar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// Nullable, First and Follow sets
    Ff,
    /// LL(1) parsing table
    Ll1,
    /// Parse trace of --input
    Parse,
}

#[derive(Parser)]
#[command(name = "ll1-course-helper")]
#[command(about = "Analyze an LL(1) grammar and trace a predictive parse")]
#[command(version)]
struct Cli {
    /// Outputs to print, in order
    #[arg(value_enum, required = true)]
    outputs: Vec<Output>,

    /// Grammar file (`Head ::= alt | alt`); read from stdin when omitted
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print in LaTeX format
    #[arg(short, long, conflicts_with = "json")]
    latex: bool,

    /// Print in JSON format
    #[arg(short, long)]
    json: bool,

    /// Input string for `parse`
    #[arg(short, long, default_value = "")]
    input: String,

    /// Split the input on whitespace instead of one token per character
    #[arg(short = 'w', long)]
    split_whitespace: bool,
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let output_format = if cli.latex {
        OutputFormat::LaTeX
    } else if cli.json {
        OutputFormat::JSON
    } else {
        OutputFormat::Plain
    };

    let input = match &cli.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read grammar from stdin")?;
            buf
        }
    };

    let g = Grammar::parse(&input)?;
    let analysis = g.analyze();
    for conflict in analysis.conflicts() {
        eprintln!("warning: {}", conflict);
    }

    let mut status = ExitCode::SUCCESS;
    for output in &cli.outputs {
        let text = match output {
            Output::Prod => {
                let t = g.to_production_output_vec();
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json(),
                }
            }
            Output::Ff => {
                let t = analysis.to_non_terminal_output_vec();
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json(),
                }
            }
            Output::Ll1 => {
                let t = analysis.table();
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json(),
                }
            }
            Output::Parse => {
                let report = analysis.parse(tokenize(&cli.input, cli.split_whitespace))?;
                if !report.is_accepted() {
                    status = ExitCode::from(1);
                }
                let t = report.to_trace_output();
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json(),
                }
            }
        };
        println!("{}", text);
    }

    Ok(status)
}
