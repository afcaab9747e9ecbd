pub mod analysis;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod ll1_driver;
pub mod ll1_parsing_table;
pub mod parse;
pub mod pretty_print;
pub use analysis::AnalysisResult;
pub use error::{GrammarError, LoadError, ParseError};
pub use grammar::{Grammar, Production, Symbol};

pub const EPSILON: &str = "@";
pub const END_MARK: &str = "$";
