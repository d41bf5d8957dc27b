pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod parse;
pub mod pretty_print;
pub use error::{GrammarError, SyntaxErrorKind};
pub use first_follow::{FirstFollow, SolverState};
pub use grammar::{Grammar, SymbolKind};

pub const EPSILON: &str = "ε";
pub const END_MARK: &str = "#";

/// Other spellings of the empty marker that show up in grammar files.
pub const EPSILON_ALIASES: [&str; 2] = ["Ɛ", "ϵ"];
