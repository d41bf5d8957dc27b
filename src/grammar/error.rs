use thiserror::Error;

/// Why a grammar line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("missing production separator")]
    MissingSeparator,
    #[error("too many production separators")]
    TooManySeparators,
    #[error("empty left side")]
    EmptyLeftSide,
    #[error("left side contains whitespace")]
    LeftSideContainsWhitespace,
    #[error("left side \"{0}\" is not a non-terminal")]
    TerminalLeftSide(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A line of the grammar source is malformed; `line` is 1-based.
    #[error("Line {line}: {kind}")]
    Syntax { line: usize, kind: SyntaxErrorKind },

    /// A non-terminal is used on some right side but never defined.
    #[error("non-terminal \"{0}\" is used but never defined")]
    UndefinedNonTerminal(String),

    /// These non-terminals cannot derive any string of terminals.
    #[error("non-terminals {} never derive a terminal string", .0.join(", "))]
    NonTerminating(Vec<String>),

    #[error("\"{0}\" is not a non-terminal")]
    NotANonTerminal(String),

    /// An index that does not name any symbol of the grammar.
    #[error("no symbol with index {0}")]
    UnknownSymbol(usize),
}

impl GrammarError {
    pub(crate) fn syntax(line: usize, kind: SyntaxErrorKind) -> Self {
        GrammarError::Syntax { line, kind }
    }
}
