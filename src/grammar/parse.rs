use tracing::debug;

use super::{GrammarError, SymbolKind, SyntaxErrorKind};
use crate::Grammar;

const SEPARATORS: [&str; 2] = ["→", "->"];

/// Splits a line around its single separator, `None` if there is none.
fn split_separator(line: &str) -> Result<Option<(&str, &str)>, SyntaxErrorKind> {
    let count: usize = SEPARATORS.iter().map(|sep| line.matches(sep).count()).sum();
    if count > 1 {
        return Err(SyntaxErrorKind::TooManySeparators);
    }
    Ok(SEPARATORS.iter().find_map(|sep| {
        line.find(sep)
            .map(|pos| (&line[..pos], &line[pos + sep.len()..]))
    }))
}

impl Grammar {
    pub fn parse(grammar: &str) -> Result<Self, GrammarError> {
        Self::build(grammar.lines())
    }

    /// Builds a grammar from raw lines, one production per line.
    ///
    /// Symbols are registered in source order: the left side of a line
    /// first, then its right side tokens. Whitespace-only lines are skipped;
    /// any other line without exactly one separator aborts the whole build.
    pub fn build<I, S>(lines: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut g = Self::new();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_no = i + 1;
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }

            let parts =
                split_separator(line).map_err(|kind| GrammarError::syntax(line_no, kind))?;
            let Some((left_str, rights)) = parts else {
                return Err(GrammarError::syntax(line_no, SyntaxErrorKind::MissingSeparator));
            };

            let left_str = left_str.trim();
            let kind = if left_str.is_empty() {
                Some(SyntaxErrorKind::EmptyLeftSide)
            } else if left_str.split_whitespace().count() != 1 {
                Some(SyntaxErrorKind::LeftSideContainsWhitespace)
            } else if g.get_symbol_index(left_str).map_or(
                SymbolKind::classify(left_str) == SymbolKind::Terminal,
                |idx| !g.is_non_terminal(idx),
            ) {
                Some(SyntaxErrorKind::TerminalLeftSide(left_str.to_string()))
            } else {
                None
            };
            if let Some(kind) = kind {
                return Err(GrammarError::syntax(line_no, kind));
            }
            let left = g.intern(left_str);

            for right in rights.split('|') {
                let symbols = right.split_whitespace().map(|s| g.intern(s)).collect();
                g.add_production(left, symbols);
            }
        }

        debug!(
            symbols = g.symbols.len(),
            non_terminals = g.non_terminals.len(),
            "grammar loaded"
        );
        Ok(g)
    }
}
