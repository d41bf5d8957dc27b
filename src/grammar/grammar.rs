use std::collections::HashMap;

use super::{END_MARK, EPSILON, EPSILON_ALIASES};

/// Symbol index of the empty marker in every grammar.
pub const EPSILON_INDEX: usize = 0;
/// Symbol index of the end-of-input marker in every grammar.
pub const END_MARK_INDEX: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

impl SymbolKind {
    /// A token is a non-terminal iff it starts with an ASCII uppercase letter.
    /// Only the head is inspected: `E`, `E'`, `AB` and `A''` are all
    /// non-terminal names, everything else (including ε and #) is a terminal.
    pub fn classify(token: &str) -> Self {
        match token.chars().next() {
            Some(c) if c.is_ascii_uppercase() => SymbolKind::NonTerminal,
            _ => SymbolKind::Terminal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            productions: Vec::new(),
        }
    }

    /// Whether the non-terminal appeared on some left side.
    pub fn is_defined(&self) -> bool {
        !self.productions.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::NonTerminal(_) => SymbolKind::NonTerminal,
            Symbol::Terminal(_) => SymbolKind::Terminal,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }
}

/// A context-free grammar.
///
/// Symbols live in `symbols` and are referred to by index everywhere else.
/// `non_terminals` keeps the order in which non-terminals were first seen;
/// its head is the start symbol.
#[derive(Debug, Clone)]
pub struct Grammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub non_terminals: Vec<usize>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            non_terminals: Vec::new(),
        };

        let e_idx = g.add_terminal(EPSILON.to_string());
        for alias in EPSILON_ALIASES {
            g.symbol_table.insert(alias.to_string(), e_idx);
        }
        g.add_terminal(END_MARK.to_string());

        g
    }

    pub fn start_symbol(&self) -> Option<usize> {
        self.non_terminals.first().copied()
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.symbols.iter().skip(2).filter_map(|s| {
            if let Symbol::Terminal(name) = s {
                Some(name)
            } else {
                None
            }
        })
    }

    /// Non-terminals in discovery order.
    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.non_terminals
            .iter()
            .filter_map(|idx| self.symbols[*idx].non_terminal())
    }

    pub fn undefined_non_terminals(&self) -> impl Iterator<Item = &NonTerminal> {
        self.non_terminal_iter().filter(|nt| !nt.is_defined())
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        self.symbols[index].name()
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        self.symbols[index].kind() == SymbolKind::NonTerminal
    }

    /// Index of `name`, registering it as a new symbol on first sight.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(idx) = self.get_symbol_index(name) {
            return idx;
        }
        match SymbolKind::classify(name) {
            SymbolKind::NonTerminal => self.add_non_terminal(name),
            SymbolKind::Terminal => self.add_terminal(name.to_string()),
        }
    }

    fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        self.non_terminals.push(idx);
        idx
    }

    fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    /// Appends an alternative to `left`, which must be a non-terminal index.
    pub(crate) fn add_production(&mut self, left: usize, right: Vec<usize>) {
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            nt.productions.push(right);
        }
    }

    /// Alternatives of a non-terminal; empty for terminals and undefined names.
    pub fn productions(&self, index: usize) -> &[Vec<usize>] {
        self.symbols[index]
            .non_terminal()
            .map(|nt| nt.productions.as_slice())
            .unwrap_or(&[])
    }
}
