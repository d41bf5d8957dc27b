use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use super::{
    grammar::{Symbol, END_MARK_INDEX, EPSILON_INDEX},
    Grammar, GrammarError,
};

pub type SymbolSet = HashSet<usize>;
pub type SetTable = HashMap<usize, SymbolSet>;

/// FIRST and FOLLOW sets of every non-terminal, keyed by symbol index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstFollow {
    pub first: SetTable,
    pub follow: SetTable,
}

impl FirstFollow {
    pub fn nullable(&self, index: usize) -> bool {
        self.first
            .get(&index)
            .is_some_and(|first| first.contains(&EPSILON_INDEX))
    }
}

/// FIRST of a symbol string against a (possibly partial) FIRST table.
fn first_of_sequence(grammar: &Grammar, first: &SetTable, sequence: &[usize]) -> SymbolSet {
    let mut result = SymbolSet::new();
    for &idx in sequence {
        match &grammar.symbols[idx] {
            Symbol::Terminal(_) if idx == EPSILON_INDEX => continue,
            Symbol::Terminal(_) => {
                result.insert(idx);
                return result;
            }
            Symbol::NonTerminal(_) => {
                let Some(sym_first) = first.get(&idx) else {
                    return result;
                };
                result.extend(sym_first.iter().filter(|s| **s != EPSILON_INDEX));
                if !sym_first.contains(&EPSILON_INDEX) {
                    return result;
                }
            }
        }
    }
    result.insert(EPSILON_INDEX);
    result
}

/// Owns the FIRST and FOLLOW tables of one grammar.
///
/// Both tables are filled by iterating full passes over all productions
/// until nothing grows, so left recursion and mutually dependent sets
/// converge instead of recursing forever. Once filled a table is never
/// touched again.
#[derive(Debug)]
pub struct SolverState<'g> {
    grammar: &'g Grammar,
    first: Option<SetTable>,
    follow: Option<SetTable>,
}

impl<'g> SolverState<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self {
            grammar,
            first: None,
            follow: None,
        }
    }

    pub fn first(&mut self, symbol: usize) -> Result<SymbolSet, GrammarError> {
        match self.symbol(symbol)? {
            Symbol::Terminal(_) => Ok(SymbolSet::from([symbol])),
            Symbol::NonTerminal(nt) if !nt.is_defined() => {
                Err(GrammarError::UndefinedNonTerminal(nt.name.clone()))
            }
            Symbol::NonTerminal(_) => Ok(self.first_table()?[&symbol].clone()),
        }
    }

    pub fn first_of_sequence(&mut self, sequence: &[usize]) -> Result<SymbolSet, GrammarError> {
        let grammar = self.grammar;
        for &idx in sequence {
            if let Some(nt) = self.symbol(idx)?.non_terminal() {
                if !nt.is_defined() {
                    return Err(GrammarError::UndefinedNonTerminal(nt.name.clone()));
                }
            }
        }
        Ok(first_of_sequence(grammar, self.first_table()?, sequence))
    }

    pub fn follow(&mut self, symbol: usize) -> Result<SymbolSet, GrammarError> {
        match self.symbol(symbol)? {
            Symbol::Terminal(name) => Err(GrammarError::NotANonTerminal(name.clone())),
            Symbol::NonTerminal(nt) if !nt.is_defined() => {
                Err(GrammarError::UndefinedNonTerminal(nt.name.clone()))
            }
            Symbol::NonTerminal(_) => Ok(self.follow_table()?[&symbol].clone()),
        }
    }

    fn symbol(&self, index: usize) -> Result<&'g Symbol, GrammarError> {
        let grammar = self.grammar;
        grammar
            .symbols
            .get(index)
            .ok_or(GrammarError::UnknownSymbol(index))
    }

    /// FIRST of every non-terminal in discovery order, then FOLLOW of every
    /// non-terminal in discovery order.
    #[instrument(skip_all)]
    pub fn compute_all(&mut self) -> Result<FirstFollow, GrammarError> {
        let grammar = self.grammar;
        let mut result = FirstFollow::default();
        for &nt in &grammar.non_terminals {
            result.first.insert(nt, self.first(nt)?);
        }
        for &nt in &grammar.non_terminals {
            result.follow.insert(nt, self.follow(nt)?);
        }
        Ok(result)
    }

    fn first_table(&mut self) -> Result<&SetTable, GrammarError> {
        if self.first.is_none() {
            self.validate()?;
            self.first = Some(self.calculate_first());
        }
        Ok(self.first.get_or_insert_with(SetTable::new))
    }

    fn follow_table(&mut self) -> Result<&SetTable, GrammarError> {
        if self.follow.is_none() {
            self.first_table()?;
            self.follow = Some(self.calculate_follow());
        }
        Ok(self.follow.get_or_insert_with(SetTable::new))
    }

    /// Rejects grammars whose sets would be meaningless: references to
    /// undefined non-terminals, and non-terminals that derive no terminal
    /// string at all.
    fn validate(&self) -> Result<(), GrammarError> {
        if let Some(nt) = self.grammar.undefined_non_terminals().next() {
            return Err(GrammarError::UndefinedNonTerminal(nt.name.clone()));
        }

        let mut generating: HashSet<usize> = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for nt in self.grammar.non_terminal_iter() {
                if generating.contains(&nt.index) {
                    continue;
                }
                let derives = nt.productions.iter().any(|production| {
                    production
                        .iter()
                        .all(|s| !self.grammar.is_non_terminal(*s) || generating.contains(s))
                });
                if derives {
                    generating.insert(nt.index);
                    changed = true;
                }
            }
        }

        let stuck: Vec<String> = self
            .grammar
            .non_terminal_iter()
            .filter(|nt| !generating.contains(&nt.index))
            .map(|nt| nt.name.clone())
            .collect();
        if stuck.is_empty() {
            Ok(())
        } else {
            Err(GrammarError::NonTerminating(stuck))
        }
    }

    #[instrument(skip_all)]
    fn calculate_first(&self) -> SetTable {
        let grammar = self.grammar;
        let mut first: SetTable = grammar
            .non_terminals
            .iter()
            .map(|nt| (*nt, SymbolSet::new()))
            .collect();

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for nt in grammar.non_terminal_iter() {
                let update = nt
                    .productions
                    .iter()
                    .fold(SymbolSet::new(), |mut acc, production| {
                        acc.extend(first_of_sequence(grammar, &first, production));
                        acc
                    });

                let entry = first.entry(nt.index).or_default();
                if !update.is_subset(entry) {
                    trace!(symbol = nt.name.as_str(), "FIRST grew");
                    entry.extend(update);
                    changed = true;
                }
            }
        }

        debug!(passes, "FIRST sets converged");
        first
    }

    #[instrument(skip_all)]
    fn calculate_follow(&self) -> SetTable {
        let grammar = self.grammar;
        let empty = SetTable::new();
        let first = self.first.as_ref().unwrap_or(&empty);
        let mut follow: SetTable = grammar
            .non_terminals
            .iter()
            .map(|nt| (*nt, SymbolSet::new()))
            .collect();
        if let Some(start) = grammar.start_symbol() {
            follow.entry(start).or_default().insert(END_MARK_INDEX);
        }

        let mut passes = 0;
        let mut changed = true;
        while changed {
            changed = false;
            passes += 1;
            for left in grammar.non_terminal_iter() {
                for production in &left.productions {
                    for (i, &idx) in production.iter().enumerate() {
                        if !grammar.is_non_terminal(idx) {
                            continue;
                        }

                        let mut update = first_of_sequence(grammar, first, &production[i + 1..]);
                        // the remaining suffix can vanish: whatever follows the
                        // left side also follows this symbol
                        if update.remove(&EPSILON_INDEX) && idx != left.index {
                            if let Some(left_follow) = follow.get(&left.index) {
                                update.extend(left_follow.iter().cloned());
                            }
                        }

                        let entry = follow.entry(idx).or_default();
                        if !update.is_subset(entry) {
                            trace!(symbol = grammar.get_symbol_name(idx), "FOLLOW grew");
                            entry.extend(update);
                            changed = true;
                        }
                    }
                }
            }
        }

        debug!(passes, "FOLLOW sets converged");
        follow
    }
}

impl Grammar {
    /// FIRST and FOLLOW sets of every non-terminal, computed on a fresh
    /// [`SolverState`].
    pub fn calculate_first_follow(&self) -> Result<FirstFollow, GrammarError> {
        SolverState::new(self).compute_all()
    }
}
