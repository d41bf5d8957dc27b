extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::{FirstFollow, Grammar, GrammarError, SolverState, SymbolKind};

fn first_follow_json(grammar: &str) -> Result<String, Box<dyn std::error::Error>> {
    let g = crate::Grammar::parse(grammar)?;
    let sets = g.calculate_first_follow()?;
    Ok(g.to_non_terminal_output_vec(&sets).to_json()?)
}

#[wasm_bindgen]
pub fn first_follow_to_json(grammar: &str) -> String {
    match first_follow_json(grammar) {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}


#[cfg(test)]
mod first_follow_tests {
    use std::collections::HashSet;

    use crate::{
        grammar::grammar::{END_MARK_INDEX, EPSILON_INDEX},
        Grammar, GrammarError, SolverState,
    };

    const EXPRESSION: &str = "E  → T E'
E' → + T E' | ε
T  → F T'
T' → * F T' | ε
F  → ( E ) | id";

    fn names(g: &Grammar, set: &HashSet<usize>) -> HashSet<String> {
        set.iter().map(|idx| g.get_symbol_name(*idx).to_string()).collect()
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn expression_grammar() {
        let g = Grammar::parse(EXPRESSION).unwrap();
        let sets = g.calculate_first_follow().unwrap();
        let first = |name: &str| names(&g, &sets.first[&g.get_symbol_index(name).unwrap()]);
        let follow = |name: &str| names(&g, &sets.follow[&g.get_symbol_index(name).unwrap()]);

        assert_eq!(first("F"), set(&["(", "id"]));
        assert_eq!(first("T"), set(&["(", "id"]));
        assert_eq!(first("E"), set(&["(", "id"]));
        assert_eq!(first("E'"), set(&["+", "ε"]));
        assert_eq!(first("T'"), set(&["*", "ε"]));

        assert_eq!(follow("E"), set(&[")", "#"]));
        assert_eq!(follow("E'"), set(&[")", "#"]));
        assert_eq!(follow("T"), set(&["+", ")", "#"]));
        assert_eq!(follow("T'"), set(&["+", ")", "#"]));
        assert_eq!(follow("F"), set(&["*", "+", ")", "#"]));
    }

    #[test]
    fn expression_grammar_report() {
        let g = Grammar::parse(EXPRESSION).unwrap();
        let sets = g.calculate_first_follow().unwrap();
        let report = g.to_non_terminal_output_vec(&sets).to_plaintext();
        assert_eq!(
            report,
            "FIRST Sets:
FIRST(E) = { (, id }
FIRST(T) = { (, id }
FIRST(E') = { +, ε }
FIRST(F) = { (, id }
FIRST(T') = { *, ε }

FOLLOW Sets:
FOLLOW(E) = { #, ) }
FOLLOW(T) = { #, ), + }
FOLLOW(E') = { #, ) }
FOLLOW(F) = { #, ), *, + }
FOLLOW(T') = { #, ), + }"
        );
    }

    #[test]
    fn empty_alternative_is_nullable() {
        let g = Grammar::parse("S → A b\nA → a |").unwrap();
        let sets = g.calculate_first_follow().unwrap();
        let a = g.get_symbol_index("A").unwrap();
        assert!(sets.nullable(a));
        assert!(sets.first[&a].contains(&EPSILON_INDEX));
        assert!(!sets.follow[&a].contains(&EPSILON_INDEX));
    }

    #[test]
    fn start_follow_has_end_mark() {
        let g = Grammar::parse("S → a S | b").unwrap();
        let sets = g.calculate_first_follow().unwrap();
        let s = g.start_symbol().unwrap();
        assert_eq!(sets.follow[&s], HashSet::from([END_MARK_INDEX]));
    }

    #[test]
    fn terminal_first() {
        let g = Grammar::parse(EXPRESSION).unwrap();
        let mut state = SolverState::new(&g);
        let id = g.get_symbol_index("id").unwrap();
        assert_eq!(state.first(id).unwrap(), HashSet::from([id]));
        assert_eq!(
            state.first(EPSILON_INDEX).unwrap(),
            HashSet::from([EPSILON_INDEX])
        );
        assert_eq!(
            state.follow(id),
            Err(GrammarError::NotANonTerminal("id".to_string()))
        );
    }

    #[test]
    fn out_of_range_index() {
        let g = Grammar::parse(EXPRESSION).unwrap();
        let mut state = SolverState::new(&g);
        assert_eq!(state.first(999), Err(GrammarError::UnknownSymbol(999)));
        assert_eq!(state.follow(999), Err(GrammarError::UnknownSymbol(999)));
        let id = g.get_symbol_index("id").unwrap();
        assert_eq!(
            state.first_of_sequence(&[id, 999]),
            Err(GrammarError::UnknownSymbol(999))
        );
    }

    #[test]
    fn empty_grammar() {
        let g = Grammar::parse("").unwrap();
        let sets = g.calculate_first_follow().unwrap();
        assert!(sets.first.is_empty());
        assert!(sets.follow.is_empty());
        assert_eq!(
            g.to_non_terminal_output_vec(&sets).to_plaintext(),
            "FIRST Sets:\n\nFOLLOW Sets:"
        );
    }

    #[test]
    fn undefined_non_terminal() {
        let g = Grammar::parse("S → A b").unwrap();
        assert_eq!(
            g.calculate_first_follow(),
            Err(GrammarError::UndefinedNonTerminal("A".to_string()))
        );

        let a = g.get_symbol_index("A").unwrap();
        let mut state = SolverState::new(&g);
        assert!(state.first(a).is_err());
        assert!(state.follow(a).is_err());
    }

    #[test]
    fn non_terminating() {
        let g = Grammar::parse("S → A | s\nA → A a\nB → C\nC → B").unwrap();
        assert_eq!(
            g.calculate_first_follow(),
            Err(GrammarError::NonTerminating(vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string()
            ]))
        );
    }

    #[test]
    fn self_recursive_tail() {
        // A appears last in its own alternative
        let g = Grammar::parse("S → A c\nA → a A |").unwrap();
        let sets = g.calculate_first_follow().unwrap();
        let a = g.get_symbol_index("A").unwrap();
        assert_eq!(names(&g, &sets.follow[&a]), set(&["c"]));
    }

    #[test]
    fn json_output() {
        let json = crate::first_follow_to_json("S → a S |");
        assert_eq!(
            json,
            r##"{"data":[{"name":"S","nullable":true,"first":["a","ε"],"follow":["#"]}]}"##
        );

        let g = Grammar::parse("S → a").unwrap();
        let sets = g.calculate_first_follow().unwrap();
        assert_eq!(
            g.to_non_terminal_output_vec(&sets).to_json().unwrap(),
            r##"{"data":[{"name":"S","nullable":false,"first":["a"],"follow":["#"]}]}"##
        );

        let json = crate::first_follow_to_json("S a");
        assert_eq!(json, r#"{"error":"Line 1: missing production separator"}"#);
    }
}
