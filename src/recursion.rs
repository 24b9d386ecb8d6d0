//! Immediate left recursion removal.
//!
//! ```text
//!   A -> A α | β      becomes      A  -> β A'
//!                                  A' -> α A' | λ
//! ```
//!
//! Recursion going through another nonterminal (`A -> B x`, `B -> A y`) is
//! not detected.

use crate::grammar::{Grammar, Production};
use crate::symbol::disambiguate;
use alloc::string::String;
use alloc::vec::Vec;

/// Declared nonterminals with at least one `A -> A ...` production, in
/// declaration order.
pub fn left_recursive(grammar: &Grammar) -> Vec<String> {
    grammar
        .non_terminals
        .iter()
        .filter(|nt| {
            grammar
                .productions_of(nt)
                .any(Production::is_left_recursive)
        })
        .cloned()
        .collect()
}

impl Grammar {
    /// Removes immediate left recursion from every nonterminal that has it.
    ///
    /// Returns the synthetic nonterminals that were introduced.
    pub fn remove_left_recursion(&mut self, epsilon: &str) -> Vec<String> {
        let targets = left_recursive(self);
        let mut taken = self.taken_names();
        let mut introduced = Vec::with_capacity(targets.len());

        for target in targets {
            let name = disambiguate(&taken, &target);
            taken.insert(name.clone());

            let productions = core::mem::take(&mut self.productions);
            self.productions = productions
                .into_iter()
                .map(|mut p| {
                    if p.left != target {
                        return p;
                    }
                    if p.is_left_recursive() {
                        // `A -> A` turns into `A' -> A'`, FIRST reports it as a cycle
                        p.right.remove(0);
                        p.right.push(name.clone());
                        p.left = name.clone();
                    } else if !(p.right.len() == 1 && p.right[0] == epsilon) {
                        p.right.push(name.clone());
                    }
                    p
                })
                .collect();

            log::debug!("removed left recursion on `{target}` through `{name}`");
            self.non_terminals.push(name.clone());
            self.productions
                .push(Production::new(name.clone(), [String::from(epsilon)]));
            introduced.push(name);
        }

        introduced
    }
}

#[cfg(test)]
mod tests {
    use super::left_recursive;
    use crate::grammar::{Grammar, Production};
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    fn rule(left: &str, right: &[&str]) -> Production {
        Production::new(left, right.iter().copied())
    }

    fn rendered(g: &Grammar) -> Vec<String> {
        g.productions.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn direct_recursion() {
        let mut g = Grammar::new(
            "A",
            ["a", "b"],
            ["A"],
            [rule("A", &["A", "a"]), rule("A", &["b"])],
        );
        assert_eq!(left_recursive(&g), ["A"]);

        let introduced = g.remove_left_recursion("λ");
        assert_eq!(introduced, ["A'"]);
        assert_eq!(g.non_terminals, ["A", "A'"]);
        assert_eq!(rendered(&g), ["A' -> a A'", "A -> b A'", "A' -> λ"]);
        assert!(left_recursive(&g).is_empty());
    }

    #[test]
    fn expression_grammar() {
        //   E -> E + T | T
        //   T -> T * F | F
        //   F -> ( E ) | id
        let mut g = Grammar::new(
            "E",
            ["+", "*", "(", ")", "id"],
            ["E", "T", "F"],
            [
                rule("E", &["E", "+", "T"]),
                rule("E", &["T"]),
                rule("T", &["T", "*", "F"]),
                rule("T", &["F"]),
                rule("F", &["(", "E", ")"]),
                rule("F", &["id"]),
            ],
        );
        g.remove_left_recursion("λ");

        assert_eq!(g.non_terminals, ["E", "T", "F", "E'", "T'"]);
        assert_eq!(
            rendered(&g),
            [
                "E' -> + T E'",
                "E -> T E'",
                "T' -> * F T'",
                "T -> F T'",
                "F -> ( E )",
                "F -> id",
                "E' -> λ",
                "T' -> λ",
            ]
        );
        for p in &g.productions {
            assert!(!p.is_left_recursive(), "{p} is still left recursive");
        }
    }

    #[test]
    fn epsilon_alternative_is_not_extended() {
        let mut g = Grammar::new(
            "A",
            ["a", "b"],
            ["A"],
            [rule("A", &["A", "a"]), rule("A", &["λ"]), rule("A", &["b"])],
        );
        g.remove_left_recursion("λ");
        assert_eq!(
            rendered(&g),
            ["A' -> a A'", "A -> λ", "A -> b A'", "A' -> λ"]
        );
    }

    #[test]
    fn several_recursive_alternatives_share_one_name() {
        let mut g = Grammar::new(
            "A",
            ["a", "b", "c"],
            ["A"],
            [
                rule("A", &["A", "a"]),
                rule("A", &["A", "b"]),
                rule("A", &["c"]),
            ],
        );
        g.remove_left_recursion("λ");
        assert_eq!(g.non_terminals, ["A", "A'"]);
        assert_eq!(
            rendered(&g),
            ["A' -> a A'", "A' -> b A'", "A -> c A'", "A' -> λ"]
        );
    }

    #[test]
    fn self_loop_is_rewritten_like_any_recursion() {
        let mut g = Grammar::new(
            "A",
            ["b"],
            ["A"],
            [rule("A", &["A"]), rule("A", &["b"])],
        );
        g.remove_left_recursion("λ");
        assert_eq!(rendered(&g), ["A' -> A'", "A -> b A'", "A' -> λ"]);
    }

    #[test]
    fn indirect_recursion_is_untouched() {
        let mut g = Grammar::new(
            "A",
            ["x", "y"],
            ["A", "B"],
            [rule("A", &["B", "x"]), rule("B", &["A", "y"])],
        );
        let before = g.clone();
        assert!(g.remove_left_recursion("λ").is_empty());
        assert_eq!(g, before);
    }
}
