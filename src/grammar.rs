use crate::check::Verdict;
use crate::error::GrammarError;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::{DefaultHashBuilder, HashSet};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};

/// Insertion ordered set of symbol names
pub type SymbolSet = IndexSet<String, DefaultHashBuilder>;
/// nonterminal -> FIRST or FOLLOW set
pub type SetMap = IndexMap<String, SymbolSet, DefaultHashBuilder>;
/// nonterminal -> one lookahead set per production, in production order
pub type PredictionMap = IndexMap<String, Vec<SymbolSet>, DefaultHashBuilder>;

/// A single rule `left -> right`.
///
/// `right` is never empty once the grammar passed [`Grammar::validate`];
/// the empty string is spelled with the epsilon marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Production {
    #[serde(alias = "left")]
    pub left: String,
    #[serde(alias = "right")]
    pub right: Vec<String>,
}

impl Production {
    pub fn new<S: Into<String>>(left: impl Into<String>, right: impl IntoIterator<Item = S>) -> Self {
        Self {
            left: left.into(),
            right: right.into_iter().map(Into::into).collect(),
        }
    }

    /// first symbol of the right-hand side
    pub fn head(&self) -> Option<&str> {
        self.right.first().map(String::as_str)
    }

    /// true for `A -> A ...`
    pub fn is_left_recursive(&self) -> bool {
        self.head() == Some(self.left.as_str())
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        for sym in &self.right {
            write!(f, " {sym}")?;
        }
        Ok(())
    }
}

/// The grammar together with everything the analysis derives from it.
///
/// The rewriting passes extend `non_terminals` and `productions`; the
/// analysis fills `firsts`, `follows`, `prediction_set` and `is_ll1`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grammar {
    #[serde(alias = "initial")]
    pub initial: String,

    /// declared terminals, only carried along for display
    #[serde(default, deserialize_with = "nullable", alias = "terminals")]
    pub terminals: Vec<String>,

    #[serde(
        default,
        deserialize_with = "nullable",
        alias = "nonTerminals",
        alias = "non_terminals"
    )]
    pub non_terminals: Vec<String>,

    #[serde(default, deserialize_with = "nullable", alias = "productions")]
    pub productions: Vec<Production>,

    /// FIRST(A), contains the epsilon marker iff some derivation of A starts with it
    #[serde(default, deserialize_with = "nullable", alias = "firsts")]
    pub firsts: SetMap,

    /// FOLLOW(A), contains the end marker for the start symbol
    #[serde(default, deserialize_with = "nullable", alias = "follows")]
    pub follows: SetMap,

    #[serde(
        default,
        deserialize_with = "nullable",
        alias = "predictionSet",
        alias = "prediction_set"
    )]
    pub prediction_set: PredictionMap,

    #[serde(
        rename = "IsLL1",
        alias = "isLL1",
        alias = "is_ll1",
        default,
        deserialize_with = "crate::check::deserialize_verdict"
    )]
    pub is_ll1: Option<Verdict>,
}

/// `null` reads as an empty collection
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Grammar {
    pub fn new(
        initial: impl Into<String>,
        terminals: impl IntoIterator<Item = impl Into<String>>,
        non_terminals: impl IntoIterator<Item = impl Into<String>>,
        productions: impl IntoIterator<Item = Production>,
    ) -> Self {
        Self {
            initial: initial.into(),
            terminals: terminals.into_iter().map(Into::into).collect(),
            non_terminals: non_terminals.into_iter().map(Into::into).collect(),
            productions: productions.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &[String] {
        &self.non_terminals
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn firsts(&self) -> &SetMap {
        &self.firsts
    }

    pub fn follows(&self) -> &SetMap {
        &self.follows
    }

    pub fn prediction_set(&self) -> &PredictionMap {
        &self.prediction_set
    }

    /// `None` until the grammar went through [`Grammar::analyze`]
    pub fn verdict(&self) -> Option<&Verdict> {
        self.is_ll1.as_ref()
    }

    /// productions with `left` as their left-hand side, in order
    pub fn productions_of<'a>(&'a self, left: &'a str) -> impl Iterator<Item = &'a Production> + 'a {
        self.productions.iter().filter(move |p| p.left == left)
    }

    /// Checks the preconditions every pipeline stage relies on.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if let Some((index, p)) = self
            .productions
            .iter()
            .enumerate()
            .find(|(_, p)| p.right.is_empty())
        {
            return Err(GrammarError::EmptyProduction {
                index,
                left: p.left.clone(),
            });
        }

        let mut seen = HashSet::new();
        for nt in &self.non_terminals {
            if !seen.insert(nt.as_str()) {
                return Err(GrammarError::DuplicateNonTerminal(nt.clone()));
            }
        }

        if !self.initial.is_empty() && !seen.contains(self.initial.as_str()) {
            log::warn!(
                "start symbol `{}` is not a declared nonterminal",
                self.initial
            );
        }
        Ok(())
    }

    /// names a synthetic nonterminal must not collide with
    pub(crate) fn taken_names(&self) -> HashSet<String> {
        self.productions
            .iter()
            .map(|p| p.left.clone())
            .chain(self.non_terminals.iter().cloned())
            .collect()
    }

    /// Drops every derived field.
    pub fn flush(&mut self) {
        self.firsts.clear();
        self.follows.clear();
        self.prediction_set.clear();
        self.is_ll1 = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{Grammar, Production};
    use crate::error::GrammarError;
    use alloc::string::ToString;
    use alloc::vec::Vec;

    #[test]
    fn display_production() {
        let p = Production::new("E", ["T", "E'"]);
        assert_eq!(p.to_string(), "E -> T E'");
        assert_eq!(p.head(), Some("T"));
        assert!(!p.is_left_recursive());
        assert!(Production::new("E", ["E", "+", "T"]).is_left_recursive());
    }

    #[test]
    fn validate_rejects_empty_rhs() {
        let g = Grammar::new(
            "S",
            ["a"],
            ["S"],
            [
                Production::new("S", ["a"]),
                Production::new("S", Vec::<&str>::new()),
            ],
        );
        assert_eq!(
            g.validate(),
            Err(GrammarError::EmptyProduction {
                index: 1,
                left: "S".into()
            })
        );
    }

    #[test]
    fn validate_rejects_duplicate_nonterminals() {
        let g = Grammar::new("S", ["a"], ["S", "A", "S"], [Production::new("S", ["a"])]);
        assert_eq!(
            g.validate(),
            Err(GrammarError::DuplicateNonTerminal("S".into()))
        );
    }

    #[test]
    fn taken_names_include_declared_nonterminals() {
        // B is declared but has no production of its own
        let g = Grammar::new(
            "S",
            ["a"],
            ["S", "B"],
            [Production::new("S", ["a"]), Production::new("C", ["a"])],
        );
        let taken = g.taken_names();
        assert_eq!(taken.len(), 3);
        for name in ["S", "B", "C"] {
            assert!(taken.contains(name), "{name} missing");
        }
    }

    #[test]
    fn productions_of_keeps_order() {
        let g = Grammar::new(
            "S",
            ["a", "b"],
            ["S", "A"],
            [
                Production::new("S", ["a"]),
                Production::new("A", ["b"]),
                Production::new("S", ["A"]),
            ],
        );
        let rhs: Vec<_> = g.productions_of("S").map(|p| p.right.clone()).collect();
        assert_eq!(rhs, [["a"], ["A"]]);
    }
}
