//! Left factoring: alternatives of one nonterminal that start with the same
//! symbol are merged behind their common prefix.
//!
//! ```text
//!   A -> a b c | a b d | e      becomes      A  -> e | a b A'
//!                                            A' -> c | d
//! ```
//!
//! Only one round is applied. Sharing that shows up again among the new
//! suffixes is left as is.

use crate::grammar::{Grammar, Production};
use crate::symbol::disambiguate;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::{DefaultHashBuilder, HashSet};
use indexmap::IndexMap;

/// length of the shared prefix of two right-hand sides
pub fn common_prefix(a: &[String], b: &[String]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Indices of productions sharing `(left, right[0])`, for every pair that
/// occurs at least twice. Groups come out in order of first appearance.
pub fn factoring_groups(grammar: &Grammar) -> Vec<Vec<usize>> {
    let declared: HashSet<&str> = grammar.non_terminals.iter().map(String::as_str).collect();

    let mut groups: IndexMap<(&str, &str), Vec<usize>, DefaultHashBuilder> = IndexMap::default();
    for (i, p) in grammar.productions.iter().enumerate() {
        if !declared.contains(p.left.as_str()) {
            continue;
        }
        let Some(head) = p.head() else {
            continue;
        };
        groups.entry((p.left.as_str(), head)).or_default().push(i);
    }

    groups.into_values().filter(|g| g.len() > 1).collect()
}

impl Grammar {
    /// Runs one round of left factoring over the whole grammar.
    ///
    /// Returns the synthetic nonterminals that were introduced.
    pub fn left_factor(&mut self, epsilon: &str) -> Vec<String> {
        let groups = factoring_groups(self);
        if groups.is_empty() {
            return Vec::new();
        }

        let mut taken = self.taken_names();
        let mut consumed = alloc::vec![false; self.productions.len()];
        let mut appended = Vec::new();
        let mut introduced = Vec::new();

        for group in groups {
            let base = &self.productions[group[0]];
            let prefix_len = group[1..]
                .iter()
                .map(|&i| common_prefix(&base.right, &self.productions[i].right))
                .min()
                .unwrap_or(base.right.len());

            let name = disambiguate(&taken, &base.left);
            taken.insert(name.clone());

            let mut right: Vec<String> = base.right[..prefix_len].to_vec();
            right.push(name.clone());
            let factored = Production {
                left: base.left.clone(),
                right,
            };
            log::debug!("left factoring {} alternatives into `{}`", group.len(), factored);
            appended.push(factored);

            for &i in &group {
                let suffix = &self.productions[i].right[prefix_len..];
                let right = if suffix.is_empty() {
                    alloc::vec![String::from(epsilon)]
                } else {
                    suffix.to_vec()
                };
                appended.push(Production {
                    left: name.clone(),
                    right,
                });
                consumed[i] = true;
            }

            introduced.push(name);
        }

        let kept = core::mem::take(&mut self.productions)
            .into_iter()
            .zip(consumed)
            .filter_map(|(p, gone)| (!gone).then_some(p));
        self.productions = kept.chain(appended).collect();
        self.non_terminals.extend(introduced.iter().cloned());

        introduced
    }
}
