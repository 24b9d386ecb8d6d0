use crate::error::CycleDetected;
use crate::grammar::{Production, SetMap, SymbolSet};
use crate::symbol::{Classifier, SymbolKind};
use alloc::string::String;

/// FOLLOW over a fixed set of productions.
///
/// **Dependencies:** needs the complete FIRST map of the same productions.
pub struct FollowCalculator<'g> {
    productions: &'g [Production],
    classifier: &'g Classifier<'g>,
    firsts: &'g SetMap,
    initial: &'g str,
    end_marker: &'g str,
    max_depth: usize,
}

impl<'g> FollowCalculator<'g> {
    pub fn new(
        productions: &'g [Production],
        classifier: &'g Classifier<'g>,
        firsts: &'g SetMap,
        initial: &'g str,
        end_marker: &'g str,
        max_depth: usize,
    ) -> Self {
        Self {
            productions,
            classifier,
            firsts,
            initial,
            end_marker,
            max_depth,
        }
    }

    /// FOLLOW(`non_terminal`), collected from every place it is used.
    ///
    /// * followed by a terminal: that terminal
    /// * followed by a nonterminal `Y`: FIRST(`Y`) without epsilon, plus
    ///   FOLLOW(`Y`) when `Y` is nullable
    /// * at the end of `A -> ... X`: FOLLOW(`A`) unless `A` is `X` itself
    ///
    /// The epsilon marker is never part of the result.
    pub fn follow(&self, non_terminal: &str, depth: usize) -> Result<SymbolSet, CycleDetected> {
        if depth > self.max_depth {
            return Err(CycleDetected {
                symbol: non_terminal.into(),
                depth,
            });
        }

        let mut set = SymbolSet::default();
        if non_terminal == self.initial {
            set.insert(String::from(self.end_marker));
        }

        for p in self.productions {
            for (i, sym) in p.right.iter().enumerate() {
                if sym != non_terminal {
                    continue;
                }

                let Some(next) = p.right.get(i + 1) else {
                    if p.left != non_terminal {
                        set.extend(self.follow(&p.left, depth + 1)?);
                    }
                    continue;
                };

                match self.classifier.kind(next) {
                    SymbolKind::Terminal => {
                        if !self.classifier.is_epsilon(next) {
                            set.insert(next.clone());
                        }
                    }
                    SymbolKind::NonTerminal => {
                        let Some(first) = self.firsts.get(next.as_str()) else {
                            continue;
                        };
                        for x in first {
                            if self.classifier.is_epsilon(x) {
                                set.extend(self.follow(next, depth + 1)?);
                            } else {
                                set.insert(x.clone());
                            }
                        }
                    }
                }
            }
        }

        Ok(set)
    }

    /// FOLLOW for every entry of `non_terminals`, keyed in the same order
    pub fn calculate(&self, non_terminals: &[String]) -> Result<SetMap, CycleDetected> {
        non_terminals
            .iter()
            .map(|nt| Ok::<_, CycleDetected>((nt.clone(), self.follow(nt, 0)?)))
            .collect()
    }
}
