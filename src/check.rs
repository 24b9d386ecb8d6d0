//! check.rs – prediction sets and the LL(1) verdict
//!
//! Every production gets a *prediction set*: the lookahead symbols that make
//! a top-down parser pick it.
//!
//! * `A -> λ`         → FOLLOW(A)
//! * `A -> a ...`     → { a }
//! * `A -> B ...`     → FIRST(B), with λ swapped for FOLLOW(A)
//!
//! The grammar is LL(1) iff the prediction sets of the alternatives of each
//! nonterminal are pairwise disjoint. Only the head of a production is
//! consulted, mirroring how FIRST is computed.
//!
//! **Dependencies:** both FIRST and FOLLOW must be complete.

use crate::grammar::{PredictionMap, Production, SetMap, SymbolSet};
use crate::symbol::{Classifier, SymbolKind};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::iter;
use core::str::FromStr;
use either::Either;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const LL1_MESSAGE: &str = "It's LL1";
const CYCLE_MESSAGE: &str = "Not LL1, There is a cycle in the symbols";
const CONFLICT_PREFIX: &str = "Is false because ";
const CONFLICT_SEEN: &str = " already exists in [";
const CONFLICT_FOR: &str = "] for ";

/// Two alternatives of `non_terminal` both predict `symbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub non_terminal: String,
    pub symbol: String,
    /// lookahead symbols merged so far when the clash showed up
    pub seen: Vec<String>,
}

/// Outcome of the analysis, stored in `IsLL1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ll1,
    Conflict(Conflict),
    /// FIRST or FOLLOW ran into the depth cap
    Cycle,
}

impl Verdict {
    pub fn is_ll1(&self) -> bool {
        matches!(self, Verdict::Ll1)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ll1 => f.write_str(LL1_MESSAGE),
            Verdict::Cycle => f.write_str(CYCLE_MESSAGE),
            Verdict::Conflict(c) => {
                write!(f, "{CONFLICT_PREFIX}{}{CONFLICT_SEEN}", c.symbol)?;
                for (i, s) in c.seen.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(s)?;
                }
                write!(f, "{CONFLICT_FOR}{}", c.non_terminal)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised LL(1) verdict `{0}`")]
pub struct ParseVerdictError(pub String);

impl FromStr for Verdict {
    type Err = ParseVerdictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LL1_MESSAGE => return Ok(Verdict::Ll1),
            CYCLE_MESSAGE => return Ok(Verdict::Cycle),
            _ => {}
        }

        let err = || ParseVerdictError(s.to_string());
        let rest = s.strip_prefix(CONFLICT_PREFIX).ok_or_else(err)?;
        let (symbol, rest) = rest.split_once(CONFLICT_SEEN).ok_or_else(err)?;
        let (seen, non_terminal) = rest.rsplit_once(CONFLICT_FOR).ok_or_else(err)?;

        Ok(Verdict::Conflict(Conflict {
            non_terminal: non_terminal.to_string(),
            symbol: symbol.to_string(),
            seen: seen.split_whitespace().map(ToString::to_string).collect(),
        }))
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Reads `IsLL1` from input. The pipeline recomputes it, so `null`, `""`
/// and text that is not a known verdict all mean "not analysed yet".
pub(crate) fn deserialize_verdict<'de, D>(deserializer: D) -> Result<Option<Verdict>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if text.is_empty() {
        return Ok(None);
    }
    match text.parse() {
        Ok(verdict) => Ok(Some(verdict)),
        Err(err) => {
            log::warn!("ignoring IsLL1: {err}");
            Ok(None)
        }
    }
}

/// Prediction sets over a fixed set of productions.
pub struct PredictionCalculator<'g> {
    classifier: &'g Classifier<'g>,
    firsts: &'g SetMap,
    follows: &'g SetMap,
}

impl<'g> PredictionCalculator<'g> {
    pub fn new(classifier: &'g Classifier<'g>, firsts: &'g SetMap, follows: &'g SetMap) -> Self {
        Self {
            classifier,
            firsts,
            follows,
        }
    }

    fn follow_of(&self, non_terminal: &str) -> impl Iterator<Item = &'g String> + use<'g> {
        let follows: &'g SetMap = self.follows;
        follows.get(non_terminal).into_iter().flatten()
    }

    /// Lookahead set selecting `production`; never contains the epsilon marker.
    pub fn prediction(&self, production: &Production) -> SymbolSet {
        let Some(head) = production.head() else {
            return SymbolSet::default();
        };

        match self.classifier.kind(head) {
            SymbolKind::Terminal if self.classifier.is_epsilon(head) => {
                self.follow_of(&production.left).cloned().collect()
            }
            SymbolKind::Terminal => iter::once(String::from(head)).collect(),
            SymbolKind::NonTerminal => self
                .firsts
                .get(head)
                .into_iter()
                .flatten()
                .flat_map(|sym| {
                    if self.classifier.is_epsilon(sym) {
                        Either::Left(self.follow_of(&production.left))
                    } else {
                        Either::Right(iter::once(sym))
                    }
                })
                .cloned()
                .collect(),
        }
    }

    /// One entry per production, grouped by left-hand side in the order the
    /// left-hand sides first appear.
    pub fn calculate(&self, productions: &[Production]) -> PredictionMap {
        let mut map = PredictionMap::default();
        for p in productions {
            map.entry(p.left.clone())
                .or_default()
                .push(self.prediction(p));
        }
        map
    }
}

/// Merges the prediction sets of each nonterminal in turn and reports the
/// first repeated lookahead per nonterminal.
pub fn find_conflicts(non_terminals: &[String], predictions: &PredictionMap) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for nt in non_terminals {
        let Some(sets) = predictions.get(nt.as_str()) else {
            continue;
        };

        let mut seen = SymbolSet::default();
        let clash = sets.iter().flatten().find(|sym| !seen.insert((*sym).clone()));
        if let Some(symbol) = clash {
            conflicts.push(Conflict {
                non_terminal: nt.clone(),
                symbol: symbol.clone(),
                seen: seen.into_iter().collect(),
            });
        }
    }
    conflicts
}

/// Collapses the conflict list into a verdict. With several conflicts the
/// last one is reported.
pub fn classify(conflicts: &[Conflict]) -> Verdict {
    match conflicts.last() {
        None => Verdict::Ll1,
        Some(c) => Verdict::Conflict(c.clone()),
    }
}
