use crate::error::CycleDetected;
use crate::grammar::{Production, SetMap, SymbolSet};
use crate::symbol::{Classifier, SymbolKind};
use alloc::string::String;

/// FIRST over a fixed set of productions.
///
/// Every call walks the productions again, there is no memoisation besides
/// the final map built by [`FirstCalculator::calculate`]. A grammar whose
/// derivations loop without ever starting with a terminal is caught by the
/// depth cap.
pub struct FirstCalculator<'g> {
    productions: &'g [Production],
    classifier: &'g Classifier<'g>,
    max_depth: usize,
}

impl<'g> FirstCalculator<'g> {
    pub fn new(
        productions: &'g [Production],
        classifier: &'g Classifier<'g>,
        max_depth: usize,
    ) -> Self {
        Self {
            productions,
            classifier,
            max_depth,
        }
    }

    /// FIRST(`non_terminal`). Only the head of each alternative is looked at,
    /// a nullable head does not make the next symbol visible.
    pub fn first(&self, non_terminal: &str, depth: usize) -> Result<SymbolSet, CycleDetected> {
        if depth > self.max_depth {
            return Err(CycleDetected {
                symbol: non_terminal.into(),
                depth,
            });
        }

        let mut set = SymbolSet::default();
        for p in self.productions.iter().filter(|p| p.left == non_terminal) {
            let Some(head) = p.head() else {
                continue;
            };
            match self.classifier.kind(head) {
                SymbolKind::Terminal => {
                    set.insert(String::from(head));
                }
                SymbolKind::NonTerminal => {
                    set.extend(self.first(head, depth + 1)?);
                }
            }
        }
        Ok(set)
    }

    /// FIRST for every entry of `non_terminals`, keyed in the same order
    pub fn calculate(&self, non_terminals: &[String]) -> Result<SetMap, CycleDetected> {
        non_terminals
            .iter()
            .map(|nt| Ok::<_, CycleDetected>((nt.clone(), self.first(nt, 0)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::FirstCalculator;
    use crate::error::CycleDetected;
    use crate::grammar::{Production, SymbolSet};
    use crate::symbol::Classifier;
    use alloc::string::String;
    use alloc::vec::Vec;

    fn rule(left: &str, right: &[&str]) -> Production {
        Production::new(left, right.iter().copied())
    }

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|x| String::from(*x)).collect()
    }

    fn ordered(set: &SymbolSet) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn terminal_heads() {
        let nts = names(&["S"]);
        let prods = [rule("S", &["a", "S"]), rule("S", &["b"])];
        let c = Classifier::new(&nts, "λ");
        let calc = FirstCalculator::new(&prods, &c, 1000);

        assert_eq!(ordered(&calc.first("S", 0).unwrap()), ["a", "b"]);
    }

    #[test]
    fn nonterminal_heads_chain() {
        //   A -> B | x
        //   B -> C | λ
        //   C -> c
        let nts = names(&["A", "B", "C"]);
        let prods = [
            rule("A", &["B"]),
            rule("A", &["x"]),
            rule("B", &["C"]),
            rule("B", &["λ"]),
            rule("C", &["c"]),
        ];
        let c = Classifier::new(&nts, "λ");
        let calc = FirstCalculator::new(&prods, &c, 1000);
        let firsts = calc.calculate(&nts).unwrap();

        assert_eq!(ordered(&firsts["A"]), ["c", "λ", "x"]);
        assert_eq!(ordered(&firsts["B"]), ["c", "λ"]);
        assert_eq!(ordered(&firsts["C"]), ["c"]);
        assert_eq!(firsts.keys().collect::<Vec<_>>(), ["A", "B", "C"]);
    }

    #[test]
    fn undeclared_head_counts_as_terminal() {
        let nts = names(&["S"]);
        let prods = [rule("S", &["Typo", "x"])];
        let c = Classifier::new(&nts, "λ");
        let calc = FirstCalculator::new(&prods, &c, 1000);

        assert_eq!(ordered(&calc.first("S", 0).unwrap()), ["Typo"]);
    }

    #[test]
    fn cycle_hits_the_cap() {
        let nts = names(&["X", "Y"]);
        let prods = [rule("X", &["Y"]), rule("Y", &["X"])];
        let c = Classifier::new(&nts, "λ");
        let calc = FirstCalculator::new(&prods, &c, 1000);

        // X sits on even depths, Y on odd ones
        let err = calc.calculate(&nts).unwrap_err();
        assert_eq!(
            err,
            CycleDetected {
                symbol: "Y".into(),
                depth: 1001
            }
        );
    }

    #[test]
    fn cap_is_a_depth_bound() {
        // a chain of 5 nonterminals needs depth 4
        let nts = names(&["N0", "N1", "N2", "N3", "N4"]);
        let prods = [
            rule("N0", &["N1"]),
            rule("N1", &["N2"]),
            rule("N2", &["N3"]),
            rule("N3", &["N4"]),
            rule("N4", &["z"]),
        ];
        let c = Classifier::new(&nts, "λ");

        assert!(FirstCalculator::new(&prods, &c, 4).first("N0", 0).is_ok());
        assert!(FirstCalculator::new(&prods, &c, 3).first("N0", 0).is_err());
    }
}
