use crate::grammar::{Grammar, SetMap, SymbolSet};
use core::fmt;
use hashbrown::HashMap;

/// Plain-text summary of an analysed grammar.
pub struct Report<'g>(pub &'g Grammar);

struct Braced<'a>(&'a SymbolSet);

impl fmt::Display for Braced<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, sym) in self.0.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{sym}")?;
        }
        f.write_str(" }")
    }
}

fn write_sets(f: &mut fmt::Formatter<'_>, title: &str, sets: &SetMap) -> fmt::Result {
    writeln!(f, "{title}:")?;
    for (nt, set) in sets {
        writeln!(f, "  {nt} = {}", Braced(set))?;
    }
    Ok(())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.0;

        writeln!(f, "Start: {}", g.initial)?;
        writeln!(f, "Productions:")?;
        for p in &g.productions {
            writeln!(f, "  {p}")?;
        }

        write_sets(f, "FIRST", &g.firsts)?;
        write_sets(f, "FOLLOW", &g.follows)?;

        writeln!(f, "Prediction sets:")?;
        let mut nth: HashMap<&str, usize> = HashMap::new();
        for p in &g.productions {
            let i = nth.entry(p.left.as_str()).or_default();
            if let Some(set) = g.prediction_set.get(p.left.as_str()).and_then(|v| v.get(*i)) {
                writeln!(f, "  {p}  {}", Braced(set))?;
            }
            *i += 1;
        }

        match &g.is_ll1 {
            Some(verdict) => write!(f, "Verdict: {verdict}"),
            None => write!(f, "Verdict: not analysed"),
        }
    }
}
