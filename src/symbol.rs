use alloc::string::String;
use hashbrown::HashSet;

/// Which side of the grammar a symbol name falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

/// Decides terminal vs nonterminal for symbol names.
///
/// A name is a nonterminal iff it is declared in `nonTerminals`. Everything
/// else, the epsilon marker and misspelled names included, counts as a
/// terminal; the declared terminal list is never looked at.
#[derive(Debug, Clone)]
pub struct Classifier<'g> {
    non_terminals: HashSet<&'g str>,
    epsilon: &'g str,
}

impl<'g> Classifier<'g> {
    pub fn new(non_terminals: &'g [String], epsilon: &'g str) -> Self {
        Self {
            non_terminals: non_terminals.iter().map(String::as_str).collect(),
            epsilon,
        }
    }

    #[inline(always)]
    pub fn kind(&self, symbol: &str) -> SymbolKind {
        if self.non_terminals.contains(symbol) {
            SymbolKind::NonTerminal
        } else {
            SymbolKind::Terminal
        }
    }

    #[inline(always)]
    pub fn is_epsilon(&self, symbol: &str) -> bool {
        symbol == self.epsilon
    }

    pub fn epsilon(&self) -> &'g str {
        self.epsilon
    }
}

/// Builds a fresh nonterminal name from `base` by appending `'` until the
/// result is not in `taken`.
///
/// Callers pass the production left sides together with the declared
/// nonterminals, so a name that is declared but has no production yet is
/// never reused either.
pub fn disambiguate(taken: &HashSet<String>, base: &str) -> String {
    let mut name = String::with_capacity(base.len() + 1);
    name.push_str(base);
    name.push('\'');
    while taken.contains(name.as_str()) {
        name.push('\'');
    }
    name
}
