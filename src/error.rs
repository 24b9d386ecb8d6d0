use alloc::string::String;
use thiserror::Error;

/// The grammar handed to the pipeline breaks a precondition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("production #{index} of `{left}` has an empty right-hand side")]
    EmptyProduction { index: usize, left: String },
    #[error("nonterminal `{0}` is declared more than once")]
    DuplicateNonTerminal(String),
}

/// FIRST or FOLLOW recursed past the depth cap.
///
/// The cap stands in for real cycle detection, so a deep enough acyclic
/// grammar lands here as well.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("recursion on `{symbol}` exceeded depth {depth}")]
pub struct CycleDetected {
    pub symbol: String,
    pub depth: usize,
}
