//! LL(1) suitability checker for context free grammars.
//!
//! A [`Grammar`] goes through one linear pipeline:
//!
//! ```text
//!   validate → left factoring → left recursion removal
//!            → FIRST → FOLLOW → prediction sets → verdict
//! ```
//!
//! The rewriting passes extend the grammar in place with synthetic
//! nonterminals (`A'`, `A''`, ...). The analysis passes fill
//! [`Grammar::firsts`], [`Grammar::follows`], [`Grammar::prediction_set`] and
//! [`Grammar::is_ll1`]. If FIRST or FOLLOW recurse past
//! [`AnalyzerConfig::max_depth`] the grammar is considered cyclic: the
//! derived fields are cleared and the verdict becomes [`Verdict::Cycle`].
//!
//! ```rust
//! use ll1_check::{AnalyzerConfig, Grammar, Production, Stage};
//!
//! //   A -> A a | b
//! let mut g = Grammar::new(
//!     "A",
//!     ["a", "b"],
//!     ["A"],
//!     [Production::new("A", ["A", "a"]), Production::new("A", ["b"])],
//! );
//!
//! let stage = g.analyze(&AnalyzerConfig::default()).unwrap();
//! assert_eq!(stage, Stage::Classified);
//! assert!(g.verdict().unwrap().is_ll1());
//! assert_eq!(g.non_terminals(), ["A", "A'"]);
//! ```
#![cfg_attr(not(test), no_std)]
extern crate alloc;

pub mod check;
pub mod config;
pub mod error;
pub mod factor;
pub mod first;
pub mod follow;
pub mod grammar;
pub mod recursion;
pub mod report;
pub mod symbol;

pub use check::{Conflict, Verdict};
pub use config::AnalyzerConfig;
pub use error::{CycleDetected, GrammarError};
pub use grammar::{Grammar, Production, SymbolSet};
pub use report::Report;

use check::PredictionCalculator;
use core::fmt;
use first::FirstCalculator;
use follow::FollowCalculator;
use symbol::Classifier;

/// Where the pipeline is, or where it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Raw,
    Factored,
    RecursionFree,
    FirstsDone,
    FollowsDone,
    PredictionDone,
    Classified,
    CycleError,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Raw => "raw",
            Stage::Factored => "factored",
            Stage::RecursionFree => "recursion free",
            Stage::FirstsDone => "FIRST done",
            Stage::FollowsDone => "FOLLOW done",
            Stage::PredictionDone => "prediction done",
            Stage::Classified => "classified",
            Stage::CycleError => "cycle error",
        };
        f.write_str(name)
    }
}

/// Runs the whole pipeline on an owned grammar and hands it back.
pub fn analyze(mut grammar: Grammar, config: &AnalyzerConfig) -> Result<Grammar, GrammarError> {
    grammar.analyze(config)?;
    Ok(grammar)
}

impl Grammar {
    /// Runs the whole pipeline in place.
    ///
    /// Returns [`Stage::Classified`] or [`Stage::CycleError`]; a cycle is not
    /// an error, it is recorded in the verdict. Only a malformed grammar is
    /// rejected, before anything is touched.
    pub fn analyze(&mut self, config: &AnalyzerConfig) -> Result<Stage, GrammarError> {
        self.validate()?;
        self.flush();
        let mut stage = Stage::Raw;

        let factored = self.left_factor(&config.epsilon);
        advance(&mut stage, Stage::Factored);
        log::debug!("left factoring introduced {factored:?}");

        let recursion = self.remove_left_recursion(&config.epsilon);
        advance(&mut stage, Stage::RecursionFree);
        log::debug!("left recursion removal introduced {recursion:?}");

        match self.calculate_sets(config, &mut stage) {
            Ok(()) => {
                if let Some(verdict) = &self.is_ll1 {
                    log::info!("{verdict}");
                }
                Ok(stage)
            }
            Err(cycle) => {
                log::warn!("{cycle}, after stage `{stage}`");
                self.flush();
                self.is_ll1 = Some(Verdict::Cycle);
                advance(&mut stage, Stage::CycleError);
                Ok(stage)
            }
        }
    }

    /// FIRST, FOLLOW, prediction sets and the verdict, all or nothing.
    fn calculate_sets(&mut self, config: &AnalyzerConfig, stage: &mut Stage) -> Result<(), CycleDetected> {
        let classifier = Classifier::new(&self.non_terminals, &config.epsilon);

        let firsts = FirstCalculator::new(&self.productions, &classifier, config.max_depth)
            .calculate(&self.non_terminals)?;
        advance(stage, Stage::FirstsDone);

        let follows = FollowCalculator::new(
            &self.productions,
            &classifier,
            &firsts,
            &self.initial,
            &config.end_marker,
            config.max_depth,
        )
        .calculate(&self.non_terminals)?;
        advance(stage, Stage::FollowsDone);

        let prediction_set =
            PredictionCalculator::new(&classifier, &firsts, &follows).calculate(&self.productions);
        advance(stage, Stage::PredictionDone);

        let conflicts = check::find_conflicts(&self.non_terminals, &prediction_set);
        for c in &conflicts {
            log::debug!("`{}` predicts `{}` more than once", c.non_terminal, c.symbol);
        }
        let verdict = check::classify(&conflicts);
        advance(stage, Stage::Classified);

        self.firsts = firsts;
        self.follows = follows;
        self.prediction_set = prediction_set;
        self.is_ll1 = Some(verdict);
        Ok(())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    log::debug!("pipeline: {stage} -> {next}");
    *stage = next;
}
