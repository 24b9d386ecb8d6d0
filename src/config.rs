use alloc::string::String;
use serde::Deserialize;

/// reserved name for the empty string
pub const EPSILON: &str = "λ";
/// reserved name for end of input, only ever found in FOLLOW of the start symbol
pub const END_MARKER: &str = "$";
/// how deep FIRST/FOLLOW may recurse before the grammar is declared cyclic
pub const MAX_DEPTH: usize = 1000;

/// Knobs of a single analysis run.
///
/// Every field has a default so a partial config file is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalyzerConfig {
    /// recursion depth cap for FIRST and FOLLOW
    pub max_depth: usize,
    pub epsilon: String,
    pub end_marker: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            epsilon: EPSILON.into(),
            end_marker: END_MARKER.into(),
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_epsilon(mut self, epsilon: impl Into<String>) -> Self {
        self.epsilon = epsilon.into();
        self
    }

    pub fn with_end_marker(mut self, end_marker: impl Into<String>) -> Self {
        self.end_marker = end_marker.into();
        self
    }
}
