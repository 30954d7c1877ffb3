//! Error types for fitness evaluation

/// Failure reported by a match engine for a single contest
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("match engine failed: {0}")]
    Failed(String),

    #[error("outcome {outcome} outside contract bounds [{min}, {max}]")]
    OutOfContract { outcome: i32, min: i32, max: i32 },
}

/// Error types for scoring a contestant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// No population bound, or the population cannot supply an opponent
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Opponent sampling hit its retry bound
    #[error("opponent sampling exhausted after {attempts} attempts (population size {population_size})")]
    SamplingExhausted { attempts: usize, population_size: usize },

    /// A match failed; the whole evaluation is aborted
    #[error("match {game} failed: {source}")]
    MatchExecution {
        game: usize,
        #[source]
        source: MatchError,
    },
}

impl EvalError {
    /// Shorthand for a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        EvalError::Configuration(msg.into())
    }

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, EvalError::Configuration(_))
    }
}
