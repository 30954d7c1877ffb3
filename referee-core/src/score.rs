//! Scoring strategies consumed by selection
//!
//! Selection only needs two things from a scorer: which direction is
//! better, and a score for one organism. Tournament play and solo
//! simulation both fit behind this trait.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{EvalError, MatchError};
use crate::polarity::Polarity;

/// A fitness scoring strategy
pub trait ScoreFunction<O>: Send + Sync {
    /// Direction in which scores improve
    fn polarity(&self) -> Polarity;

    /// Score one organism
    fn score(&self, contestant: &Arc<O>) -> Result<f64, EvalError>;
}

/// Scores an organism on its own, e.g. one run of a pilot in a simulator.
///
/// The run is treated as game 0; a failed run is reported as a match error.
pub struct SoloScore<O, F> {
    run: F,
    polarity: Polarity,
    _organism: PhantomData<fn(&O)>,
}

impl<O, F> SoloScore<O, F>
where
    F: Fn(&O) -> Result<i32, MatchError> + Send + Sync,
{
    /// Create a solo scorer where higher run scores are better
    pub fn new(run: F) -> Self {
        Self {
            run,
            polarity: Polarity::Maximize,
            _organism: PhantomData,
        }
    }

    /// Override the polarity (e.g. for cost-style scores)
    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }
}

impl<O, F> ScoreFunction<O> for SoloScore<O, F>
where
    F: Fn(&O) -> Result<i32, MatchError> + Send + Sync,
{
    fn polarity(&self) -> Polarity {
        self.polarity
    }

    fn score(&self, contestant: &Arc<O>) -> Result<f64, EvalError> {
        (self.run)(contestant.as_ref())
            .map(f64::from)
            .map_err(|source| EvalError::MatchExecution { game: 0, source })
    }
}
