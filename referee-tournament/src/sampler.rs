//! Opponent sampling with self-play exclusion
//!
//! Level 3 - Step-level implementation

use std::sync::Arc;

use rand::Rng;
use referee_core::{EvalError, Population};

use crate::config::SamplingPolicy;

/// Draws uniformly random opponents from a population snapshot
#[derive(Clone, Copy, Debug, Default)]
pub struct OpponentSampler {
    policy: SamplingPolicy,
}

impl OpponentSampler {
    pub fn new(policy: SamplingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    /// Sample one opponent that is not `excluding`.
    ///
    /// Returns the population slot and the organism found there.
    pub fn sample<'p, O, R: Rng>(
        &self,
        population: &'p Population<O>,
        excluding: &Arc<O>,
        rng: &mut R,
    ) -> Result<(usize, &'p Arc<O>), EvalError> {
        self.check(population, excluding)?;
        self.draw(population, excluding, rng)
    }

    /// Fail fast when no draw could ever succeed
    pub fn check<O>(&self, population: &Population<O>, excluding: &Arc<O>) -> Result<(), EvalError> {
        if population.is_empty() {
            return Err(EvalError::configuration("population is empty"));
        }
        if population.distinct_from(excluding) == 0 {
            return Err(EvalError::configuration(format!(
                "population of {} has no organism distinguishable from the contestant",
                population.len()
            )));
        }
        Ok(())
    }

    /// Rejection-sample a slot until it holds something other than `excluding`
    pub fn draw<'p, O, R: Rng>(
        &self,
        population: &'p Population<O>,
        excluding: &Arc<O>,
        rng: &mut R,
    ) -> Result<(usize, &'p Arc<O>), EvalError> {
        let population_size = population.len();
        if population_size == 0 {
            return Err(EvalError::configuration("population is empty"));
        }

        let max_attempts = self.policy.max_attempts(population_size);
        let genomes = population.genomes();

        for attempt in 1..=max_attempts {
            let index = rng.gen_range(0..population_size);
            let genome = &genomes[index];
            if !genome.holds(excluding) {
                return Ok((index, &genome.organism));
            }
            tracing::trace!("Drew contestant at slot {} (attempt {}/{})", index, attempt, max_attempts);
        }

        tracing::warn!(
            "Opponent sampling exhausted: {} attempts, population {}",
            max_attempts,
            population_size
        );
        Err(EvalError::SamplingExhausted {
            attempts: max_attempts,
            population_size,
        })
    }
}
