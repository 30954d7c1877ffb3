//! Configuration types for tournament evaluation
//!
//! Level 4 - Utilities and configuration

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Matches played per contestant evaluation
pub const GAMES_PER_EVALUATION: usize = 5;

/// Bounded retry policy for opponent sampling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingPolicy {
    /// Draws allowed per population member
    pub attempts_per_member: usize,
    /// Floor on the draw budget for small populations
    pub min_attempts: usize,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            attempts_per_member: 8,
            min_attempts: 16,
        }
    }
}

impl SamplingPolicy {
    /// Draw budget for one opponent in a population of the given size
    pub fn max_attempts(&self, population_size: usize) -> usize {
        self.attempts_per_member
            .saturating_mul(population_size)
            .max(self.min_attempts)
            .max(1)
    }
}

/// Configuration for tournament fitness evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Opponent sampling retry policy
    pub sampling: SamplingPolicy,
    /// Inclusive (min, max) range a match outcome must fall in (None = any)
    pub outcome_bounds: Option<(i32, i32)>,
    /// Whether population-wide scoring runs in parallel
    pub parallel: bool,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            sampling: SamplingPolicy::default(),
            outcome_bounds: None,
            parallel: true,
            seed: None,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject match outcomes outside `[min, max]`
    pub fn with_outcome_bounds(mut self, min: i32, max: i32) -> Self {
        self.outcome_bounds = Some((min, max));
        self
    }

    /// Set sampling retry policy
    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = sampling;
        self
    }

    /// Disable parallel population scoring
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read eval config {}", path.display()))?;
        let config: EvalConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse eval config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if let Some((min, max)) = self.outcome_bounds {
            if min > max {
                bail!("Invalid outcome bounds: min {} > max {}", min, max);
            }
        }
        if self.sampling.attempts_per_member == 0 && self.sampling.min_attempts == 0 {
            bail!("Sampling policy allows no attempts");
        }
        Ok(())
    }
}
