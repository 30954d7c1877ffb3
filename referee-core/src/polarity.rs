//! Fitness polarity - which direction of score is better
//!
//! Selection consumes polarity as a capability flag instead of guessing
//! it from the scores.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Whether higher or lower fitness values are preferred
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Higher is better
    Maximize,
    /// Lower is better
    Minimize,
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Maximize
    }
}

impl Polarity {
    /// True when scores should be minimized
    pub fn should_minimize(self) -> bool {
        self == Polarity::Minimize
    }

    /// Order two scores best-first. NaN sorts after every number.
    pub fn compare(self, a: f64, b: f64) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => match self {
                Polarity::Maximize => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
                Polarity::Minimize => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            },
        }
    }

    /// Check if `a` is strictly better than `b`
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Indices of `scores` ordered best-first (stable for ties)
    pub fn rank(self, scores: &[f64]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..scores.len()).collect();
        indices.sort_by(|&a, &b| self.compare(scores[a], scores[b]));
        indices
    }

    /// Index of the best score, if any
    pub fn best(self, scores: &[f64]) -> Option<usize> {
        self.rank(scores).first().copied()
    }
}
