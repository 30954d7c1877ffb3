//! Tournament record - per-contestant aggregation into fitness
//!
//! Level 3 - Step-level implementation

use serde::Serialize;

/// Outcome of evaluating one contestant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TournamentRecord {
    /// Generation of the population snapshot the matches were drawn from
    pub generation: u64,
    /// Match outcomes in play order (positive favors the contestant)
    pub outcomes: Vec<i32>,
    /// Population slot of the opponent faced in each match
    pub opponents: Vec<usize>,
    /// Sum of outcomes
    pub fitness: f64,
}

impl TournamentRecord {
    pub fn new(generation: u64, outcomes: Vec<i32>, opponents: Vec<usize>) -> Self {
        let fitness = sum_outcomes(&outcomes);
        Self {
            generation,
            outcomes,
            opponents,
            fitness,
        }
    }

    /// Total games played
    pub fn games_played(&self) -> usize {
        self.outcomes.len()
    }

    /// Games with a positive outcome for the contestant
    pub fn wins(&self) -> usize {
        self.outcomes.iter().filter(|&&o| o > 0).count()
    }

    /// Games with a negative outcome for the contestant
    pub fn losses(&self) -> usize {
        self.outcomes.iter().filter(|&&o| o < 0).count()
    }

    pub fn draws(&self) -> usize {
        self.outcomes.iter().filter(|&&o| o == 0).count()
    }
}

/// Fitness is the plain sum of match outcomes, never the mean
pub fn sum_outcomes(outcomes: &[i32]) -> f64 {
    outcomes.iter().map(|&o| i64::from(o)).sum::<i64>() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_not_mean() {
        assert_eq!(sum_outcomes(&[1, 1, 1, 1, 1]), 5.0);
        assert_eq!(sum_outcomes(&[3, -1, 0, 2, -4]), 0.0);
        assert_eq!(sum_outcomes(&[]), 0.0);
    }

    #[test]
    fn test_sum_does_not_overflow_i32() {
        let outcomes = vec![i32::MAX; 5];
        assert_eq!(sum_outcomes(&outcomes), 5.0 * i32::MAX as f64);
    }

    #[test]
    fn test_record_counts() {
        let record = TournamentRecord::new(4, vec![1, -1, 0, 2, 1], vec![1, 2, 1, 3, 2]);

        assert_eq!(record.generation, 4);
        assert_eq!(record.games_played(), 5);
        assert_eq!(record.wins(), 3);
        assert_eq!(record.losses(), 1);
        assert_eq!(record.draws(), 1);
        assert_eq!(record.fitness, 3.0);
    }
}
