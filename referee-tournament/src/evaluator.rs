//! Tournament evaluator - fitness by play against sampled peers
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::sync::{Arc, PoisonError, RwLock};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use referee_core::{EvalError, Genome, Polarity, Population, ScoreFunction};

use crate::config::{EvalConfig, GAMES_PER_EVALUATION};
use crate::fitness::TournamentRecord;
use crate::match_engine::{check_outcome, MatchEngine, Player};
use crate::sampler::OpponentSampler;

/// Scores organisms by playing them against random members of a population.
///
/// The bound population is an `Arc` snapshot. Each evaluation clones the
/// handle once and then runs without holding any lock, so a concurrent
/// `configure` only affects evaluations that start after it.
pub struct TournamentEvaluator<O, E> {
    engine: E,
    config: EvalConfig,
    sampler: OpponentSampler,
    population: RwLock<Option<Arc<Population<O>>>>,
}

impl<O, E> TournamentEvaluator<O, E>
where
    O: Send + Sync,
    E: MatchEngine<O>,
{
    /// Create an unconfigured evaluator around a match engine
    pub fn new(engine: E, config: EvalConfig) -> Self {
        let sampler = OpponentSampler::new(config.sampling);
        Self {
            engine,
            config,
            sampler,
            population: RwLock::new(None),
        }
    }

    /// Create an evaluator already bound to one generation's population
    pub fn for_generation(
        engine: E,
        config: EvalConfig,
        population: impl Into<Arc<Population<O>>>,
    ) -> Self {
        let evaluator = Self::new(engine, config);
        evaluator.configure(population);
        evaluator
    }

    /// Bind the population snapshot used by subsequent evaluations
    pub fn configure(&self, population: impl Into<Arc<Population<O>>>) {
        let population = population.into();
        tracing::debug!(
            "Configured population: generation {}, {} genomes",
            population.generation(),
            population.len()
        );
        *self.population.write().unwrap_or_else(PoisonError::into_inner) = Some(population);
    }

    /// Currently bound snapshot
    pub fn snapshot(&self) -> Result<Arc<Population<O>>, EvalError> {
        self.population
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| EvalError::configuration("no population configured"))
    }

    pub fn is_configured(&self) -> bool {
        self.population
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Tournament fitness is always maximized
    pub fn polarity(&self) -> Polarity {
        Polarity::Maximize
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Fitness of one contestant: the sum of its match outcomes
    pub fn score(&self, contestant: &Arc<O>) -> Result<f64, EvalError> {
        self.evaluate(contestant).map(|record| record.fitness)
    }

    /// Play a full evaluation for one contestant
    pub fn evaluate(&self, contestant: &Arc<O>) -> Result<TournamentRecord, EvalError> {
        let population = self.snapshot()?;
        let offset = population.index_of(contestant).map_or(0, |i| i as u64);
        let mut rng = self.rng_for(offset);
        self.evaluate_against(&population, contestant, &mut rng)
    }

    /// Play a full evaluation with a caller-supplied random stream
    pub fn evaluate_with_rng<R: Rng>(
        &self,
        contestant: &Arc<O>,
        rng: &mut R,
    ) -> Result<TournamentRecord, EvalError> {
        let population = self.snapshot()?;
        self.evaluate_against(&population, contestant, rng)
    }

    /// Evaluate every genome of the bound snapshot against that snapshot.
    ///
    /// Results are in population order; one failure does not stop the others.
    pub fn evaluate_population(&self) -> Result<Vec<Result<TournamentRecord, EvalError>>, EvalError> {
        let population = self.snapshot()?;
        tracing::debug!(
            "Evaluating generation {}: {} genomes{}",
            population.generation(),
            population.len(),
            if self.config.parallel { " (parallel)" } else { "" }
        );

        let evaluate_one = |(index, genome): (usize, &Genome<O>)| {
            let mut rng = self.rng_for(index as u64);
            self.evaluate_against(&population, &genome.organism, &mut rng)
        };

        let results: Vec<Result<TournamentRecord, EvalError>> = if self.config.parallel {
            population.genomes().par_iter().enumerate().map(evaluate_one).collect()
        } else {
            population.genomes().iter().enumerate().map(evaluate_one).collect()
        };

        Ok(results)
    }

    /// Fitness of every genome, failing on the first error
    pub fn score_population(&self) -> Result<Vec<f64>, EvalError> {
        self.evaluate_population()?
            .into_iter()
            .map(|result| result.map(|record| record.fitness))
            .collect()
    }

    // ========================================================================
    // Level 2 - Phases
    // ========================================================================

    /// Play the fixed number of matches against one snapshot
    fn evaluate_against<R: Rng>(
        &self,
        population: &Population<O>,
        contestant: &Arc<O>,
        rng: &mut R,
    ) -> Result<TournamentRecord, EvalError> {
        self.sampler.check(population, contestant)?;

        let mut outcomes = Vec::with_capacity(GAMES_PER_EVALUATION);
        let mut opponents = Vec::with_capacity(GAMES_PER_EVALUATION);

        for game in 0..GAMES_PER_EVALUATION {
            let (index, opponent) = self.sampler.draw(population, contestant, rng)?;
            let outcome = self.play_game(game, contestant, opponent)?;
            tracing::debug!("Game {}: vs slot {} -> {}", game, index, outcome);
            outcomes.push(outcome);
            opponents.push(index);
        }

        Ok(TournamentRecord::new(population.generation(), outcomes, opponents))
    }

    // ========================================================================
    // Level 3 - Steps
    // ========================================================================

    /// Contestant plays challenger (+1), opponent plays incumbent (-1)
    fn play_game(&self, game: usize, contestant: &Arc<O>, opponent: &Arc<O>) -> Result<i32, EvalError> {
        self.engine
            .play(
                Player::challenger(Arc::clone(contestant)),
                Player::incumbent(Arc::clone(opponent)),
            )
            .and_then(|outcome| check_outcome(outcome, self.config.outcome_bounds))
            .map_err(|source| {
                tracing::warn!("Evaluation aborted at game {}: {}", game, source);
                EvalError::MatchExecution { game, source }
            })
    }

    /// Seeded stream per population slot, or fresh entropy
    fn rng_for(&self, offset: u64) -> ChaCha8Rng {
        match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(offset)),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl<O, E> ScoreFunction<O> for TournamentEvaluator<O, E>
where
    O: Send + Sync,
    E: MatchEngine<O>,
{
    fn polarity(&self) -> Polarity {
        TournamentEvaluator::polarity(self)
    }

    fn score(&self, contestant: &Arc<O>) -> Result<f64, EvalError> {
        TournamentEvaluator::score(self, contestant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use referee_core::MatchError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Net(i32);

    fn make_population(n: i32) -> Population<Net> {
        Population::from_organisms(0, (0..n).map(Net))
    }

    /// Engine that returns the difference in strength and counts calls
    struct StrengthEngine {
        calls: AtomicUsize,
    }

    impl StrengthEngine {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    impl MatchEngine<Net> for StrengthEngine {
        fn play(&self, a: Player<Net>, b: Player<Net>) -> Result<i32, MatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(a.organism.0 - b.organism.0)
        }
    }

    #[test]
    fn test_unconfigured_evaluator_fails() {
        let evaluator = TournamentEvaluator::new(StrengthEngine::new(), EvalConfig::default());
        let err = evaluator.score(&Arc::new(Net(0))).unwrap_err();

        assert!(err.is_configuration());
        assert!(!evaluator.is_configured());
        assert_eq!(evaluator.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_polarity_is_maximize() {
        let evaluator: TournamentEvaluator<Net, _> = TournamentEvaluator::new(StrengthEngine::new(), EvalConfig::default());
        assert_eq!(evaluator.polarity(), Polarity::Maximize);
        assert_eq!(ScoreFunction::polarity(&evaluator), Polarity::Maximize);
    }

    #[test]
    fn test_score_plays_five_games_and_sums() {
        let population = make_population(4);
        let contestant = population.organism(3).unwrap().clone();
        let evaluator =
            TournamentEvaluator::for_generation(StrengthEngine::new(), EvalConfig::new().with_seed(1), population);

        let record = evaluator.evaluate(&contestant).unwrap();

        assert_eq!(evaluator.engine().calls.load(Ordering::SeqCst), GAMES_PER_EVALUATION);
        assert_eq!(record.games_played(), GAMES_PER_EVALUATION);
        let expected: i32 = record.opponents.iter().map(|&slot| 3 - slot as i32).sum();
        assert_eq!(record.fitness, expected as f64);
        assert!(record.opponents.iter().all(|&slot| slot != 3));
    }

    #[test]
    fn test_single_member_population_is_configuration_error() {
        let population = make_population(1);
        let contestant = population.organism(0).unwrap().clone();
        let evaluator = TournamentEvaluator::for_generation(StrengthEngine::new(), EvalConfig::default(), population);

        let err = evaluator.score(&contestant).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(evaluator.engine().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_engine_failure_aborts_evaluation() {
        let calls = AtomicUsize::new(0);
        let engine = |_: Player<Net>, _: Player<Net>| -> Result<i32, MatchError> {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 2 {
                Err(MatchError::Failed("simulation diverged".to_string()))
            } else {
                Ok(1)
            }
        };
        let population = make_population(3);
        let contestant = population.organism(0).unwrap().clone();
        let evaluator = TournamentEvaluator::for_generation(engine, EvalConfig::default(), population);

        let err = evaluator.score(&contestant).unwrap_err();

        assert_eq!(
            err,
            EvalError::MatchExecution {
                game: 2,
                source: MatchError::Failed("simulation diverged".to_string()),
            }
        );
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_out_of_bounds_outcome_rejected() {
        let population = make_population(3);
        let contestant = population.organism(2).unwrap().clone();
        let evaluator = TournamentEvaluator::for_generation(
            StrengthEngine::new(),
            EvalConfig::new().with_outcome_bounds(0, 0),
            population,
        );

        // Contestant 2 always beats 0 or 1 by a positive margin
        let err = evaluator.score(&contestant).unwrap_err();
        match err {
            EvalError::MatchExecution { game, source: MatchError::OutOfContract { min, max, .. } } => {
                assert_eq!(game, 0);
                assert_eq!((min, max), (0, 0));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(evaluator.engine().calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_seeded_evaluation_is_reproducible() {
        let population = Arc::new(make_population(6));
        let contestant = population.organism(0).unwrap().clone();
        let config = EvalConfig::new().with_seed(99);

        let first = TournamentEvaluator::for_generation(StrengthEngine::new(), config.clone(), population.clone());
        let second = TournamentEvaluator::for_generation(StrengthEngine::new(), config, population);

        assert_eq!(first.evaluate(&contestant).unwrap(), second.evaluate(&contestant).unwrap());
    }

    #[test]
    fn test_engine_sees_challenger_then_incumbent() {
        let seen = Mutex::new(Vec::new());
        let engine = |a: Player<Net>, b: Player<Net>| -> Result<i32, MatchError> {
            seen.lock().unwrap().push((a.sign(), b.sign(), a.organism.0, b.organism.0));
            Ok(0)
        };
        let population = make_population(3);
        let contestant = population.organism(1).unwrap().clone();
        let evaluator = TournamentEvaluator::for_generation(engine, EvalConfig::default(), population);

        assert_eq!(evaluator.score(&contestant), Ok(0.0));
        drop(evaluator);

        let seen = seen.into_inner().unwrap();
        assert_eq!(seen.len(), GAMES_PER_EVALUATION);
        for (sign_a, sign_b, a, b) in seen {
            assert_eq!((sign_a, sign_b), (1, -1));
            assert_eq!(a, 1);
            assert_ne!(b, 1);
        }
    }

    #[test]
    fn test_evaluate_population_in_order() {
        let population = make_population(5);
        let evaluator = TournamentEvaluator::for_generation(
            StrengthEngine::new(),
            EvalConfig::new().with_seed(5).sequential(),
            population,
        );

        let records = evaluator.evaluate_population().unwrap();
        assert_eq!(records.len(), 5);
        for (slot, record) in records.iter().enumerate() {
            let record = record.as_ref().unwrap();
            assert!(record.opponents.iter().all(|&o| o != slot));
        }
        assert_eq!(evaluator.engine().calls.load(Ordering::SeqCst), 5 * GAMES_PER_EVALUATION);

        // The strongest net can only win, the weakest can only lose
        let scores = evaluator.score_population().unwrap();
        assert!(scores[4] > 0.0);
        assert!(scores[0] < 0.0);
        assert_eq!(evaluator.polarity().best(&scores), Some(4));
    }

    #[test]
    fn test_population_scoring_matches_single_scoring() {
        let population = make_population(4);
        let organisms: Vec<Arc<Net>> = population.iter().map(|g| g.organism.clone()).collect();
        let evaluator =
            TournamentEvaluator::for_generation(StrengthEngine::new(), EvalConfig::new().with_seed(17), population);

        let batch = evaluator.score_population().unwrap();
        let single: Vec<f64> = organisms.iter().map(|o| evaluator.score(o).unwrap()).collect();

        assert_eq!(batch, single);
    }

    #[test]
    fn test_score_population_reports_degenerate_member() {
        let shared = Arc::new(Net(0));
        let population = Population::new(0, vec![Genome::new(0, shared.clone()), Genome::new(1, shared)]);
        let evaluator = TournamentEvaluator::for_generation(StrengthEngine::new(), EvalConfig::default(), population);

        let results = evaluator.evaluate_population().unwrap();
        assert!(results.iter().all(|r| matches!(r, Err(e) if e.is_configuration())));
        assert!(evaluator.score_population().unwrap_err().is_configuration());
    }

    #[test]
    fn test_configure_replaces_snapshot() {
        let evaluator = TournamentEvaluator::new(StrengthEngine::new(), EvalConfig::new().with_seed(3));
        evaluator.configure(make_population(2));
        let old = evaluator.snapshot().unwrap();

        evaluator.configure(Population::from_organisms(7, (0..3).map(Net)));
        let new = evaluator.snapshot().unwrap();

        assert_eq!(old.generation(), 0);
        assert_eq!(new.generation(), 7);
        assert_eq!(new.len(), 3);

        let contestant = new.organism(0).unwrap().clone();
        assert_eq!(evaluator.evaluate(&contestant).unwrap().generation, 7);
    }
}
