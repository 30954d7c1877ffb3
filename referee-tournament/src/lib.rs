//! Referee Tournament - Fitness evaluation through self-play
//!
//! This crate scores organisms for a neuroevolution loop:
//! - Opponent sampling from the current population (never the contestant)
//! - A pluggable two-player match engine
//! - Tournament evaluation summing five match outcomes into fitness
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: score, evaluate_population (orchestration)
//! - Level 2: evaluate_against (phases)
//! - Level 3: sample opponent, play_game, sum_outcomes (steps)
//! - Level 4: utilities, configuration

mod config;
mod evaluator;
mod fitness;
mod match_engine;
mod sampler;

pub use config::{EvalConfig, SamplingPolicy, GAMES_PER_EVALUATION};
pub use evaluator::TournamentEvaluator;
pub use fitness::{sum_outcomes, TournamentRecord};
pub use match_engine::{check_outcome, MatchEngine, Player, Role};
pub use sampler::OpponentSampler;

pub use referee_core::{EvalError, Genome, MatchError, Polarity, Population, ScoreFunction};
