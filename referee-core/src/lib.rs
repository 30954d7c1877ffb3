//! Referee Core - Population model and scoring contracts
//!
//! This crate provides the shared vocabulary for fitness evaluation:
//! - Genomes and immutable population snapshots
//! - Fitness polarity (maximize / minimize) and ranking
//! - The scoring-strategy trait consumed by selection
//! - Error types for evaluation

pub mod error;
pub mod genome;
pub mod polarity;
pub mod score;

// Re-exports for convenient access
pub use error::{EvalError, MatchError};
pub use genome::{Genome, Population};
pub use polarity::Polarity;
pub use score::{ScoreFunction, SoloScore};
