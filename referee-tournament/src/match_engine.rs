//! Match engine boundary - one contest between two players
//!
//! Level 3 - Step-level implementation
//!
//! The engine itself (a board game, a lander simulation, ...) lives
//! outside this crate. It is injected into the evaluator as a typed value.

use std::sync::Arc;

use referee_core::MatchError;

/// Side a player takes in a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The organism being scored (+1)
    Challenger,
    /// A sampled opponent (-1)
    Incumbent,
}

impl Role {
    /// Integer role marker handed to the engine
    pub fn sign(self) -> i32 {
        match self {
            Role::Challenger => 1,
            Role::Incumbent => -1,
        }
    }

    pub fn opposite(self) -> Role {
        match self {
            Role::Challenger => Role::Incumbent,
            Role::Incumbent => Role::Challenger,
        }
    }
}

/// An organism paired with the role it plays in one match
#[derive(Debug)]
pub struct Player<O> {
    pub organism: Arc<O>,
    pub role: Role,
}

impl<O> Clone for Player<O> {
    fn clone(&self) -> Self {
        Self {
            organism: Arc::clone(&self.organism),
            role: self.role,
        }
    }
}

impl<O> Player<O> {
    pub fn new(organism: Arc<O>, role: Role) -> Self {
        Self { organism, role }
    }

    pub fn challenger(organism: Arc<O>) -> Self {
        Self::new(organism, Role::Challenger)
    }

    pub fn incumbent(organism: Arc<O>) -> Self {
        Self::new(organism, Role::Incumbent)
    }

    /// Role marker (+1 / -1)
    pub fn sign(&self) -> i32 {
        self.role.sign()
    }
}

/// Two-player contest returning a signed outcome (positive favors role +1)
pub trait MatchEngine<O>: Send + Sync {
    fn play(&self, a: Player<O>, b: Player<O>) -> Result<i32, MatchError>;
}

impl<O, F> MatchEngine<O> for F
where
    F: Fn(Player<O>, Player<O>) -> Result<i32, MatchError> + Send + Sync,
{
    fn play(&self, a: Player<O>, b: Player<O>) -> Result<i32, MatchError> {
        self(a, b)
    }
}

/// Reject an outcome outside the inclusive bounds, if any
pub fn check_outcome(outcome: i32, bounds: Option<(i32, i32)>) -> Result<i32, MatchError> {
    match bounds {
        Some((min, max)) if outcome < min || outcome > max => {
            Err(MatchError::OutOfContract { outcome, min, max })
        }
        _ => Ok(outcome),
    }
}
