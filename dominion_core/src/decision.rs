use serde::{Deserialize, Serialize};

use crate::{card::Card, error::ActorError, snapshot::GameStateSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    PlayAction,
    Buy,
    /// One argument of a card being played; `slot` counts from zero.
    Clarify {
        card: Card,
        slot: usize,
        arg_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Choose(Card),
    /// Ends the current phase, or stops collecting arguments.
    Decline,
    EndTurn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub kind: DecisionKind,
    pub legal_options: Vec<Card>,
    pub snapshot: GameStateSnapshot,
}

impl DecisionRequest {
    pub fn validate(&self, decision: Decision) -> Result<Decision, ActorError> {
        match decision {
            Decision::Choose(card) if !self.legal_options.contains(&card) => Err(
                ActorError::Malformed(format!("{card} is not a legal choice for {:?}", self.kind)),
            ),
            _ => Ok(decision),
        }
    }
}
