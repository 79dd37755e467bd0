use thiserror::Error;

use crate::card::Card;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActorError {
    #[error("player did not answer in time")]
    Timeout,
    #[error("player disconnected")]
    Disconnected,
    #[error("malformed answer: {0}")]
    Malformed(String),
    #[error("player failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("actor fault: {0}")]
    Actor(#[from] ActorError),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("supply pile {0} is empty")]
    SupplyExhausted(Card),
    #[error("{0} is not part of the supply")]
    NotInSupply(Card),
    #[error("supply pile {0} would exceed its initial count")]
    SupplyOverflow(Card),
    #[error("player does not hold {0}")]
    CardNotOwned(Card),
    #[error("{card} takes {expected} arguments, got {got}")]
    WrongArgumentCount {
        card: Card,
        expected: usize,
        got: usize,
    },
    #[error("game has already been started")]
    AlreadyStarted,
    #[error("a game needs at least one player")]
    NotEnoughPlayers,
    #[error("game was stopped")]
    Stopped,
}

impl GameError {
    /// Actor faults end the current turn only; everything else ends the game.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GameError::Actor(_))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        card::Card,
        error::{ActorError, GameError},
    };

    #[test]
    fn only_actor_faults_should_be_recoverable() {
        assert!(!GameError::from(ActorError::Timeout).is_fatal());
        assert!(!GameError::Actor(ActorError::Disconnected).is_fatal());
        assert!(GameError::SupplyExhausted(Card::Province).is_fatal());
        assert!(GameError::InvariantViolation("negative supply".to_string()).is_fatal());
        assert!(GameError::Stopped.is_fatal());
    }

    #[test]
    fn errors_should_name_the_card() {
        assert_eq!(
            GameError::CardNotOwned(Card::Copper).to_string(),
            "player does not hold Copper"
        );
        assert_eq!(
            GameError::WrongArgumentCount {
                card: Card::Remodel,
                expected: 2,
                got: 1
            }
            .to_string(),
            "Remodel takes 2 arguments, got 1"
        );
    }
}
