use async_trait::async_trait;

use crate::{
    decision::{Decision, DecisionRequest},
    error::ActorError,
    result::GameResult,
};

pub type PlayerId = usize;

pub struct PlayerData {
    id: PlayerId,
    name: String,
}

impl PlayerData {
    pub fn new(id: PlayerId, name: String) -> Self {
        PlayerData { id, name }
    }
}

/// Anything that can take a seat: a console user, a bot, a remote connection.
#[async_trait]
pub trait Player: Send {
    fn data(&self) -> &PlayerData;

    fn id(&self) -> PlayerId {
        self.data().id
    }

    fn name(&self) -> &str {
        &self.data().name
    }

    async fn request_decision(&mut self, request: &DecisionRequest) -> Result<Decision, ActorError>;

    async fn notify_game_ended(&mut self, result: &GameResult);
}
