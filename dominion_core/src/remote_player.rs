use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::{
    decision::{Decision, DecisionRequest},
    error::ActorError,
    player::{Player, PlayerData, PlayerId},
    result::GameResult,
};

pub type RequestId = u64;

/// What the engine sends to a player on the other end of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ObtainDecision {
        request_id: RequestId,
        request: DecisionRequest,
    },
    GameEnded(GameResult),
}

/// An answer from the other end of the channel. It only counts for the
/// request carrying the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionReply {
    pub request_id: RequestId,
    pub decision: Decision,
}

pub struct RemotePlayer {
    pub data: PlayerData,
    pub sender: Sender<GameEvent>,
    pub receiver: Receiver<DecisionReply>,
    last_request_id: RequestId,
}

impl RemotePlayer {
    pub fn new(
        id: PlayerId,
        name: String,
        sender: Sender<GameEvent>,
        receiver: Receiver<DecisionReply>,
    ) -> Self {
        RemotePlayer {
            data: PlayerData::new(id, name),
            sender,
            receiver,
            last_request_id: 0,
        }
    }
}

#[async_trait]
impl Player for RemotePlayer {
    fn data(&self) -> &PlayerData {
        &self.data
    }

    async fn request_decision(&mut self, request: &DecisionRequest) -> Result<Decision, ActorError> {
        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.sender
            .send(GameEvent::ObtainDecision {
                request_id,
                request: request.clone(),
            })
            .await
            .map_err(|_| ActorError::Disconnected)?;
        loop {
            let reply = self.receiver.recv().await.ok_or(ActorError::Disconnected)?;
            if reply.request_id == request_id {
                return Ok(reply.decision);
            }
            debug!(
                "{} answered request {} while {} is open, dropping it",
                self.name(),
                reply.request_id,
                request_id
            );
        }
    }

    async fn notify_game_ended(&mut self, result: &GameResult) {
        if self
            .sender
            .send(GameEvent::GameEnded(result.clone()))
            .await
            .is_err()
        {
            debug!("{} left before the game ended", self.name());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc::{channel, Receiver};

    use crate::{
        card::Card,
        config::{FixedTimeout, GameConfig},
        decision::{Decision, DecisionKind, DecisionRequest},
        error::ActorError,
        event::ActionKind,
        game::Game,
        kingdom::Kingdom,
        player::Player,
        remote_player::{DecisionReply, GameEvent, RemotePlayer, RequestId},
        result::{GameEndType, GameResult},
        snapshot::GameStateSnapshot,
    };

    #[tokio::test]
    async fn remote_player_should_forward_requests_and_return_answers() {
        let (event_sender, mut events) = channel(4);
        let (answers, answer_receiver) = channel(4);
        let mut player = RemotePlayer::new(0, "Foo".to_string(), event_sender, answer_receiver);
        answers.send(reply(1, Decision::Choose(Card::Silver))).await.unwrap();

        let decision = player.request_decision(&request()).await;

        assert_eq!(decision, Ok(Decision::Choose(Card::Silver)));
        assert_eq!(next_request(&mut events).await, (1, request()));
    }

    #[tokio::test]
    async fn replies_to_other_requests_should_be_dropped() {
        let (event_sender, mut events) = channel(4);
        let (answers, answer_receiver) = channel(4);
        let mut player = RemotePlayer::new(0, "Foo".to_string(), event_sender, answer_receiver);
        answers.send(reply(1, Decision::Choose(Card::Silver))).await.unwrap();
        assert_eq!(player.request_decision(&request()).await, Ok(Decision::Choose(Card::Silver)));

        answers.send(reply(1, Decision::Decline)).await.unwrap();
        answers.send(reply(7, Decision::EndTurn)).await.unwrap();
        answers.send(reply(2, Decision::Choose(Card::Silver))).await.unwrap();

        assert_eq!(player.request_decision(&request()).await, Ok(Decision::Choose(Card::Silver)));
        assert_eq!(next_request(&mut events).await.0, 1);
        assert_eq!(next_request(&mut events).await.0, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn late_reply_should_not_answer_the_next_request() {
        let config = GameConfig {
            starting_deck: vec![(Card::Moneylender, 1), (Card::Copper, 4)],
            decision_timeout_ms: None,
            seed: Some(3),
            ..Default::default()
        };
        let kingdom = Kingdom::new([(Card::Province, 8), (Card::Silver, 10)]);
        let (event_sender, mut events) = channel(8);
        let (answers, answer_receiver) = channel(8);
        let remote = RemotePlayer::new(0, "Remote".to_string(), event_sender, answer_receiver);
        let mut game = Game::new(vec![Box::new(remote)], kingdom, config)
            .with_timeout_policy(FixedTimeout(Duration::from_millis(100)));
        let stop = game.stop_handle();
        let running = tokio::spawn(async move {
            let result = game.run().await;
            (game, result)
        });

        let (first_id, first) = next_request(&mut events).await;
        assert_eq!(first.kind, DecisionKind::PlayAction);
        assert_eq!(first.snapshot.turn, 1);

        // The first request times out before anyone answers it.
        let (second_id, second) = next_request(&mut events).await;
        assert_eq!(second.kind, DecisionKind::PlayAction);
        assert_eq!(second.snapshot.turn, 2);
        assert_ne!(first_id, second_id);
        answers.send(reply(first_id, Decision::Decline)).await.unwrap();
        answers
            .send(reply(second_id, Decision::Choose(Card::Moneylender)))
            .await
            .unwrap();

        let (_, buy) = next_request(&mut events).await;
        assert_eq!(buy.kind, DecisionKind::Buy);
        assert_eq!(buy.snapshot.turn, 2);
        assert_eq!(buy.snapshot.player_state.unwrap().additional_money, 3);

        stop.stop();
        let (game, result) = running.await.unwrap();
        assert_eq!(result.unwrap().end_type, GameEndType::Error);
        let entries: Vec<_> = game
            .log()
            .entries()
            .iter()
            .map(|e| (e.turn, e.kind, e.args.clone()))
            .collect();
        assert_eq!(
            entries,
            vec![
                (1, ActionKind::Fault, vec![]),
                (2, ActionKind::Play, vec![Card::Moneylender]),
            ]
        );
    }

    #[tokio::test]
    async fn closed_channel_should_count_as_disconnect() {
        let (event_sender, _events) = channel(4);
        let (answers, answer_receiver) = channel::<DecisionReply>(4);
        let mut player = RemotePlayer::new(0, "Foo".to_string(), event_sender, answer_receiver);
        drop(answers);

        assert_eq!(
            player.request_decision(&request()).await,
            Err(ActorError::Disconnected)
        );
    }

    #[tokio::test]
    async fn game_end_should_be_forwarded_as_an_event() {
        let (event_sender, mut events) = channel(4);
        let (_answers, answer_receiver) = channel(4);
        let mut player = RemotePlayer::new(0, "Foo".to_string(), event_sender, answer_receiver);
        let result = GameResult::new(GameEndType::Error, 3, vec![]);

        player.notify_game_ended(&result).await;

        assert_eq!(events.recv().await, Some(GameEvent::GameEnded(result)));
    }

    #[test]
    fn game_events_should_survive_the_wire_format() {
        let event = GameEvent::ObtainDecision {
            request_id: 4,
            request: request(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<GameEvent>(&json).unwrap(), event);
    }

    // Infra ----------------------------------------------------------------

    fn request() -> DecisionRequest {
        DecisionRequest {
            kind: DecisionKind::Buy,
            legal_options: vec![Card::Silver],
            snapshot: GameStateSnapshot::default(),
        }
    }

    fn reply(request_id: RequestId, decision: Decision) -> DecisionReply {
        DecisionReply {
            request_id,
            decision,
        }
    }

    async fn next_request(events: &mut Receiver<GameEvent>) -> (RequestId, DecisionRequest) {
        match events.recv().await {
            Some(GameEvent::ObtainDecision {
                request_id,
                request,
            }) => (request_id, request),
            unexpected => panic!("expected a decision request, got {unexpected:?}"),
        }
    }
}
