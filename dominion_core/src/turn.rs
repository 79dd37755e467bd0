use std::iter::once;

use log::debug;
use tokio::sync::watch;

use crate::{
    card::Card,
    decision::{Decision, DecisionKind, DecisionRequest},
    effect::PlayOutcome,
    error::{ActorError, GameError},
    event::ActionKind,
    game::Game,
    player_state::PlayerState,
};

enum Flow {
    Performed,
    Rejected,
    EndTurn,
}

/// Drives one player's turn: action phase, then buy phase. Cleanup is left to
/// the game loop so that it runs even when the turn ends on a fault.
pub struct TurnController<'a> {
    game: &'a mut Game,
    seat: usize,
}

impl<'a> TurnController<'a> {
    pub fn new(game: &'a mut Game, seat: usize) -> Self {
        TurnController { game, seat }
    }

    pub async fn play_turn(mut self) -> Result<(), GameError> {
        if let Flow::EndTurn = self.action_phase().await? {
            return Ok(());
        }
        self.buy_phase().await
    }

    fn state(&self) -> &PlayerState {
        &self.game.seats[self.seat].state
    }

    fn playable_actions(&self, rejected: &[Card]) -> Vec<Card> {
        let state = self.state();
        state
            .action_cards_in_hand()
            .into_iter()
            .filter(|card| !rejected.contains(card))
            .filter(|&card| match card.effect() {
                Some(effect) => {
                    let mut staged = state.clone();
                    staged.play_from_hand(card).is_ok()
                        && effect.may_act(&self.game.kingdom, &staged)
                }
                None => false,
            })
            .collect()
    }

    async fn action_phase(&mut self) -> Result<Flow, GameError> {
        let mut rejected = vec![];
        while self.state().actions() > 0 {
            let playable = self.playable_actions(&rejected);
            if playable.is_empty() {
                break;
            }
            match self.obtain_decision(DecisionKind::PlayAction, playable).await? {
                Decision::Choose(card) => match self.play(card).await? {
                    Flow::Performed => {}
                    Flow::Rejected => rejected.push(card),
                    Flow::EndTurn => return Ok(Flow::EndTurn),
                },
                Decision::Decline => break,
                Decision::EndTurn => return Ok(Flow::EndTurn),
            }
        }
        Ok(Flow::Performed)
    }

    /// Resolves one card against staged copies of the player state and the
    /// kingdom; the copies are committed only if the play goes through.
    async fn play(&mut self, card: Card) -> Result<Flow, GameError> {
        let effect = match card.effect() {
            Some(effect) => effect,
            None => {
                self.reject(card, vec![]);
                return Ok(Flow::Rejected);
            }
        };

        let mut staged = self.state().clone();
        staged.play_from_hand(card)?;
        staged.use_action();

        let mut args = vec![];
        for slot in 0..effect.arg_count() {
            let options = effect.arg_options(&self.game.kingdom, &staged, &args);
            if options.is_empty() {
                break;
            }
            let kind = DecisionKind::Clarify {
                card,
                slot,
                arg_count: effect.arg_count(),
            };
            match self.obtain_decision(kind, options).await? {
                Decision::Choose(arg) => args.push(arg),
                Decision::Decline => break,
                Decision::EndTurn => return Ok(Flow::EndTurn),
            }
        }

        let mut kingdom = self.game.kingdom.clone();
        match effect.try_act(&mut kingdom, &mut staged, &args)? {
            PlayOutcome::Performed => {
                kingdom.check_invariants()?;
                self.game.kingdom = kingdom;
                self.game.seats[self.seat].state = staged;
                self.game
                    .record(self.seat, ActionKind::Play, once(card).chain(args).collect());
                Ok(Flow::Performed)
            }
            PlayOutcome::NotPerformed => {
                self.reject(card, args);
                Ok(Flow::Rejected)
            }
        }
    }

    fn affordable_cards(&self) -> Vec<Card> {
        let money = self.state().available_money();
        self.game
            .kingdom
            .available_cards()
            .filter(|c| c.cost() <= money)
            .collect()
    }

    async fn buy_phase(&mut self) -> Result<(), GameError> {
        while self.state().buys() > 0 {
            let options = self.affordable_cards();
            if options.is_empty() {
                break;
            }
            match self.obtain_decision(DecisionKind::Buy, options).await? {
                Decision::Choose(card) => {
                    if !self.buy(card)? {
                        break;
                    }
                }
                Decision::Decline | Decision::EndTurn => break,
            }
        }
        Ok(())
    }

    fn buy(&mut self, card: Card) -> Result<bool, GameError> {
        let game = &mut *self.game;
        let state = &mut game.seats[self.seat].state;
        if state.buys() == 0
            || !game.kingdom.is_available(card)
            || state.available_money() < card.cost()
        {
            self.reject(card, vec![]);
            return Ok(false);
        }
        state.gain(&mut game.kingdom, card)?;
        state.spend(card.cost());
        state.use_buy();
        self.game.record(self.seat, ActionKind::Buy, vec![card]);
        Ok(true)
    }

    fn reject(&mut self, card: Card, args: Vec<Card>) {
        debug!(
            "game {} turn {}: {} could not play {} with {:?}",
            self.game.id,
            self.game.turn,
            self.game.seats[self.seat].actor.name(),
            card,
            args
        );
        self.game
            .record(self.seat, ActionKind::Rejected, once(card).chain(args).collect());
    }

    /// Suspends the turn until the player answers, the timeout runs out, or
    /// the game is stopped from outside.
    async fn obtain_decision(
        &mut self,
        kind: DecisionKind,
        legal_options: Vec<Card>,
    ) -> Result<Decision, GameError> {
        let request = DecisionRequest {
            kind,
            legal_options,
            snapshot: self.game.snapshot(),
        };
        let limit = self.game.timeout_policy.timeout_for(&request.kind);

        let game = &mut *self.game;
        let actor = &mut game.seats[self.seat].actor;
        let decision = actor.request_decision(&request);
        let bounded = async {
            match limit {
                Some(limit) => tokio::time::timeout(limit, decision)
                    .await
                    .unwrap_or(Err(ActorError::Timeout)),
                None => decision.await,
            }
        };

        let answer = tokio::select! {
            answer = bounded => answer,
            _ = stopped(&mut game.stop_receiver) => return Err(GameError::Stopped),
        };
        answer
            .and_then(|d| request.validate(d))
            .map_err(GameError::from)
    }
}

async fn stopped(receiver: &mut watch::Receiver<bool>) {
    let closed = receiver.wait_for(|&stopped| stopped).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
