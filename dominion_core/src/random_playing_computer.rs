use async_trait::async_trait;
use itertools::Itertools;
use rand::seq::SliceRandom;

use crate::{
    card::Card,
    decision::{Decision, DecisionKind, DecisionRequest},
    error::ActorError,
    player::{Player, PlayerData, PlayerId},
    result::GameResult,
};

pub struct RandomPlayingComputer {
    data: PlayerData,
}

impl RandomPlayingComputer {
    pub fn new(id: PlayerId) -> Self {
        RandomPlayingComputer {
            data: PlayerData::new(id, format!("Computer {id}")),
        }
    }

    fn choose(request: &DecisionRequest) -> Decision {
        let mut rng = rand::thread_rng();
        let card = match request.kind {
            DecisionKind::Buy => {
                let worth_buying = request
                    .legal_options
                    .iter()
                    .filter(|c| !matches!(c, Card::Copper | Card::Curse))
                    .copied()
                    .collect_vec();
                let best = worth_buying.iter().map(|c| c.cost()).max();
                worth_buying
                    .into_iter()
                    .filter(|c| Some(c.cost()) == best)
                    .collect_vec()
                    .choose(&mut rng)
                    .copied()
            }
            DecisionKind::PlayAction | DecisionKind::Clarify { .. } => {
                request.legal_options.choose(&mut rng).copied()
            }
        };
        card.map_or(Decision::Decline, Decision::Choose)
    }
}

#[async_trait]
impl Player for RandomPlayingComputer {
    fn data(&self) -> &PlayerData {
        &self.data
    }

    async fn request_decision(&mut self, request: &DecisionRequest) -> Result<Decision, ActorError> {
        Ok(RandomPlayingComputer::choose(request))
    }

    async fn notify_game_ended(&mut self, _result: &GameResult) {}
}

#[cfg(test)]
mod tests {
    use crate::{
        card::Card,
        decision::{Decision, DecisionKind, DecisionRequest},
        player::Player,
        random_playing_computer::RandomPlayingComputer,
        snapshot::GameStateSnapshot,
    };

    fn request(kind: DecisionKind, legal_options: Vec<Card>) -> DecisionRequest {
        DecisionRequest {
            kind,
            legal_options,
            snapshot: GameStateSnapshot::default(),
        }
    }

    #[test]
    fn computer_should_buy_the_most_expensive_card() {
        let request = request(
            DecisionKind::Buy,
            vec![Card::Copper, Card::Silver, Card::Gold, Card::Village],
        );
        assert_eq!(
            RandomPlayingComputer::choose(&request),
            Decision::Choose(Card::Gold)
        );
    }

    #[test]
    fn computer_should_not_buy_copper_or_curses() {
        let request = request(DecisionKind::Buy, vec![Card::Copper, Card::Curse]);
        assert_eq!(RandomPlayingComputer::choose(&request), Decision::Decline);
    }

    #[test]
    fn computer_should_only_pick_legal_options() {
        let options = vec![Card::Village, Card::Smithy];
        let request = request(DecisionKind::PlayAction, options.clone());
        for _ in 0..20 {
            let decision = RandomPlayingComputer::choose(&request);
            assert!(request.validate(decision).is_ok());
            assert_ne!(decision, Decision::EndTurn);
        }
    }

    #[test]
    fn computer_should_decline_when_there_is_nothing_to_choose() {
        let request = request(
            DecisionKind::Clarify {
                card: Card::Chapel,
                slot: 0,
                arg_count: 4,
            },
            vec![],
        );
        assert_eq!(RandomPlayingComputer::choose(&request), Decision::Decline);
        assert_eq!(RandomPlayingComputer::new(2).name(), "Computer 2");
    }
}
