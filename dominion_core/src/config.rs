use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{card::Card, decision::DecisionKind};

/// When a game ends: any hard-stop pile runs out, or enough piles run out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOverRule {
    pub hard_stop_piles: Vec<Card>,
    /// Zero disables the threshold.
    pub empty_pile_threshold: usize,
}

impl Default for GameOverRule {
    fn default() -> Self {
        GameOverRule {
            hard_stop_piles: vec![Card::Province],
            empty_pile_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub hand_size: usize,
    pub starting_actions: u32,
    pub starting_buys: u32,
    pub starting_deck: Vec<(Card, usize)>,
    pub kingdom_cards: Vec<Card>,
    pub game_over: GameOverRule,
    pub decision_timeout_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            hand_size: 5,
            starting_actions: 1,
            starting_buys: 1,
            starting_deck: vec![(Card::Copper, 7), (Card::Estate, 3)],
            kingdom_cards: vec![
                Card::Moneylender,
                Card::Village,
                Card::Smithy,
                Card::Market,
                Card::Festival,
                Card::Laboratory,
                Card::Woodcutter,
                Card::Workshop,
                Card::Remodel,
                Card::Chapel,
            ],
            game_over: GameOverRule::default(),
            decision_timeout_ms: Some(30_000),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn starting_cards(&self) -> Vec<Card> {
        self.starting_deck
            .iter()
            .flat_map(|&(card, count)| std::iter::repeat(card).take(count))
            .collect()
    }

    pub fn decision_timeout(&self) -> Option<Duration> {
        self.decision_timeout_ms.map(Duration::from_millis)
    }
}

/// How long the engine waits for a player before treating the silence as a fault.
/// `None` waits indefinitely.
pub trait TimeoutPolicy: Send + Sync {
    fn timeout_for(&self, kind: &DecisionKind) -> Option<Duration>;
}

impl TimeoutPolicy for GameConfig {
    fn timeout_for(&self, _kind: &DecisionKind) -> Option<Duration> {
        self.decision_timeout()
    }
}

pub struct FixedTimeout(pub Duration);

impl TimeoutPolicy for FixedTimeout {
    fn timeout_for(&self, _kind: &DecisionKind) -> Option<Duration> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{
        card::Card,
        config::{GameConfig, TimeoutPolicy},
        decision::DecisionKind,
    };

    #[test]
    fn default_config_should_describe_the_standard_start() {
        let config = GameConfig::default();
        let cards = config.starting_cards();
        assert_eq!(cards.len(), 10);
        assert_eq!(cards.iter().filter(|&&c| c == Card::Copper).count(), 7);
        assert_eq!(config.game_over.hard_stop_piles, vec![Card::Province]);
        assert_eq!(config.game_over.empty_pile_threshold, 3);
    }

    #[test]
    fn from_json_should_fill_missing_fields_with_defaults() {
        let config = GameConfig::from_json(
            r#"{ "hand_size": 6, "game_over": { "empty_pile_threshold": 4 }, "decision_timeout_ms": null }"#,
        )
        .unwrap();
        assert_eq!(config.hand_size, 6);
        assert_eq!(config.starting_buys, 1);
        assert_eq!(config.game_over.empty_pile_threshold, 4);
        assert_eq!(config.game_over.hard_stop_piles, vec![Card::Province]);
        assert_eq!(config.timeout_for(&DecisionKind::Buy), None);
    }

    #[test]
    fn from_json_should_reject_unknown_cards() {
        assert!(GameConfig::from_json(r#"{ "kingdom_cards": ["Princess"] }"#).is_err());
    }

    #[test]
    fn config_timeout_should_apply_to_every_decision() {
        let config = GameConfig {
            decision_timeout_ms: Some(250),
            ..Default::default()
        };
        assert_eq!(
            config.timeout_for(&DecisionKind::PlayAction),
            Some(Duration::from_millis(250))
        );
    }
}
