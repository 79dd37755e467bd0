use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{card::Card, game::GameId, player::PlayerId, player_state::PlayerState};

/// What everyone may know about a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub victory_points: i32,
    pub hand_size: usize,
    pub deck_size: usize,
    pub discard_size: usize,
    pub in_play: Vec<Card>,
}

impl PlayerSummary {
    pub fn new(id: PlayerId, name: &str, state: &PlayerState) -> Self {
        PlayerSummary {
            id,
            name: name.to_string(),
            victory_points: state.victory_points(),
            hand_size: state.hand().len(),
            deck_size: state.deck().len(),
            discard_size: state.discard().len(),
            in_play: state.in_play().to_vec(),
        }
    }
}

/// The acting player's private view of their own state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPlayerState {
    pub hand: Vec<Card>,
    pub in_play: Vec<Card>,
    pub deck_size: usize,
    pub discard_size: usize,
    pub actions: u32,
    pub buys: u32,
    pub additional_money: u32,
    pub available_money: u32,
}

impl From<&PlayerState> for CurrentPlayerState {
    fn from(state: &PlayerState) -> Self {
        CurrentPlayerState {
            hand: state.hand().to_vec(),
            in_play: state.in_play().to_vec(),
            deck_size: state.deck().len(),
            discard_size: state.discard().len(),
            actions: state.actions(),
            buys: state.buys(),
            additional_money: state.additional_money(),
            available_money: state.available_money(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub game_id: GameId,
    pub turn: u32,
    pub player_id: Option<PlayerId>,
    pub players: Vec<PlayerSummary>,
    pub kingdom: BTreeMap<Card, u32>,
    pub player_state: Option<CurrentPlayerState>,
}
