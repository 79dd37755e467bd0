use std::cmp::Reverse;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEndType {
    HardStopPileEmpty(Card),
    PileThresholdReached(usize),
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerVictory {
    pub name: String,
    pub place: usize,
    pub victory_points: i32,
}

/// The payload every player receives exactly once when a game ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub end_type: GameEndType,
    pub turn: u32,
    pub players: Vec<PlayerVictory>,
    pub winner_name: Option<String>,
}

impl GameResult {
    pub fn new(end_type: GameEndType, turn: u32, players: Vec<PlayerVictory>) -> Self {
        let winner_name = players.first().map(|p| p.name.clone());
        GameResult {
            end_type,
            turn,
            players,
            winner_name,
        }
    }

    pub fn is_error(&self) -> bool {
        self.end_type == GameEndType::Error
    }
}

/// Ranks players by victory points, most first. Ties keep seating order.
pub fn compute_standings<'a, I>(players: I) -> Vec<PlayerVictory>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    players
        .into_iter()
        .sorted_by_key(|&(_, victory_points)| Reverse(victory_points))
        .enumerate()
        .map(|(i, (name, victory_points))| PlayerVictory {
            name: name.to_string(),
            place: i + 1,
            victory_points,
        })
        .collect()
}
