use std::collections::HashMap;

use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    card::Card, config::GameConfig, error::GameError, kingdom::Kingdom, utils::VecExtensions,
};

/// Everything one player owns. The deck is drawn from its end.
#[derive(Debug, Clone)]
pub struct PlayerState {
    deck: Vec<Card>,
    hand: Vec<Card>,
    discard: Vec<Card>,
    in_play: Vec<Card>,
    actions: u32,
    buys: u32,
    additional_money: u32,
    spent_money: u32,
    hand_size: usize,
    default_actions: u32,
    default_buys: u32,
    rng: StdRng,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        let config = GameConfig::default();
        PlayerState {
            deck: vec![],
            hand: vec![],
            discard: vec![],
            in_play: vec![],
            actions: config.starting_actions,
            buys: config.starting_buys,
            additional_money: 0,
            spent_money: 0,
            hand_size: config.hand_size,
            default_actions: config.starting_actions,
            default_buys: config.starting_buys,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_zones(hand: Vec<Card>, deck: Vec<Card>, discard: Vec<Card>) -> Self {
        PlayerState {
            hand,
            deck,
            discard,
            ..PlayerState::new()
        }
    }

    pub fn set_default_state(&mut self, config: &GameConfig, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.deck = config.starting_cards();
        self.deck.shuffle(&mut self.rng);
        self.hand.clear();
        self.discard.clear();
        self.in_play.clear();
        self.hand_size = config.hand_size;
        self.default_actions = config.starting_actions;
        self.default_buys = config.starting_buys;
        self.reset_counters();
        self.draw(self.hand_size);
    }

    fn reset_counters(&mut self) {
        self.actions = self.default_actions;
        self.buys = self.default_buys;
        self.additional_money = 0;
        self.spent_money = 0;
    }

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn deck(&self) -> &[Card] {
        &self.deck
    }

    pub fn discard(&self) -> &[Card] {
        &self.discard
    }

    pub fn in_play(&self) -> &[Card] {
        &self.in_play
    }

    pub fn actions(&self) -> u32 {
        self.actions
    }

    pub fn buys(&self) -> u32 {
        self.buys
    }

    pub fn additional_money(&self) -> u32 {
        self.additional_money
    }

    pub fn have_in_hand(&self, card: Card) -> bool {
        self.hand.contains(&card)
    }

    pub fn action_cards_in_hand(&self) -> Vec<Card> {
        self.hand
            .iter()
            .filter(|c| c.is_action())
            .copied()
            .unique()
            .sorted()
            .collect()
    }

    /// Draws up to `count` cards, shuffling the discard pile into the deck when
    /// the deck runs out. Returns how many were drawn.
    pub fn draw(&mut self, count: usize) -> usize {
        let mut drawn = 0;
        while drawn < count {
            if self.deck.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.deck.append(&mut self.discard);
                self.deck.shuffle(&mut self.rng);
            }
            if let Some(card) = self.deck.pop() {
                self.hand.push(card);
                drawn += 1;
            }
        }
        drawn
    }

    pub fn play_from_hand(&mut self, card: Card) -> Result<(), GameError> {
        let played = self
            .hand
            .remove_first_where(|&c| c == card)
            .ok_or(GameError::CardNotOwned(card))?;
        self.in_play.push(played);
        Ok(())
    }

    /// Destroys a card from hand. The supply is left untouched.
    pub fn trash_from_hand(&mut self, card: Card) -> Result<Card, GameError> {
        self.hand
            .remove_first_where(|&c| c == card)
            .ok_or(GameError::CardNotOwned(card))
    }

    pub fn gain(&mut self, kingdom: &mut Kingdom, card: Card) -> Result<(), GameError> {
        kingdom.take(card)?;
        self.discard.push(card);
        Ok(())
    }

    pub fn return_to_supply(&mut self, kingdom: &mut Kingdom, card: Card) -> Result<(), GameError> {
        if !self.have_in_hand(card) {
            return Err(GameError::CardNotOwned(card));
        }
        kingdom.return_card(card)?;
        self.hand.remove_first_where(|&c| c == card);
        Ok(())
    }

    pub fn add_actions(&mut self, count: u32) {
        self.actions += count;
    }

    pub fn add_buys(&mut self, count: u32) {
        self.buys += count;
    }

    pub fn add_money(&mut self, amount: u32) {
        self.additional_money += amount;
    }

    pub fn use_action(&mut self) -> bool {
        if self.actions == 0 {
            return false;
        }
        self.actions -= 1;
        true
    }

    pub fn use_buy(&mut self) -> bool {
        if self.buys == 0 {
            return false;
        }
        self.buys -= 1;
        true
    }

    pub fn available_money(&self) -> u32 {
        let treasure: u32 = self.hand.iter().map(|c| c.treasure_value()).sum();
        (treasure + self.additional_money).saturating_sub(self.spent_money)
    }

    pub fn spend(&mut self, amount: u32) -> bool {
        if self.available_money() < amount {
            return false;
        }
        self.spent_money += amount;
        true
    }

    fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.deck
            .iter()
            .chain(self.hand.iter())
            .chain(self.discard.iter())
            .chain(self.in_play.iter())
    }

    pub fn victory_points(&self) -> i32 {
        self.all_cards().map(|c| c.victory_points()).sum()
    }

    pub fn owned_cards(&self) -> HashMap<Card, usize> {
        self.all_cards().copied().counts()
    }

    pub fn owned_count(&self) -> usize {
        self.deck.len() + self.hand.len() + self.discard.len() + self.in_play.len()
    }

    /// Cleanup: everything in play and in hand goes to the discard pile, a new
    /// hand is drawn and the per-turn counters return to their defaults.
    pub fn end_turn(&mut self) {
        self.discard.append(&mut self.in_play);
        self.discard.append(&mut self.hand);
        self.reset_counters();
        self.draw(self.hand_size);
    }
}
