use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{card::Card, config::GameOverRule, error::GameError, result::GameEndType};

/// The shared supply. Piles only shrink when a card is gained and only grow
/// when a card is returned; trashed cards never come back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kingdom {
    piles: BTreeMap<Card, u32>,
    initial: BTreeMap<Card, u32>,
}

impl Kingdom {
    pub fn new<I>(piles: I) -> Self
    where
        I: IntoIterator<Item = (Card, u32)>,
    {
        let piles: BTreeMap<Card, u32> = piles.into_iter().collect();
        Kingdom {
            initial: piles.clone(),
            piles,
        }
    }

    pub fn standard(player_count: usize, kingdom_cards: &[Card]) -> Self {
        let players = player_count.max(1);
        let victory = if players <= 2 { 8 } else { 12 };
        let copper = 60usize.saturating_sub(players.saturating_mul(7));
        let curse = (players - 1).saturating_mul(10).max(10);
        let mut piles = vec![
            (Card::Copper, pile_size(copper)),
            (Card::Silver, 40),
            (Card::Gold, 30),
            (Card::Estate, victory),
            (Card::Duchy, victory),
            (Card::Province, victory),
            (Card::Curse, pile_size(curse)),
        ];
        piles.extend(kingdom_cards.iter().map(|&card| (card, 10)));
        Kingdom::new(piles)
    }

    pub fn piles(&self) -> &BTreeMap<Card, u32> {
        &self.piles
    }

    /// `None` if the card is not part of this supply.
    pub fn count(&self, card: Card) -> Option<u32> {
        self.piles.get(&card).copied()
    }

    pub fn initial_count(&self, card: Card) -> Option<u32> {
        self.initial.get(&card).copied()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.piles.contains_key(&card)
    }

    pub fn is_available(&self, card: Card) -> bool {
        self.count(card).unwrap_or(0) > 0
    }

    pub fn available_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.piles
            .iter()
            .filter(|&(_, &count)| count > 0)
            .map(|(&card, _)| card)
    }

    pub fn empty_piles(&self) -> Vec<Card> {
        self.piles
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&card, _)| card)
            .collect()
    }

    pub fn take(&mut self, card: Card) -> Result<(), GameError> {
        let count = self
            .piles
            .get_mut(&card)
            .ok_or(GameError::NotInSupply(card))?;
        if *count == 0 {
            return Err(GameError::SupplyExhausted(card));
        }
        *count -= 1;
        Ok(())
    }

    pub fn return_card(&mut self, card: Card) -> Result<(), GameError> {
        let initial = self.initial_count(card).ok_or(GameError::NotInSupply(card))?;
        let count = self
            .piles
            .get_mut(&card)
            .ok_or(GameError::NotInSupply(card))?;
        if *count >= initial {
            return Err(GameError::SupplyOverflow(card));
        }
        *count += 1;
        Ok(())
    }

    pub fn is_game_over(&self, rule: &GameOverRule) -> Option<GameEndType> {
        if let Some(&card) = rule
            .hard_stop_piles
            .iter()
            .find(|&&card| self.count(card) == Some(0))
        {
            return Some(GameEndType::HardStopPileEmpty(card));
        }
        let empty = self.empty_piles().len();
        if rule.empty_pile_threshold > 0 && empty >= rule.empty_pile_threshold {
            Some(GameEndType::PileThresholdReached(empty))
        } else {
            None
        }
    }

    pub fn check_invariants(&self) -> Result<(), GameError> {
        if self.piles.len() != self.initial.len() {
            return Err(GameError::InvariantViolation(
                "the set of supply piles changed".to_string(),
            ));
        }
        for (&card, &count) in &self.piles {
            match self.initial_count(card) {
                Some(initial) if count <= initial => {}
                _ => {
                    return Err(GameError::InvariantViolation(format!(
                        "supply pile {card} holds {count} cards, more than it started with"
                    )))
                }
            }
        }
        Ok(())
    }
}

fn pile_size(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use crate::{
        card::Card, config::GameOverRule, error::GameError, kingdom::Kingdom,
        result::GameEndType,
    };

    #[test]
    fn standard_kingdom_should_scale_with_player_count() {
        let two = Kingdom::standard(2, &[Card::Village]);
        assert_eq!(two.count(Card::Province), Some(8));
        assert_eq!(two.count(Card::Copper), Some(46));
        assert_eq!(two.count(Card::Curse), Some(10));
        assert_eq!(two.count(Card::Village), Some(10));
        assert_eq!(two.count(Card::Smithy), None);

        let four = Kingdom::standard(4, &[]);
        assert_eq!(four.count(Card::Province), Some(12));
        assert_eq!(four.count(Card::Curse), Some(30));
    }

    #[test]
    fn standard_kingdom_should_saturate_for_huge_tables() {
        let kingdom = Kingdom::standard(usize::MAX, &[]);
        assert_eq!(kingdom.count(Card::Copper), Some(0));
        assert_eq!(kingdom.count(Card::Province), Some(12));
        assert_eq!(kingdom.count(Card::Curse), Some(u32::MAX));
    }

    #[test]
    fn take_should_never_go_below_zero() {
        let mut kingdom = Kingdom::new([(Card::Gold, 1)]);
        assert_eq!(kingdom.take(Card::Gold), Ok(()));
        assert_eq!(kingdom.take(Card::Gold), Err(GameError::SupplyExhausted(Card::Gold)));
        assert_eq!(kingdom.count(Card::Gold), Some(0));
        assert_eq!(kingdom.take(Card::Silver), Err(GameError::NotInSupply(Card::Silver)));
    }

    #[test]
    fn return_card_should_never_exceed_the_initial_count() {
        let mut kingdom = Kingdom::new([(Card::Gold, 2)]);
        assert_eq!(kingdom.return_card(Card::Gold), Err(GameError::SupplyOverflow(Card::Gold)));
        kingdom.take(Card::Gold).unwrap();
        assert_eq!(kingdom.return_card(Card::Gold), Ok(()));
        assert_eq!(kingdom.count(Card::Gold), Some(2));
        assert_eq!(kingdom.check_invariants(), Ok(()));
    }

    #[test]
    fn game_should_end_when_a_hard_stop_pile_is_empty() {
        let mut kingdom = Kingdom::new([(Card::Province, 1), (Card::Gold, 5)]);
        let rule = GameOverRule::default();
        assert_eq!(kingdom.is_game_over(&rule), None);
        kingdom.take(Card::Province).unwrap();
        assert_eq!(
            kingdom.is_game_over(&rule),
            Some(GameEndType::HardStopPileEmpty(Card::Province))
        );
    }

    #[test]
    fn game_should_end_when_enough_piles_are_empty() {
        let kingdom = Kingdom::new([
            (Card::Province, 8),
            (Card::Village, 0),
            (Card::Smithy, 0),
            (Card::Market, 0),
        ]);
        assert_eq!(
            kingdom.is_game_over(&GameOverRule::default()),
            Some(GameEndType::PileThresholdReached(3))
        );
        let lenient = GameOverRule {
            hard_stop_piles: vec![],
            empty_pile_threshold: 4,
        };
        assert_eq!(kingdom.is_game_over(&lenient), None);
        let disabled = GameOverRule {
            hard_stop_piles: vec![],
            empty_pile_threshold: 0,
        };
        assert_eq!(kingdom.is_game_over(&disabled), None);
    }

    #[test]
    fn hard_stop_pile_outside_the_supply_should_be_ignored() {
        let kingdom = Kingdom::new([(Card::Gold, 3)]);
        assert_eq!(kingdom.is_game_over(&GameOverRule::default()), None);
    }

    #[test]
    fn check_invariants_should_catch_a_corrupted_supply() {
        assert_eq!(Kingdom::standard(3, &[Card::Chapel]).check_invariants(), Ok(()));

        let overfull: Kingdom =
            serde_json::from_str(r#"{"piles":{"Gold":4},"initial":{"Gold":3}}"#).unwrap();
        assert!(matches!(
            overfull.check_invariants(),
            Err(GameError::InvariantViolation(_))
        ));

        let grown: Kingdom =
            serde_json::from_str(r#"{"piles":{"Gold":3,"Silver":1},"initial":{"Gold":3}}"#)
                .unwrap();
        assert!(matches!(
            grown.check_invariants(),
            Err(GameError::InvariantViolation(_))
        ));
    }
}
