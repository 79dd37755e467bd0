use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString};

use crate::effect::{effect_for, CardEffect};

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum CardType {
    Treasure,
    Victory,
    Curse,
    Action,
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    Clone,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    Serialize,
    Deserialize,
)]
pub enum Card {
    #[strum(message = "Worth $1.")]
    Copper,
    #[strum(message = "Worth $2.")]
    Silver,
    #[strum(message = "Worth $3.")]
    Gold,
    #[strum(message = "Worth 1 victory point.")]
    Estate,
    #[strum(message = "Worth 3 victory points.")]
    Duchy,
    #[strum(message = "Worth 6 victory points.")]
    Province,
    #[strum(message = "Worth -1 victory point.")]
    Curse,
    #[strum(message = "You may trash a Copper from your hand for +$3.")]
    Moneylender,
    #[strum(message = "+1 Card, +2 Actions.")]
    Village,
    #[strum(message = "+3 Cards.")]
    Smithy,
    #[strum(message = "+1 Card, +1 Action, +1 Buy, +$1.")]
    Market,
    #[strum(message = "+2 Actions, +1 Buy, +$2.")]
    Festival,
    #[strum(message = "+2 Cards, +1 Action.")]
    Laboratory,
    #[strum(message = "+1 Buy, +$2.")]
    Woodcutter,
    #[strum(message = "Gain a card costing up to $4.")]
    Workshop,
    #[strum(message = "Trash a card from your hand. Gain a card costing up to $2 more than it.")]
    Remodel,
    #[strum(message = "Trash up to 4 cards from your hand.")]
    Chapel,
}

impl Card {
    pub fn rules() -> String {
        Card::iter().map(|c| c.rule()).join("\n")
    }

    pub fn rule(&self) -> String {
        format!(
            "{} [cost = {}]: {}",
            self,
            self.cost(),
            self.get_message().unwrap_or("No rule")
        )
    }

    pub fn cost(&self) -> u32 {
        match self {
            Card::Copper | Card::Curse => 0,
            Card::Estate | Card::Chapel => 2,
            Card::Silver | Card::Village | Card::Woodcutter | Card::Workshop => 3,
            Card::Moneylender | Card::Smithy | Card::Remodel => 4,
            Card::Duchy | Card::Market | Card::Festival | Card::Laboratory => 5,
            Card::Gold => 6,
            Card::Province => 8,
        }
    }

    pub fn card_type(&self) -> CardType {
        match self {
            Card::Copper | Card::Silver | Card::Gold => CardType::Treasure,
            Card::Estate | Card::Duchy | Card::Province => CardType::Victory,
            Card::Curse => CardType::Curse,
            _ => CardType::Action,
        }
    }

    pub fn is_action(&self) -> bool {
        self.card_type() == CardType::Action
    }

    pub fn treasure_value(&self) -> u32 {
        match self {
            Card::Copper => 1,
            Card::Silver => 2,
            Card::Gold => 3,
            _ => 0,
        }
    }

    pub fn victory_points(&self) -> i32 {
        match self {
            Card::Estate => 1,
            Card::Duchy => 3,
            Card::Province => 6,
            Card::Curse => -1,
            _ => 0,
        }
    }

    /// The effect resolved when this card is played, if it has one.
    pub fn effect(&self) -> Option<&'static dyn CardEffect> {
        effect_for(*self)
    }
}
