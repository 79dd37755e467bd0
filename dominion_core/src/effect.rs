//! Card effects.
//!
//! Every playable card maps to one `CardEffect` through [`effect_for`]. An effect
//! holds no state of its own; it reads and mutates the kingdom and the acting
//! player's state only from `act`, and only after `can_act` agreed to the same
//! arguments.

use itertools::Itertools;

use crate::{
    card::Card,
    error::GameError,
    kingdom::Kingdom,
    player_state::PlayerState,
    utils::SliceExtensions,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Performed,
    NotPerformed,
}

pub trait CardEffect: Send + Sync {
    fn card(&self) -> Card;

    /// How many arguments the player is asked for before the effect resolves.
    fn arg_count(&self) -> usize {
        0
    }

    /// Legal choices for the next argument, given the ones already chosen.
    /// Empty once no further argument can be chosen.
    fn arg_options(&self, _kingdom: &Kingdom, _state: &PlayerState, _prior: &[Card]) -> Vec<Card> {
        vec![]
    }

    /// Must not mutate anything.
    fn can_act(&self, _kingdom: &Kingdom, _state: &PlayerState, _args: &[Card]) -> bool {
        true
    }

    /// Whether the card could be played at all before any argument is chosen.
    fn may_act(&self, kingdom: &Kingdom, state: &PlayerState) -> bool {
        if self.arg_count() == 0 {
            self.can_act(kingdom, state, &[])
        } else {
            !self.arg_options(kingdom, state, &[]).is_empty()
        }
    }

    /// Applies the card's rules text. Calling it twice applies it twice.
    fn act(&self, kingdom: &mut Kingdom, state: &mut PlayerState, args: &[Card]) -> Result<(), GameError>;

    fn try_act(
        &self,
        kingdom: &mut Kingdom,
        state: &mut PlayerState,
        args: &[Card],
    ) -> Result<PlayOutcome, GameError> {
        if args.len() > self.arg_count() || !self.can_act(kingdom, state, args) {
            return Ok(PlayOutcome::NotPerformed);
        }
        self.act(kingdom, state, args)?;
        Ok(PlayOutcome::Performed)
    }
}

pub fn effect_for(card: Card) -> Option<&'static dyn CardEffect> {
    match card {
        Card::Moneylender => Some(&MONEYLENDER),
        Card::Village => Some(&VILLAGE),
        Card::Smithy => Some(&SMITHY),
        Card::Market => Some(&MARKET),
        Card::Festival => Some(&FESTIVAL),
        Card::Laboratory => Some(&LABORATORY),
        Card::Woodcutter => Some(&WOODCUTTER),
        Card::Workshop => Some(&WORKSHOP),
        Card::Remodel => Some(&REMODEL),
        Card::Chapel => Some(&CHAPEL),
        _ => None,
    }
}

/// Plain "+cards, +actions, +buys, +money" cards.
pub struct Bonus {
    card: Card,
    cards: usize,
    actions: u32,
    buys: u32,
    money: u32,
}

impl CardEffect for Bonus {
    fn card(&self) -> Card {
        self.card
    }

    fn act(&self, _kingdom: &mut Kingdom, state: &mut PlayerState, _args: &[Card]) -> Result<(), GameError> {
        state.draw(self.cards);
        state.add_actions(self.actions);
        state.add_buys(self.buys);
        state.add_money(self.money);
        Ok(())
    }
}

static VILLAGE: Bonus = Bonus {
    card: Card::Village,
    cards: 1,
    actions: 2,
    buys: 0,
    money: 0,
};

static SMITHY: Bonus = Bonus {
    card: Card::Smithy,
    cards: 3,
    actions: 0,
    buys: 0,
    money: 0,
};

static MARKET: Bonus = Bonus {
    card: Card::Market,
    cards: 1,
    actions: 1,
    buys: 1,
    money: 1,
};

static FESTIVAL: Bonus = Bonus {
    card: Card::Festival,
    cards: 0,
    actions: 2,
    buys: 1,
    money: 2,
};

static LABORATORY: Bonus = Bonus {
    card: Card::Laboratory,
    cards: 2,
    actions: 1,
    buys: 0,
    money: 0,
};

static WOODCUTTER: Bonus = Bonus {
    card: Card::Woodcutter,
    cards: 0,
    actions: 0,
    buys: 1,
    money: 2,
};

/// Trashes one copy of `target` from hand for a flat money bonus.
pub struct TrashForMoney {
    card: Card,
    target: Card,
    money: u32,
}

impl CardEffect for TrashForMoney {
    fn card(&self) -> Card {
        self.card
    }

    fn can_act(&self, _kingdom: &Kingdom, state: &PlayerState, _args: &[Card]) -> bool {
        state.have_in_hand(self.target)
    }

    fn act(&self, _kingdom: &mut Kingdom, state: &mut PlayerState, _args: &[Card]) -> Result<(), GameError> {
        state.trash_from_hand(self.target)?;
        state.add_money(self.money);
        Ok(())
    }
}

static MONEYLENDER: TrashForMoney = TrashForMoney {
    card: Card::Moneylender,
    target: Card::Copper,
    money: 3,
};

fn gainable(kingdom: &Kingdom, max_cost: u32) -> Vec<Card> {
    kingdom
        .available_cards()
        .filter(|c| c.cost() <= max_cost)
        .collect()
}

fn wrong_argument_count(effect: &dyn CardEffect, args: &[Card]) -> GameError {
    GameError::WrongArgumentCount {
        card: effect.card(),
        expected: effect.arg_count(),
        got: args.len(),
    }
}

fn distinct(cards: &[Card]) -> Vec<Card> {
    cards.iter().copied().unique().sorted().collect()
}

pub struct Workshop {
    max_cost: u32,
}

impl CardEffect for Workshop {
    fn card(&self) -> Card {
        Card::Workshop
    }

    fn arg_count(&self) -> usize {
        1
    }

    fn arg_options(&self, kingdom: &Kingdom, _state: &PlayerState, prior: &[Card]) -> Vec<Card> {
        if prior.is_empty() {
            gainable(kingdom, self.max_cost)
        } else {
            vec![]
        }
    }

    fn can_act(&self, kingdom: &Kingdom, _state: &PlayerState, args: &[Card]) -> bool {
        match args {
            [gained] => kingdom.is_available(*gained) && gained.cost() <= self.max_cost,
            _ => false,
        }
    }

    fn act(&self, kingdom: &mut Kingdom, state: &mut PlayerState, args: &[Card]) -> Result<(), GameError> {
        let [gained] = args else {
            return Err(wrong_argument_count(self, args));
        };
        state.gain(kingdom, *gained)
    }
}

static WORKSHOP: Workshop = Workshop { max_cost: 4 };

/// Arguments: the card to trash, then the card to gain.
pub struct Remodel {
    extra_cost: u32,
}

impl CardEffect for Remodel {
    fn card(&self) -> Card {
        Card::Remodel
    }

    fn arg_count(&self) -> usize {
        2
    }

    fn arg_options(&self, kingdom: &Kingdom, state: &PlayerState, prior: &[Card]) -> Vec<Card> {
        match prior {
            [] => distinct(state.hand()),
            [trashed] => gainable(kingdom, trashed.cost() + self.extra_cost),
            _ => vec![],
        }
    }

    fn can_act(&self, kingdom: &Kingdom, state: &PlayerState, args: &[Card]) -> bool {
        match args {
            [trashed, gained] => {
                state.have_in_hand(*trashed)
                    && kingdom.is_available(*gained)
                    && gained.cost() <= trashed.cost() + self.extra_cost
            }
            _ => false,
        }
    }

    fn act(&self, kingdom: &mut Kingdom, state: &mut PlayerState, args: &[Card]) -> Result<(), GameError> {
        let [trashed, gained] = args else {
            return Err(wrong_argument_count(self, args));
        };
        state.trash_from_hand(*trashed)?;
        state.gain(kingdom, *gained)
    }
}

static REMODEL: Remodel = Remodel { extra_cost: 2 };

/// Trashes up to `max` cards from hand; fewer arguments trash fewer cards.
pub struct Chapel {
    max: usize,
}

impl CardEffect for Chapel {
    fn card(&self) -> Card {
        Card::Chapel
    }

    fn arg_count(&self) -> usize {
        self.max
    }

    fn arg_options(&self, _kingdom: &Kingdom, state: &PlayerState, prior: &[Card]) -> Vec<Card> {
        if prior.len() >= self.max {
            return vec![];
        }
        distinct(&state.hand().without(prior))
    }

    fn can_act(&self, _kingdom: &Kingdom, state: &PlayerState, args: &[Card]) -> bool {
        state.hand().contains_all(args)
    }

    fn may_act(&self, _kingdom: &Kingdom, _state: &PlayerState) -> bool {
        true
    }

    fn act(&self, _kingdom: &mut Kingdom, state: &mut PlayerState, args: &[Card]) -> Result<(), GameError> {
        for &card in args {
            state.trash_from_hand(card)?;
        }
        Ok(())
    }
}

static CHAPEL: Chapel = Chapel { max: 4 };
