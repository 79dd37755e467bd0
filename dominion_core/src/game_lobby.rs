use crate::{
    config::GameConfig,
    game::Game,
    kingdom::Kingdom,
    player::{Player, PlayerId},
};

pub struct GameLobby {
    players: Vec<Box<dyn Player>>,
    config: GameConfig,
}

impl GameLobby {
    pub fn new(config: GameConfig) -> Self {
        GameLobby {
            players: vec![],
            config,
        }
    }

    pub fn add_player<C, T>(&mut self, player_constructor: C) -> PlayerId
    where
        C: FnOnce(PlayerId) -> T,
        T: Player + 'static,
    {
        let id = self.players.len();
        let player = player_constructor(id);
        self.players.push(Box::new(player));
        id
    }

    pub fn player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name()).collect::<Vec<_>>()
    }

    /// Seats everyone at a table with the standard supply for the configured
    /// kingdom cards.
    pub fn into_game(self) -> Game {
        let kingdom = Kingdom::standard(self.players.len(), &self.config.kingdom_cards);
        Game::new(self.players, kingdom, self.config)
    }
}
