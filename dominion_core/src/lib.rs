use config::GameConfig;
use error::GameError;
use game_lobby::GameLobby;
use player::{Player, PlayerId};
use random_playing_computer::RandomPlayingComputer;
use result::GameResult;

pub mod card;
pub mod config;
pub mod decision;
pub mod effect;
pub mod error;
pub mod event;
pub mod game;
pub mod game_lobby;
pub mod kingdom;
pub mod player;
pub mod player_state;
pub mod random_playing_computer;
pub mod remote_player;
pub mod result;
pub mod snapshot;
mod turn;
pub mod utils;

/// Plays one game of the given player against three computers.
pub async fn run_game<C, T>(config: GameConfig, player_constructor: C) -> Result<GameResult, GameError>
where
    C: FnOnce(PlayerId) -> T,
    T: Player + 'static,
{
    let mut lobby = GameLobby::new(config);
    lobby.add_player(player_constructor);
    lobby.add_player(RandomPlayingComputer::new);
    lobby.add_player(RandomPlayingComputer::new);
    lobby.add_player(RandomPlayingComputer::new);
    lobby.into_game().run().await
}
