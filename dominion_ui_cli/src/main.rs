use std::{env, fs};

use cli_player::CliPlayer;
use dominion_core::{config::GameConfig, run_game};
use log::error;

mod cli_player;

fn load_config() -> Result<GameConfig, String> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
            GameConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
        }
        None => Ok(GameConfig {
            decision_timeout_ms: None,
            ..Default::default()
        }),
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("could not read the game configuration: {e}");
            return;
        }
    };

    if let Err(e) = run_game(config, CliPlayer::new).await {
        error!("game could not be played: {e}");
    }
}
