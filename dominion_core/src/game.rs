use std::sync::Arc;

use log::{debug, error, info, warn};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tokio::sync::watch;

use crate::{
    card::Card,
    config::{GameConfig, TimeoutPolicy},
    error::GameError,
    event::{ActionKind, GameLog, LogEntry},
    kingdom::Kingdom,
    player::Player,
    player_state::PlayerState,
    result::{compute_standings, GameEndType, GameResult},
    snapshot::{CurrentPlayerState, GameStateSnapshot, PlayerSummary},
    turn::TurnController,
};

pub type GameId = u128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    Running,
    Ended(GameEndType),
}

pub(crate) struct Seat {
    pub(crate) actor: Box<dyn Player>,
    pub(crate) state: PlayerState,
}

/// Stops a running game from outside. The game ends with an error result at
/// its next decision point or between turns, whichever comes first.
#[derive(Clone)]
pub struct StopHandle {
    sender: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.sender.send_replace(true);
    }
}

pub struct Game {
    pub(crate) id: GameId,
    pub(crate) seats: Vec<Seat>,
    pub(crate) kingdom: Kingdom,
    config: GameConfig,
    pub(crate) timeout_policy: Arc<dyn TimeoutPolicy>,
    pub(crate) turn: u32,
    current: Option<usize>,
    log: GameLog,
    status: GameStatus,
    reported: bool,
    stop_sender: Arc<watch::Sender<bool>>,
    pub(crate) stop_receiver: watch::Receiver<bool>,
}

impl Game {
    /// Resets every player to the starting configuration and fixes the seating
    /// order once, at random.
    pub fn new(players: Vec<Box<dyn Player>>, kingdom: Kingdom, config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut seats: Vec<Seat> = players
            .into_iter()
            .map(|actor| {
                let mut state = PlayerState::new();
                state.set_default_state(&config, rng.gen());
                Seat { actor, state }
            })
            .collect();
        seats.shuffle(&mut rng);

        let (stop_sender, stop_receiver) = watch::channel(false);
        Game {
            id: rand::random(),
            seats,
            kingdom,
            timeout_policy: Arc::new(config.clone()),
            config,
            turn: 0,
            current: None,
            log: GameLog::default(),
            status: GameStatus::NotStarted,
            reported: false,
            stop_sender: Arc::new(stop_sender),
            stop_receiver,
        }
    }

    pub fn with_timeout_policy<P>(mut self, policy: P) -> Self
    where
        P: TimeoutPolicy + 'static,
    {
        self.timeout_policy = Arc::new(policy);
        self
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn log(&self) -> &GameLog {
        &self.log
    }

    pub fn kingdom(&self) -> &Kingdom {
        &self.kingdom
    }

    pub fn player_names(&self) -> Vec<&str> {
        self.seats.iter().map(|s| s.actor.name()).collect()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            sender: self.stop_sender.clone(),
        }
    }

    pub fn snapshot(&self) -> GameStateSnapshot {
        GameStateSnapshot {
            game_id: self.id,
            turn: self.turn,
            player_id: self.current.map(|seat| self.seats[seat].actor.id()),
            players: self
                .seats
                .iter()
                .map(|s| PlayerSummary::new(s.actor.id(), s.actor.name(), &s.state))
                .collect(),
            kingdom: self.kingdom.piles().clone(),
            player_state: self
                .current
                .map(|seat| CurrentPlayerState::from(&self.seats[seat].state)),
        }
    }

    pub(crate) fn record(&mut self, seat: usize, kind: ActionKind, args: Vec<Card>) {
        self.log.push(LogEntry {
            turn: self.turn,
            player_name: self.seats[seat].actor.name().to_string(),
            kind,
            args,
        });
    }

    /// Plays turns until the kingdom says the game is over, a fatal fault
    /// occurs, or the game is stopped. Every player is told the result once.
    pub async fn run(&mut self) -> Result<GameResult, GameError> {
        if self.status != GameStatus::NotStarted {
            return Err(GameError::AlreadyStarted);
        }
        if self.seats.is_empty() {
            return Err(GameError::NotEnoughPlayers);
        }
        self.status = GameStatus::Running;
        self.turn = 0;
        info!(
            "game {} started, seating: {}",
            self.id,
            self.player_names().join(", ")
        );

        let mut player_turn_counter = 0usize;
        let end_type = loop {
            if *self.stop_receiver.borrow() {
                warn!("game {} stopped before turn {}", self.id, self.turn);
                break GameEndType::Error;
            }
            let seat = player_turn_counter % self.seats.len();
            if seat == 0 {
                self.turn += 1;
            }
            self.current = Some(seat);
            debug!(
                "game {} turn {}: {} to act",
                self.id,
                self.turn,
                self.seats[seat].actor.name()
            );

            match TurnController::new(self, seat).play_turn().await {
                Ok(()) => {}
                Err(GameError::Stopped) => {
                    warn!("game {} stopped during turn {}", self.id, self.turn);
                    break GameEndType::Error;
                }
                Err(e) if e.is_fatal() => {
                    error!(
                        "game {} turn {}: fatal fault during {}'s turn: {}\n{}",
                        self.id,
                        self.turn,
                        self.seats[seat].actor.name(),
                        e,
                        self.log.dump()
                    );
                    break GameEndType::Error;
                }
                Err(e) => {
                    warn!(
                        "game {} turn {}: {} faulted, ending their turn: {}\n{}",
                        self.id,
                        self.turn,
                        self.seats[seat].actor.name(),
                        e,
                        self.log.dump()
                    );
                    self.record(seat, ActionKind::Fault, vec![]);
                }
            }

            self.seats[seat].state.end_turn();

            if let Err(e) = self.kingdom.check_invariants() {
                error!("game {} turn {}: {}", self.id, self.turn, e);
                break GameEndType::Error;
            }
            if let Some(end_type) = self.kingdom.is_game_over(&self.config.game_over) {
                break end_type;
            }
            player_turn_counter += 1;
        };

        Ok(self.finish(end_type).await)
    }

    /// Ends a game that is not being driven by `run`, telling every player it
    /// ended in error. Returns `None` if the result was already reported.
    pub async fn force_stop(&mut self) -> Option<GameResult> {
        if self.reported {
            return None;
        }
        self.stop_handle().stop();
        Some(self.finish(GameEndType::Error).await)
    }

    pub fn result(&self, end_type: GameEndType) -> GameResult {
        GameResult::new(
            end_type,
            self.turn,
            compute_standings(
                self.seats
                    .iter()
                    .map(|s| (s.actor.name(), s.state.victory_points())),
            ),
        )
    }

    async fn finish(&mut self, end_type: GameEndType) -> GameResult {
        let result = self.result(end_type);
        self.status = GameStatus::Ended(end_type);
        self.current = None;
        self.reported = true;
        info!(
            "game {} ended after turn {} ({:?}), winner: {}",
            self.id,
            self.turn,
            end_type,
            result.winner_name.as_deref().unwrap_or("nobody")
        );

        let limit = self.config.decision_timeout();
        for seat in self.seats.iter_mut() {
            let notify = seat.actor.notify_game_ended(&result);
            let delivered = match limit {
                Some(limit) => tokio::time::timeout(limit, notify).await.is_ok(),
                None => {
                    notify.await;
                    true
                }
            };
            if !delivered {
                warn!(
                    "game {}: {} did not take the result in time",
                    self.id,
                    seat.actor.name()
                );
            }
        }
        result
    }
}
