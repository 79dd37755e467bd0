use std::{
    io::{self, BufRead, Write},
    str::FromStr,
    thread,
};

use async_trait::async_trait;
use itertools::Itertools;
use log::debug;
use tokio::sync::mpsc::{self, Receiver};

use dominion_core::{
    card::Card,
    decision::{Decision, DecisionKind, DecisionRequest},
    error::ActorError,
    player::{Player, PlayerData, PlayerId},
    result::GameResult,
    snapshot::GameStateSnapshot,
};

static RULES: &str = "
*** Dominion ***
Every player starts with a small deck of Coppers and Estates and draws a hand of five cards.
On your turn you may first play action cards, one per available action. Then you may buy cards
from the supply with the money in your hand, one card per available buy. Bought cards go to your
discard pile and are shuffled into your deck once it runs out. At the end of the turn your hand
and everything you played is discarded and you draw a fresh hand.
The game ends when the Provinces run out or when enough supply piles are empty. The player with
the most victory points wins. Press c to see what card does what.";

#[derive(Debug, PartialEq)]
enum CliAction {
    Quit,
    Rules,
    CardEffects,
    Decline,
    Card(Card),
}

#[derive(Debug, PartialEq, Eq)]
struct ParseActionError;

impl CliAction {
    fn info(&self, kind: &DecisionKind) -> String {
        match self {
            CliAction::Quit => "end the turn".to_string(),
            CliAction::Rules => "display rules".to_string(),
            CliAction::CardEffects => "display card effects".to_string(),
            CliAction::Decline => match kind {
                DecisionKind::PlayAction => "stop playing actions".to_string(),
                DecisionKind::Buy => "stop buying".to_string(),
                DecisionKind::Clarify { .. } => "choose nothing more".to_string(),
            },
            CliAction::Card(c) => c.rule(),
        }
    }

    fn cmd_str(&self) -> String {
        match self {
            CliAction::Quit => "q".to_string(),
            CliAction::Rules => "r".to_string(),
            CliAction::CardEffects => "c".to_string(),
            CliAction::Decline => "d".to_string(),
            CliAction::Card(c) => c.to_string(),
        }
    }
}

impl FromStr for CliAction {
    type Err = ParseActionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "q" => Ok(CliAction::Quit),
            "r" => Ok(CliAction::Rules),
            "c" => Ok(CliAction::CardEffects),
            "d" => Ok(CliAction::Decline),
            other => Card::from_str(other)
                .map(CliAction::Card)
                .map_err(|_| ParseActionError),
        }
    }
}

fn prompt(kind: &DecisionKind) -> String {
    match kind {
        DecisionKind::PlayAction => "Choose the action card you want to play:".to_string(),
        DecisionKind::Buy => "Choose the card you want to buy:".to_string(),
        DecisionKind::Clarify {
            card,
            slot,
            arg_count,
        } => format!(
            "Choose card {} of {} for {}:",
            slot + 1,
            arg_count,
            card
        ),
    }
}

fn read_line() -> Option<String> {
    match io::stdin().lock().lines().next() {
        Some(Ok(line)) => Some(line),
        _ => None,
    }
}

/// Forwards stdin line by line from a dedicated thread. A prompt that is
/// abandoned mid-wait leaves the next line in the channel for the next prompt.
fn stdin_lines() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
        debug!("stdin closed");
    });
    receiver
}

pub struct CliPlayer {
    pub data: PlayerData,
    lines: Receiver<String>,
}

impl CliPlayer {
    pub fn new(id: PlayerId) -> CliPlayer {
        print!("Please Enter Name: ");
        let _ = io::stdout().flush();

        let name = read_line().unwrap_or_else(|| "You".to_string());

        CliPlayer::with_input(id, name, stdin_lines())
    }

    fn with_input(id: PlayerId, name: String, lines: Receiver<String>) -> CliPlayer {
        CliPlayer {
            data: PlayerData::new(id, name),
            lines,
        }
    }

    async fn query_user(&mut self, cmds: &[CliAction], kind: &DecisionKind) -> Result<CliAction, ActorError> {
        print!("\n{}\n", prompt(kind));
        loop {
            for cmd in cmds {
                println!("- [{}]: {}", cmd.cmd_str(), cmd.info(kind));
            }
            print!(">");
            let _ = io::stdout().flush();
            let line = self.lines.recv().await.ok_or(ActorError::Disconnected)?;
            match CliAction::from_str(&line) {
                Ok(action) if cmds.contains(&action) => return Ok(action),
                _ => println!("Unknown command: {}", line.trim()),
            }
        }
    }

    fn print_snapshot(&self, snapshot: &GameStateSnapshot) {
        println!("================================================");
        println!("Turn {}", snapshot.turn);
        for p in &snapshot.players {
            println!(
                "~ {}: {} VP, {} in hand, {} in deck, {} discarded",
                p.name, p.victory_points, p.hand_size, p.deck_size, p.discard_size
            );
        }
        println!(
            "~ Supply: {}",
            snapshot
                .kingdom
                .iter()
                .map(|(card, count)| format!("{card} x{count}"))
                .join(", ")
        );
        if let Some(state) = &snapshot.player_state {
            println!("~ Hand: {}", state.hand.iter().join(", "));
            if !state.in_play.is_empty() {
                println!("~ In play: {}", state.in_play.iter().join(", "));
            }
            println!(
                "~ Actions: {}, Buys: {}, Money: {}",
                state.actions, state.buys, state.available_money
            );
        }
    }
}

#[async_trait]
impl Player for CliPlayer {
    fn data(&self) -> &PlayerData {
        &self.data
    }

    async fn request_decision(&mut self, request: &DecisionRequest) -> Result<Decision, ActorError> {
        self.print_snapshot(&request.snapshot);

        let cmds = [CliAction::Quit, CliAction::Rules, CliAction::CardEffects, CliAction::Decline]
            .into_iter()
            .chain(request.legal_options.iter().map(|&c| CliAction::Card(c)))
            .collect_vec();

        loop {
            match self.query_user(&cmds, &request.kind).await? {
                CliAction::Quit => return Ok(Decision::EndTurn),
                CliAction::Rules => println!("{}", RULES),
                CliAction::CardEffects => println!("{}", Card::rules()),
                CliAction::Decline => return Ok(Decision::Decline),
                CliAction::Card(c) => return Ok(Decision::Choose(c)),
            }
        }
    }

    async fn notify_game_ended(&mut self, result: &GameResult) {
        println!("================================================");
        println!("Game over after {} turns ({:?})", result.turn, result.end_type);
        for p in &result.players {
            println!("{}. {} with {} VP", p.place, p.name, p.victory_points);
        }
        if let Some(winner) = &result.winner_name {
            println!("Winner is {}", winner);
        }
    }
}
