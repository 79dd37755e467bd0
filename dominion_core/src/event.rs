use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ActionKind {
    Play,
    Buy,
    Rejected,
    Fault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub player_name: String,
    pub kind: ActionKind,
    pub args: Vec<Card>,
}

/// Append-only record of what happened, for audit and replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GameLog {
    entries: Vec<LogEntry>,
}

impl GameLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }

    pub fn dump(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "{} {} {} {}",
                    e.turn,
                    e.player_name,
                    e.kind,
                    e.args.iter().join(",")
                )
            })
            .join("\n")
    }
}
