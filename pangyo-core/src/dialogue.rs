//! The per-stage dialogue log.
//!
//! Turns are append-only while a stage is active; the log is cleared when a
//! stage transition completes or the session returns to the main screen.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Who produced a dialogue turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Npc,
    User,
    EmployeeA,
    EmployeeB,
}

impl Sender {
    /// Map a collaborator speaker tag to a sender.
    ///
    /// Unknown speakers fall back to the NPC.
    pub fn from_speaker(speaker: &str) -> Self {
        match speaker {
            "user" => Sender::User,
            "employee_a" => Sender::EmployeeA,
            "employee_b" => Sender::EmployeeB,
            _ => Sender::Npc,
        }
    }
}

/// One turn in the conversation pane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

impl DialogueTurn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: clock_time(),
        }
    }

    pub fn npc(text: impl Into<String>) -> Self {
        Self::new(Sender::Npc, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }
}

/// Append-only log of the active stage's conversation.
#[derive(Debug, Default, Clone)]
pub struct DialogueLog {
    turns: Vec<DialogueTurn>,
}

impl DialogueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: DialogueTurn) {
        self.turns.push(turn);
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[DialogueTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&DialogueTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Wall-clock time as "H:MM".
///
/// Computed from the epoch without a calendar dependency; presentation only.
fn clock_time() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let minutes_of_day = (secs / 60) % (24 * 60);
    format!("{}:{:02}", minutes_of_day / 60, minutes_of_day % 60)
}
