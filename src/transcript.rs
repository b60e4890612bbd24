use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// Append-only record of one intake session.
///
/// The first turn is always the synthetic priming message; it is a user turn
/// that no human ever typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn seeded(seed: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::user(seed)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of user turns typed by the human, i.e. excluding the seed.
    pub fn human_turns(&self) -> usize {
        self.turns
            .iter()
            .skip(1)
            .filter(|turn| turn.role == Role::User)
            .count()
    }

    /// Plain-text rendering, one `role: text` entry per turn.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.text))
            .join("\n")
    }
}
