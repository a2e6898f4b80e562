//! Game State Definitions
//!
//! The single record threaded through a game, the answer events fed into it,
//! and player identity.

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::game::question::Question;

// =============================================================================
// PLAYER
// =============================================================================

/// Player identifier as given by the chat transport.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create from any string-like id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The person playing a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable identifier
    pub id: PlayerId,
    /// Display name
    pub name: String,
}

impl Player {
    /// Create a player.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(id),
            name: name.into(),
        }
    }
}

// =============================================================================
// ANSWER EVENT
// =============================================================================

/// One answer typed by the player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    /// Raw text as received
    pub text: String,
}

impl AnswerEvent {
    /// Create from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Numeric value, if the text is an integer.
    ///
    /// Anything that does not parse counts as a wrong answer.
    pub fn value(&self) -> Option<i64> {
        self.text.trim().parse().ok()
    }
}

impl From<i64> for AnswerEvent {
    fn from(value: i64) -> Self {
        Self::new(value.to_string())
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Snapshot of a game. Never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Correct answers so far
    pub score: u32,
    /// Active question
    pub question: Question,
    /// Ticks remaining in the round. Negative means the game is over.
    pub timer: i32,
}

impl GameState {
    /// State before the first round.
    pub fn initial() -> Self {
        Self {
            score: 0,
            question: Question::placeholder(),
            timer: 0,
        }
    }

    /// Whether this is a terminal state.
    #[inline]
    pub fn is_over(&self) -> bool {
        self.timer < 0
    }

    /// Copy of this state with a different timer value.
    pub fn with_timer(&self, timer: i32) -> Self {
        Self {
            timer,
            ..self.clone()
        }
    }
}

// =============================================================================
// GAME PHASE
// =============================================================================

/// Where the orchestrator is in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No round has started yet.
    AwaitingFirstRound,
    /// Prompt shown, timer running, waiting for an answer.
    InRound,
    /// An answer was just reduced; checking for a wrong answer.
    RoundCheckpointAfterAnswer,
    /// A tick was just received; checking for a timeout.
    InRoundTimer,
    /// Terminal.
    GameOver,
}
