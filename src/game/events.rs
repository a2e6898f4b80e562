//! Game Events
//!
//! Lifecycle notifications published by the orchestrator for observers
//! (logging, tests, a future spectator view). They never feed back into the
//! game.

use serde::{Serialize, Deserialize};

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// The player answered incorrectly.
    WrongAnswer,
    /// The round timer ran out.
    Timeout,
}

/// Event emitted while a game runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// A new round began and the prompt was shown.
    RoundStarted {
        /// 1-based round number
        round: u32,
        /// Score going into the round
        score: u32,
        /// Question text
        question: String,
    },

    /// An answer was reduced.
    AnswerReceived {
        /// Raw answer text
        text: String,
        /// Whether it was correct
        correct: bool,
    },

    /// The round timer ticked.
    Tick {
        /// Ticks remaining (negative on timeout)
        remaining: i32,
    },

    /// The game reached its terminal state. Published once per game.
    GameOver {
        /// Final score
        score: u32,
        /// What ended it
        reason: GameOverReason,
    },
}

impl GameEvent {
    /// Whether this is the terminal event.
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameEvent::GameOver { .. })
    }
}
