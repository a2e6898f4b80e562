//! Game Engine
//!
//! ## Module Structure
//!
//! - `question`: Question generation
//! - `state`: Game state, answers, players
//! - `reducer`: Pure transition function
//! - `timer`: Restartable round countdown
//! - `orchestrator`: Event merge and game-over detection
//! - `leaderboard`: Shared score ranking
//! - `events`: Lifecycle events for observers

pub mod question;
pub mod state;
pub mod reducer;
pub mod timer;
pub mod orchestrator;
pub mod leaderboard;
pub mod events;

// Re-export key types
pub use question::{Question, QuestionGenerator, Difficulty, Operation};
pub use state::{GameState, AnswerEvent, GamePhase, Player, PlayerId};
pub use reducer::next_state;
pub use timer::RoundTimer;
pub use orchestrator::{GameOrchestrator, GameError, FinishedGame};
pub use leaderboard::{LeaderBoard, LeaderBoardEntry};
pub use events::{GameEvent, GameOverReason};
