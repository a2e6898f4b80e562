//! # Math Master
//!
//! Timed arithmetic quiz game for chat bots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       MATH MASTER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/             - Deterministic primitives               │
//! │  └── rng.rs        - Seeded Xorshift128+ PRNG               │
//! │                                                             │
//! │  game/             - Game engine                            │
//! │  ├── question.rs   - Question generation                    │
//! │  ├── state.rs      - Game state and answer events           │
//! │  ├── reducer.rs    - Pure state transition                  │
//! │  ├── timer.rs      - Per-round countdown                    │
//! │  ├── orchestrator.rs - Answer/timer merge, game over        │
//! │  ├── leaderboard.rs  - Shared ranking                       │
//! │  └── events.rs     - Lifecycle events                       │
//! │                                                             │
//! │  network/          - Chat boundary                          │
//! │  ├── protocol.rs   - Message types                          │
//! │  ├── transport.rs  - Transport trait                        │
//! │  └── bot.rs        - run_game / show_leader_board           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The reducer never reads the clock. Given the same question seed and the
//! same answers, a game reaches the same final state; only *when* a timeout
//! happens depends on wall time.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use crate::config::GameConfig;
pub use crate::core::rng::DeterministicRng;
pub use crate::game::leaderboard::{LeaderBoard, LeaderBoardEntry};
pub use crate::game::orchestrator::{FinishedGame, GameError, GameOrchestrator};
pub use crate::game::question::{Question, QuestionGenerator};
pub use crate::game::state::{AnswerEvent, GameState, Player, PlayerId};
pub use crate::network::bot::{MathMasterBot, Outcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default countdown length per round (ticks)
pub const TIMER_MAX: i32 = 10;

/// Default tick interval (milliseconds)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
