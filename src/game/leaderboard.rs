//! Leader Board
//!
//! Process-wide ranking of player scores. Cheap to clone; every clone shares
//! the same board.
//!
//! ## Ranking Policy
//!
//! - One entry per player id, holding that player's best score.
//! - `games_played` counts every registration, best or not.
//! - Entries rank by score descending. Ties go to whoever reached that score
//!   first.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::game::state::PlayerId;

/// Message shown when nobody has finished a game yet.
pub const EMPTY_BOARD_MESSAGE: &str = "No scores yet: 0 players, 0 games played.";

/// One player's standing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderBoardEntry {
    /// Player identifier
    pub player_id: PlayerId,
    /// Latest display name
    pub player_name: String,
    /// Best score
    pub score: u32,
    /// Games finished by this player
    pub games_played: u32,
    /// When the best score was set
    pub recorded_at: DateTime<Utc>,
    /// Registration sequence number of the best score (tie-break)
    #[serde(skip)]
    sequence: u64,
}

#[derive(Debug, Default)]
struct BoardInner {
    entries: BTreeMap<PlayerId, LeaderBoardEntry>,
    games_played: u64,
    next_sequence: u64,
}

impl BoardInner {
    fn ranked(&self) -> Vec<LeaderBoardEntry> {
        let mut ranked: Vec<_> = self.entries.values().cloned().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.sequence.cmp(&b.sequence)));
        ranked
    }
}

/// Shared leader board.
#[derive(Clone, Debug, Default)]
pub struct LeaderBoard {
    inner: Arc<RwLock<BoardInner>>,
}

impl LeaderBoard {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished game. Never fails.
    pub async fn register(&self, player_id: PlayerId, player_name: impl Into<String>, score: u32) {
        let player_name = player_name.into();
        let mut board = self.inner.write().await;

        board.games_played += 1;
        let sequence = board.next_sequence;
        board.next_sequence += 1;

        match board.entries.get_mut(&player_id) {
            Some(entry) => {
                entry.player_name = player_name;
                entry.games_played += 1;
                if score > entry.score {
                    entry.score = score;
                    entry.sequence = sequence;
                    entry.recorded_at = Utc::now();
                }
            }
            None => {
                board.entries.insert(player_id.clone(), LeaderBoardEntry {
                    player_id: player_id.clone(),
                    player_name,
                    score,
                    games_played: 1,
                    recorded_at: Utc::now(),
                    sequence,
                });
            }
        }

        debug!(player = %player_id, score, "score registered");
    }

    /// Ranked entries, best first.
    pub async fn entries(&self) -> Vec<LeaderBoardEntry> {
        self.inner.read().await.ranked()
    }

    /// Number of distinct players on the board.
    pub async fn player_count(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Total games registered.
    pub async fn games_played(&self) -> u64 {
        self.inner.read().await.games_played
    }

    /// Render the ranking. `top_n = None` lists everybody.
    pub async fn report(&self, top_n: Option<usize>) -> String {
        let board = self.inner.read().await;

        if board.entries.is_empty() {
            return EMPTY_BOARD_MESSAGE.to_string();
        }

        let mut out = format!(
            "Math Master Leader Board ({} players, {} games)",
            board.entries.len(),
            board.games_played,
        );

        let ranked = board.ranked();
        let shown = top_n.unwrap_or(ranked.len());
        for (i, entry) in ranked.iter().take(shown).enumerate() {
            let _ = write!(out, "\n{}. {}: {}", i + 1, entry.player_name, entry.score);
        }

        out
    }

    /// Ranked entries as JSON.
    pub async fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.entries().await)
    }

    /// Remove everything.
    pub async fn reset(&self) {
        let mut board = self.inner.write().await;
        *board = BoardInner::default();
    }
}
