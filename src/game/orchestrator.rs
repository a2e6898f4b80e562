//! Game Orchestrator
//!
//! Drives one game: merges the player's answers with the round timer, folds
//! every event through the reducer and stops at the first terminal state.
//!
//! ```text
//!   answers ──┐
//!             ├─ select! (biased) ─> reducer / tick ─> checkpoint ─> prompt
//!   ticks ────┘                                           │
//!                                                         └─> GameOver
//! ```
//!
//! ## Event Order
//!
//! `select!` is biased: shutdown first, then answers, then ticks. An answer
//! already queued on the answer channel when the final tick comes due wins
//! over that tick. An answer sent at the same virtual instant but not yet in
//! the channel when the loop polls still loses to the tick.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::core::rng::derive_game_seed;
use crate::game::events::{GameEvent, GameOverReason};
use crate::game::question::QuestionGenerator;
use crate::game::reducer::{next_state, replay};
use crate::game::state::{AnswerEvent, GamePhase, GameState, PlayerId};
use crate::game::timer::{countdown_notice, RoundTimer};
use crate::network::protocol::OutgoingMessage;
use crate::network::transport::{ChatTransport, TransportError};

/// Why a game was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Output channel failed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The answer channel closed mid-game (player disconnected).
    #[error("Answer channel closed")]
    InputClosed,

    /// Shutdown was requested.
    #[error("Game cancelled")]
    Cancelled,
}

/// Result of a completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedGame {
    /// Terminal state
    pub state: GameState,
    /// What ended the game
    pub reason: GameOverReason,
    /// Rounds played, including the last one
    pub rounds: u32,
    /// Answers folded into the game, in order
    pub answers: Vec<AnswerEvent>,
}

/// Runs a single game.
pub struct GameOrchestrator {
    id: Uuid,
    seed: u64,
    questions: QuestionGenerator,
    timer: RoundTimer,
    timer_max: i32,
    phase: GamePhase,
    round: u32,
    transcript: Vec<AnswerEvent>,
    event_tx: broadcast::Sender<GameEvent>,
}

impl GameOrchestrator {
    /// Create an orchestrator for `player_id`.
    pub fn new(config: &GameConfig, player_id: &PlayerId) -> Self {
        let id = Uuid::new_v4();
        let seed = config
            .seed
            .unwrap_or_else(|| derive_game_seed(id.as_bytes(), player_id.as_str()));
        let (event_tx, _) = broadcast::channel(256);
        // A negative countdown would end the game before the first answer.
        let timer_max = config.timer_max.max(0);

        Self {
            id,
            seed,
            questions: QuestionGenerator::new(config.difficulty.clone(), seed),
            timer: RoundTimer::new(timer_max, config.tick_interval),
            timer_max,
            phase: GamePhase::AwaitingFirstRound,
            round: 0,
            transcript: Vec::new(),
            event_tx,
        }
    }

    /// Game identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Question seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Check a finished game against a replay of its answers.
    ///
    /// The questions are regenerated from this game's seed, so the replayed
    /// score and last question must match the recorded ones.
    pub fn verify(&self, finished: &FinishedGame) -> bool {
        let mut questions = QuestionGenerator::new(self.questions.difficulty().clone(), self.seed);
        let replayed = replay(&finished.answers, &mut questions, self.timer_max);
        replayed.score == finished.state.score && replayed.question == finished.state.question
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.event_tx.subscribe()
    }

    /// Play the game to its end.
    ///
    /// `shutdown` cancels the game when signalled. If its sender is dropped
    /// without signalling, the game simply runs without a shutdown source.
    #[instrument(skip_all, fields(game = %self.id))]
    pub async fn run<T: ChatTransport>(
        &mut self,
        transport: &T,
        answers: &mut mpsc::Receiver<AnswerEvent>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<FinishedGame, GameError> {
        let result = self.play(transport, answers, shutdown).await;

        // No tick may outlive the game, whichever way it ended.
        self.timer.cancel();

        if let Err(ref e) = result {
            debug!(phase = ?self.phase, "game abandoned: {}", e);
        }
        result
    }

    async fn play<T: ChatTransport>(
        &mut self,
        transport: &T,
        answers: &mut mpsc::Receiver<AnswerEvent>,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<FinishedGame, GameError> {
        self.set_phase(GamePhase::AwaitingFirstRound);
        let mut state = next_state(&GameState::initial(), None, &mut self.questions, self.timer_max);
        let mut shutdown_open = true;

        'round: loop {
            // A wrong answer ends the game without waiting for the clock.
            if state.is_over() {
                return Ok(self.finish(state, GameOverReason::WrongAnswer));
            }

            self.round += 1;
            self.ask(transport, &state).await?;
            self.timer.start(state.clone());
            self.set_phase(GamePhase::InRound);

            loop {
                tokio::select! {
                    biased;

                    signal = shutdown.recv(), if shutdown_open => {
                        match signal {
                            Err(broadcast::error::RecvError::Closed) => shutdown_open = false,
                            _ => return Err(GameError::Cancelled),
                        }
                    }

                    answer = answers.recv() => {
                        let answer = answer.ok_or(GameError::InputClosed)?;
                        self.set_phase(GamePhase::RoundCheckpointAfterAnswer);

                        state = next_state(&state, Some(&answer), &mut self.questions, self.timer_max);
                        self.publish(GameEvent::AnswerReceived {
                            text: answer.text.clone(),
                            correct: !state.is_over(),
                        });
                        self.transcript.push(answer);
                        continue 'round;
                    }

                    tick = self.timer.next_tick() => {
                        self.set_phase(GamePhase::InRoundTimer);
                        self.publish(GameEvent::Tick { remaining: tick.timer });

                        if let Some(notice) = countdown_notice(tick.timer) {
                            transport.send(OutgoingMessage::text(notice)).await?;
                        }

                        state = tick;

                        // Countdown passed zero.
                        if state.is_over() {
                            return Ok(self.finish(state, GameOverReason::Timeout));
                        }
                        self.set_phase(GamePhase::InRound);
                    }
                }
            }
        }
    }

    async fn ask<T: ChatTransport>(&mut self, transport: &T, state: &GameState) -> Result<(), GameError> {
        let prompt = format!("Score: {}\n\n{} = ?", state.score, state.question);
        transport.send(OutgoingMessage::text(prompt)).await?;

        self.publish(GameEvent::RoundStarted {
            round: self.round,
            score: state.score,
            question: state.question.text.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, state: GameState, reason: GameOverReason) -> FinishedGame {
        self.timer.cancel();
        self.set_phase(GamePhase::GameOver);
        self.publish(GameEvent::GameOver { score: state.score, reason });
        info!(score = state.score, rounds = self.round, ?reason, "game over");

        FinishedGame {
            state,
            reason,
            rounds: self.round,
            answers: self.transcript.clone(),
        }
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase");
            self.phase = phase;
        }
    }

    fn publish(&self, event: GameEvent) {
        // Nobody listening is fine.
        let _ = self.event_tx.send(event);
    }
}
