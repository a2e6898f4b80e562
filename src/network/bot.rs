//! Math Master Bot
//!
//! Entry points the chat command layer calls: play a game, show the board.
//! Owns the shared leader board and the shutdown signal for running games.

use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, instrument, warn};

use crate::config::GameConfig;
use crate::game::events::GameOverReason;
use crate::game::leaderboard::LeaderBoard;
use crate::game::orchestrator::{FinishedGame, GameError, GameOrchestrator};
use crate::game::state::{AnswerEvent, Player};
use crate::network::protocol::OutgoingMessage;
use crate::network::transport::ChatTransport;

/// Message shown when a game has to be abandoned.
pub const FAILURE_MESSAGE: &str =
    "Sorry, the Math Master game cannot continue. Please start a new game.";

/// How a `run_game` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The game reached game over, won or lost.
    Completed,
    /// The game was abandoned.
    Failed,
}

impl Outcome {
    /// Exit code for the command layer: 0 on completion, 1 on failure.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Completed => 0,
            Outcome::Failed => 1,
        }
    }
}

/// The bot-side game host.
pub struct MathMasterBot {
    config: GameConfig,
    leader_board: LeaderBoard,
    shutdown_tx: broadcast::Sender<()>,
}

impl MathMasterBot {
    /// Create a bot with its own leader board.
    pub fn new(config: GameConfig) -> Self {
        Self::with_leader_board(config, LeaderBoard::new())
    }

    /// Create a bot sharing an existing leader board.
    pub fn with_leader_board(config: GameConfig, leader_board: LeaderBoard) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            leader_board,
            shutdown_tx,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Handle to the shared leader board.
    pub fn leader_board(&self) -> &LeaderBoard {
        &self.leader_board
    }

    /// Current ranking, without playing.
    pub async fn show_leader_board(&self) -> String {
        self.leader_board.report(None).await
    }

    /// Play one game with `player`.
    ///
    /// Answers arrive on `answers`; everything the player sees goes through
    /// `transport`. If the game fails before its game-over message is
    /// delivered, nothing is registered and the player gets a generic message.
    /// The score is registered right after that message, so a failure while
    /// sending the final leader board report still returns
    /// [`Outcome::Failed`] but keeps the registration.
    #[instrument(skip_all, fields(player = %player.id))]
    pub async fn run_game<T: ChatTransport>(
        &self,
        player: &Player,
        transport: &T,
        mut answers: mpsc::Receiver<AnswerEvent>,
    ) -> Outcome {
        match self.play(player, transport, &mut answers).await {
            Ok(finished) => {
                info!(score = finished.state.score, "game completed");
                Outcome::Completed
            }
            Err(e) => {
                error!("game failed: {}", e);
                if let Err(e) = transport.send(OutgoingMessage::text(FAILURE_MESSAGE)).await {
                    warn!("could not deliver failure notice: {}", e);
                }
                Outcome::Failed
            }
        }
    }

    /// Cancel every game currently running on this bot.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    async fn play<T: ChatTransport>(
        &self,
        player: &Player,
        transport: &T,
        answers: &mut mpsc::Receiver<AnswerEvent>,
    ) -> Result<FinishedGame, GameError> {
        // Subscribe before the intro so a shutdown during it is not missed.
        let mut shutdown = self.shutdown_tx.subscribe();

        self.intro(player, transport).await?;

        let mut orchestrator = GameOrchestrator::new(&self.config, &player.id);
        info!(game = %orchestrator.id(), seed = orchestrator.seed(), "game started");

        let finished = orchestrator.run(transport, answers, &mut shutdown).await?;
        if !orchestrator.verify(&finished) {
            warn!(game = %orchestrator.id(), "replayed answers disagree with final score");
        }

        transport.send(OutgoingMessage::text(game_over_text(player, &finished))).await?;

        self.leader_board
            .register(player.id.clone(), player.name.clone(), finished.state.score)
            .await;
        let board = self.leader_board.report(None).await;
        transport.send(OutgoingMessage::text(board)).await?;

        Ok(finished)
    }

    async fn intro<T: ChatTransport>(&self, player: &Player, transport: &T) -> Result<(), GameError> {
        if let Some(url) = &self.config.banner_url {
            transport.send(OutgoingMessage::image(url.clone())).await?;
        }

        let lines = [
            format!("Hello, {}!", player.name),
            "Welcome to the Math Master GAME!".to_string(),
            "Please try your best to answer math questions to become a real Math Master!".to_string(),
            "START!".to_string(),
        ];

        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                self.pause(transport).await;
            }
            transport.send(OutgoingMessage::text(line)).await?;
        }
        Ok(())
    }

    async fn pause<T: ChatTransport>(&self, transport: &T) {
        if self.config.intro_delay > Duration::ZERO {
            transport.sleep(self.config.intro_delay).await;
        }
    }
}

/// Final message for a finished game.
pub fn game_over_text(player: &Player, finished: &FinishedGame) -> String {
    let question = &finished.state.question;
    let missed = match finished.reason {
        GameOverReason::WrongAnswer => "Wrong answer!",
        GameOverReason::Timeout => "Time is up!",
    };

    format!(
        "Game Over\n\n{} {} = {}\n\n{}, Your final score is: {}!",
        missed, question, question.correct_answer, player.name, finished.state.score,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::game::leaderboard::EMPTY_BOARD_MESSAGE;
    use crate::game::question::{Difficulty, QuestionGenerator};
    use crate::network::transport::{ChannelTransport, TransportError};

    const SEED: u64 = 77;

    fn config() -> GameConfig {
        GameConfig {
            timer_max: 3,
            seed: Some(SEED),
            ..GameConfig::quick()
        }
    }

    fn drain(rx: &mut mpsc::Receiver<OutgoingMessage>) -> Vec<OutgoingMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Transport that fails after a number of successful sends.
    struct FlakyTransport {
        remaining: AtomicUsize,
        sent: Arc<AtomicUsize>,
    }

    impl ChatTransport for FlakyTransport {
        async fn send(&self, _message: OutgoingMessage) -> Result<(), TransportError> {
            let ok = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if ok {
                self.sent.fetch_add(1, Ordering::SeqCst);
                Ok(())
            } else {
                Err(TransportError::SendFailed("connection reset".into()))
            }
        }
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(Outcome::Completed.code(), 0);
        assert_eq!(Outcome::Failed.code(), 1);
    }

    #[tokio::test]
    async fn test_show_empty_leader_board() {
        let bot = MathMasterBot::new(config());
        assert_eq!(bot.show_leader_board().await, EMPTY_BOARD_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_game_registers_score() {
        let bot = MathMasterBot::new(config());
        let player = Player::new("p1", "Alice");
        let (transport, mut outbox) = ChannelTransport::channel(256);
        let (answers_tx, answers) = mpsc::channel(8);

        let mut questions = QuestionGenerator::new(Difficulty::default(), SEED);
        let first = questions.generate();
        answers_tx.send(AnswerEvent::from(first.correct_answer)).await.unwrap();

        let outcome = bot.run_game(&player, &transport, answers).await;
        assert_eq!(outcome, Outcome::Completed);

        let texts: Vec<String> = drain(&mut outbox)
            .iter()
            .filter_map(|m| m.as_text().map(str::to_string))
            .collect();
        assert_eq!(texts[0], "Hello, Alice!");
        assert_eq!(texts[3], "START!");
        assert!(texts.iter().any(|t| t.contains("Alice, Your final score is: 1!")));
        assert!(texts.iter().any(|t| t.contains("Time is up!")));
        assert!(texts.last().unwrap().contains("1. Alice: 1"));

        let entries = bot.leader_board().entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_banner_and_intro_pauses() {
        let config = GameConfig {
            intro_delay: Duration::from_secs(1),
            banner_url: Some("https://example.com/banner.jpg".into()),
            ..config()
        };
        let bot = MathMasterBot::new(config);
        let player = Player::new("p1", "Alice");
        let (transport, mut outbox) = ChannelTransport::channel(256);
        let (answers_tx, answers) = mpsc::channel(8);
        answers_tx.send(AnswerEvent::new("nope")).await.unwrap();

        let start = tokio::time::Instant::now();
        let outcome = bot.run_game(&player, &transport, answers).await;
        assert_eq!(outcome, Outcome::Completed);

        // Three pauses between four intro lines; the wrong answer ends at once.
        assert_eq!(tokio::time::Instant::now() - start, Duration::from_secs(3));

        let messages = drain(&mut outbox);
        assert_eq!(messages[0], OutgoingMessage::image("https://example.com/banner.jpg"));
        assert!(messages.iter().any(|m| m.as_text().map_or(false, |t| t.contains("Wrong answer!"))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_returns_one_and_registers_nothing() {
        let bot = MathMasterBot::new(config());
        let player = Player::new("p1", "Alice");
        let sent = Arc::new(AtomicUsize::new(0));
        let transport = FlakyTransport {
            // Intro (4 lines) and the first prompt succeed, the countdown fails.
            remaining: AtomicUsize::new(5),
            sent: sent.clone(),
        };
        let (_answers_tx, answers) = mpsc::channel(8);

        let outcome = bot.run_game(&player, &transport, answers).await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(outcome.code(), 1);
        assert_eq!(sent.load(Ordering::SeqCst), 5);
        assert_eq!(bot.leader_board().player_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_failure_keeps_registration() {
        let bot = MathMasterBot::new(config());
        let player = Player::new("p1", "Alice");
        let sent = Arc::new(AtomicUsize::new(0));
        let transport = FlakyTransport {
            // Intro, prompt and game over text succeed, the report fails.
            remaining: AtomicUsize::new(6),
            sent: sent.clone(),
        };
        let (answers_tx, answers) = mpsc::channel(8);
        answers_tx.send(AnswerEvent::new("wrong")).await.unwrap();

        let outcome = bot.run_game(&player, &transport, answers).await;
        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(sent.load(Ordering::SeqCst), 6);
        assert_eq!(bot.leader_board().games_played().await, 1);
        assert_eq!(bot.leader_board().player_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_fails_game() {
        let bot = MathMasterBot::new(config());
        let player = Player::new("p1", "Alice");
        let (transport, mut outbox) = ChannelTransport::channel(256);
        let (answers_tx, answers) = mpsc::channel(8);
        drop(answers_tx);

        let outcome = bot.run_game(&player, &transport, answers).await;
        assert_eq!(outcome, Outcome::Failed);

        let last = drain(&mut outbox).pop().unwrap();
        assert_eq!(last.as_text(), Some(FAILURE_MESSAGE));
        assert_eq!(bot.leader_board().games_played().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_running_games() {
        let bot = Arc::new(MathMasterBot::new(GameConfig {
            timer_max: 60,
            ..config()
        }));
        let player = Player::new("p1", "Alice");
        let (transport, _outbox) = ChannelTransport::channel(256);
        let (_answers_tx, answers) = mpsc::channel(8);

        let game = {
            let bot = bot.clone();
            tokio::spawn(async move { bot.run_game(&player, &transport, answers).await })
        };

        tokio::time::sleep(Duration::from_secs(5)).await;
        bot.shutdown();

        assert_eq!(game.await.unwrap(), Outcome::Failed);
        assert_eq!(bot.leader_board().player_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_games_share_leader_board() {
        let board = LeaderBoard::new();
        let bot = MathMasterBot::with_leader_board(config(), board.clone());

        for (id, name) in [("p1", "Alice"), ("p2", "Bob")] {
            let (transport, _outbox) = ChannelTransport::channel(256);
            let (_answers_tx, answers) = mpsc::channel(8);
            let outcome = bot.run_game(&Player::new(id, name), &transport, answers).await;
            assert_eq!(outcome, Outcome::Completed);
        }

        assert_eq!(board.player_count().await, 2);
        assert!(bot.show_leader_board().await.contains("2 players, 2 games"));
    }
}
