//! Math Master console runner
//!
//! Plays the game in a terminal: answers come from stdin, messages go to
//! stdout, logs go to stderr.
//!
//! Usage:
//!   math-master [NAME]
//!   math-master --leaderboard

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{info, debug};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use math_master::{
    AnswerEvent, GameConfig, MathMasterBot, Player, VERSION,
    network::{ChatTransport, OutgoingMessage, TransportError},
};

/// Math Master - timed arithmetic quiz
#[derive(Parser, Debug)]
#[command(name = "math-master")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print the leader board and exit.
    ///
    /// The board lives in memory, so a fresh process always shows it empty.
    /// Hosts that keep one bot running across games get the real ranking.
    #[arg(short, long)]
    leaderboard: bool,

    /// Player name (defaults to $USER)
    name: Option<String>,
}

/// Transport that prints to the terminal.
struct ConsoleTransport {
    stdout: Mutex<tokio::io::Stdout>,
}

impl ConsoleTransport {
    fn new() -> Self {
        Self {
            stdout: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl ChatTransport for ConsoleTransport {
    async fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
        let line = match message {
            OutgoingMessage::Text { text } => text,
            OutgoingMessage::Image { url } => format!("[image] {}", url),
        };

        let mut stdout = self.stdout.lock().await;
        stdout
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))
    }
}

/// Forward stdin lines as answers until EOF.
fn spawn_stdin_reader() -> mpsc::Receiver<AnswerEvent> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(AnswerEvent::new(line)).await.is_err() {
                break;
            }
        }
        debug!("stdin closed");
    });

    rx
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = GameConfig::from_env();
    info!("Math Master v{}", VERSION);
    info!("Timer: {} ticks of {:?}", config.timer_max, config.tick_interval);

    let bot = MathMasterBot::new(config);
    let transport = ConsoleTransport::new();

    if cli.leaderboard {
        let board = bot.show_leader_board().await;
        transport.send(OutgoingMessage::text(board)).await?;
        return Ok(());
    }

    let name = cli
        .name
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "Player".to_string());
    let player = Player::new(name.to_lowercase(), name);

    let outcome = bot.run_game(&player, &transport, spawn_stdin_reader()).await;
    std::process::exit(outcome.code());
}
