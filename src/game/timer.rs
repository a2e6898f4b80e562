//! Round Timer
//!
//! Per-round countdown. Each round gets a fresh lazy tick stream; starting a
//! new round drops the previous stream before the new one exists, so a tick
//! from a superseded round can never be observed.

use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, Stream, StreamExt};
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

use crate::game::state::GameState;

type TickStream = Pin<Box<dyn Stream<Item = GameState> + Send>>;

/// Highest countdown value that gets announced to the player.
pub const COUNTDOWN_NOTICE_FROM: i32 = 3;

/// Lazy tick sequence for one round.
///
/// Yields `state` with `timer = timer_max - n` for n = 0, 1, 2, ...
/// The first item is ready immediately, the rest one `period` apart.
/// Never ends on its own; the caller drops it.
pub fn round_ticks(
    state: GameState,
    timer_max: i32,
    period: Duration,
) -> impl Stream<Item = GameState> + Send {
    let mut ticker = interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    stream::unfold((ticker, 0i32), move |(mut ticker, index)| {
        let tick = state.with_timer(timer_max.saturating_sub(index));
        async move {
            ticker.tick().await;
            Some((tick, (ticker, index.saturating_add(1))))
        }
    })
}

/// Player-facing countdown text for a tick, if it should be announced.
pub fn countdown_notice(remaining: i32) -> Option<String> {
    (0..=COUNTDOWN_NOTICE_FROM)
        .contains(&remaining)
        .then(|| format!("{} ...", remaining))
}

/// Restartable, cancellable round timer. At most one tick stream is live.
pub struct RoundTimer {
    timer_max: i32,
    period: Duration,
    ticks: Option<TickStream>,
    rounds_started: u64,
}

impl RoundTimer {
    /// Create an idle timer.
    pub fn new(timer_max: i32, period: Duration) -> Self {
        Self {
            timer_max,
            period,
            ticks: None,
            rounds_started: 0,
        }
    }

    /// Start counting down for `state`, cancelling any running round first.
    pub fn start(&mut self, state: GameState) {
        self.cancel();
        self.rounds_started += 1;
        trace!(round = self.rounds_started, "round timer started");
        self.ticks = Some(Box::pin(round_ticks(state, self.timer_max, self.period)));
    }

    /// Stop the running round, if any.
    pub fn cancel(&mut self) {
        if self.ticks.take().is_some() {
            trace!(round = self.rounds_started, "round timer cancelled");
        }
    }

    /// Whether a round is being counted down.
    pub fn is_running(&self) -> bool {
        self.ticks.is_some()
    }

    /// Number of rounds started so far.
    pub fn rounds_started(&self) -> u64 {
        self.rounds_started
    }

    /// Wait for the next tick of the running round.
    ///
    /// Pends forever while idle, so it can sit in a `select!` without firing.
    pub async fn next_tick(&mut self) -> GameState {
        if let Some(ticks) = self.ticks.as_mut() {
            if let Some(state) = ticks.next().await {
                return state;
            }
        }
        std::future::pending().await
    }
}
