//! Wall-clock driver for the world's virtual time.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::Command;

/// Background task that advances the world in step with real time.
///
/// Every `interval` it sends an advance command covering the real time that
/// passed since the previous one, multiplied by `time_scale`.
pub struct ClockWorker {
    command_tx: mpsc::Sender<Command>,
    interval: Duration,
    time_scale: f64,
}

impl ClockWorker {
    pub fn new(command_tx: mpsc::Sender<Command>, interval: Duration, time_scale: f64) -> Self {
        Self {
            command_tx,
            interval,
            time_scale,
        }
    }

    /// Runs until the world worker stops accepting commands.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            let now = ticker.tick().await;
            let elapsed = now.saturating_duration_since(last);
            last = now;
            if elapsed.is_zero() {
                continue;
            }

            let seconds = elapsed.as_secs_f64() * self.time_scale;
            let command = Command::Advance {
                seconds,
                reply: None,
            };
            if self.command_tx.send(command).await.is_err() {
                debug!(target: "runtime::clock", "world worker gone, stopping clock");
                break;
            }
        }
    }
}
