//! Deferred callbacks for expiry, ticking and revival.
//!
//! The scheduler is injected into the world. It only stores timers and keeps
//! the clock; the world decides what a firing means. There is no
//! cancellation: removing an effect leaves its timers in place, and each
//! firing re-validates against live state, turning a late firing into a
//! silent no-op.
mod table;
mod timer;

pub use table::TimerTable;
pub use timer::{Timer, TimerId, TimerPayload, TimerSnapshot};

/// Deferred-callback scheduler with a durable timer table.
pub trait Scheduler: Send {
    /// Current time in seconds.
    fn now(&self) -> f64;

    /// Moves the clock forward. Never moves it backwards.
    fn set_now(&mut self, now: f64);

    /// Schedules `payload` to fire `delay` seconds from now.
    fn schedule(&mut self, delay: f64, payload: TimerPayload, persistent: bool) -> TimerId;

    /// Removes and returns the earliest timer due at or before `until`.
    fn pop_due(&mut self, until: f64) -> Option<Timer>;

    /// Number of timers waiting to fire.
    fn pending(&self) -> usize;

    /// Captures the clock and every persistent timer.
    fn snapshot(&self) -> TimerSnapshot;

    /// Rehydrates timers captured by [`snapshot`](Self::snapshot).
    fn restore(&mut self, snapshot: TimerSnapshot);
}
