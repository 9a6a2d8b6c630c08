//! Advancing virtual time and firing due timers.

use tracing::trace;

use super::World;
use crate::schedule::{Timer, TimerPayload};

impl World {
    /// Advances the clock by `seconds`, firing every timer that falls due.
    ///
    /// Returns the number of timers fired.
    pub fn advance(&mut self, seconds: f64) -> usize {
        let target = self.now() + seconds.max(0.0);
        self.advance_to(target)
    }

    /// Advances the clock to `target`, firing due timers in `(due, id)`
    /// order with the clock set to each timer's due time.
    ///
    /// Timers scheduled by a firing that fall due before `target` fire in
    /// the same call.
    pub fn advance_to(&mut self, target: f64) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due(target) {
            self.scheduler.set_now(timer.due);
            self.fire(timer);
            fired += 1;
        }
        self.scheduler.set_now(target);
        fired
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Executes one timer after validating its target against live state.
    ///
    /// A timer whose owner, instance or tick chain is gone is dropped.
    fn fire(&mut self, timer: Timer) {
        trace!(id = %timer.id, due = timer.due, kind = timer.payload.kind(), "firing timer");
        match timer.payload {
            TimerPayload::Expire { owner, key } => {
                if !self.owners.contains_key(&owner) {
                    trace!(%owner, key, "dropped expiry for missing owner");
                    return;
                }
                self.cleanup(owner);
            }
            TimerPayload::Tick {
                owner,
                key,
                generation,
            } => self.run_tick(owner, &key, generation),
            TimerPayload::Revive { owner, death } => {
                let current = self
                    .combatant(owner)
                    .is_some_and(|combatant| combatant.deaths == death);
                if !current || !self.revive(owner) {
                    trace!(%owner, death, "dropped revive for a stale death");
                }
            }
        }
    }
}
