//! Virtual-time timer table.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::{Scheduler, Timer, TimerId, TimerPayload, TimerSnapshot};

/// Heap entry ordered by `(due, id)`.
#[derive(Clone, Debug)]
struct Pending(Timer);

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .due
            .total_cmp(&other.0.due)
            .then(self.0.id.cmp(&other.0.id))
    }
}

/// Default [`Scheduler`]: an in-memory min-heap of timers over a virtual
/// clock.
///
/// Timers due at the same time fire in the order they were scheduled.
#[derive(Clone, Debug, Default)]
pub struct TimerTable {
    now: f64,
    next_id: u64,
    timers: BinaryHeap<Reverse<Pending>>,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table whose clock starts at `now`.
    pub fn starting_at(now: f64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Iterates pending timers in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.iter().map(|Reverse(pending)| &pending.0)
    }

    fn push(&mut self, timer: Timer) {
        self.timers.push(Reverse(Pending(timer)));
    }
}

impl Scheduler for TimerTable {
    fn now(&self) -> f64 {
        self.now
    }

    fn set_now(&mut self, now: f64) {
        if now > self.now {
            self.now = now;
        }
    }

    fn schedule(&mut self, delay: f64, payload: TimerPayload, persistent: bool) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay.max(0.0);
        tracing::trace!(%id, due, kind = payload.kind(), "scheduled timer");
        self.push(Timer {
            id,
            due,
            payload,
            persistent,
        });
        id
    }

    fn pop_due(&mut self, until: f64) -> Option<Timer> {
        let Reverse(Pending(next)) = self.timers.peek()?;
        if next.due > until {
            return None;
        }
        self.timers.pop().map(|Reverse(Pending(timer))| timer)
    }

    fn pending(&self) -> usize {
        self.timers.len()
    }

    fn snapshot(&self) -> TimerSnapshot {
        let mut timers: Vec<Timer> = self.iter().filter(|t| t.persistent).cloned().collect();
        timers.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        TimerSnapshot {
            now: self.now,
            next_id: self.next_id,
            next_generation: 0,
            timers,
        }
    }

    fn restore(&mut self, snapshot: TimerSnapshot) {
        self.now = self.now.max(snapshot.now);
        self.next_id = self.next_id.max(snapshot.next_id);
        for timer in snapshot.timers {
            self.next_id = self.next_id.max(timer.id.0 + 1);
            self.push(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::OwnerId;

    fn revive(owner: u32) -> TimerPayload {
        TimerPayload::Revive {
            owner: OwnerId(owner),
            death: 1,
        }
    }

    #[test]
    fn pops_in_due_then_schedule_order() {
        let mut table = TimerTable::new();
        table.schedule(5.0, revive(1), false);
        table.schedule(2.0, revive(2), false);
        table.schedule(2.0, revive(3), false);

        assert!(table.pop_due(1.0).is_none());
        let owners: Vec<_> = std::iter::from_fn(|| table.pop_due(10.0))
            .map(|t| t.payload.owner())
            .collect();
        assert_eq!(owners, vec![OwnerId(2), OwnerId(3), OwnerId(1)]);
    }

    #[test]
    fn large_tables_pop_in_order() {
        let mut table = TimerTable::new();
        for i in 0..1_000u32 {
            table.schedule(f64::from((i * 7919) % 1_000), revive(i), false);
        }
        let mut previous = (f64::MIN, TimerId(0));
        while let Some(timer) = table.pop_due(f64::MAX) {
            assert!((timer.due, timer.id) > previous);
            previous = (timer.due, timer.id);
        }
        assert_eq!(table.pending(), 0);
    }

    #[test]
    fn delay_is_relative_to_clock() {
        let mut table = TimerTable::starting_at(100.0);
        table.schedule(3.0, revive(1), false);
        table.set_now(50.0);
        assert_eq!(table.now(), 100.0);
        assert!(table.pop_due(102.9).is_none());
        assert_eq!(table.pop_due(103.0).unwrap().due, 103.0);
    }

    #[test]
    fn snapshot_keeps_only_persistent_timers() {
        let mut table = TimerTable::new();
        table.schedule(1.0, revive(1), true);
        table.schedule(1.0, revive(2), false);
        table.set_now(0.5);

        let snapshot = table.snapshot();
        assert_eq!(snapshot.now, 0.5);
        assert_eq!(snapshot.timers.len(), 1);

        let mut restored = TimerTable::new();
        restored.restore(snapshot);
        assert_eq!(restored.now(), 0.5);
        assert_eq!(restored.pending(), 1);
        let id = restored.schedule(1.0, revive(3), false);
        assert_eq!(id, TimerId(2));
    }
}
