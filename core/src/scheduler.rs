use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;
use serde::{Deserialize, Serialize};

/// Identifies a round, so a timer can be matched against the round that scheduled it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(u32);

impl RoundId {
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Schedules the end of a reveal phase.
///
/// When the delay elapses the implementation must call back into
/// [`RecallEngine::finish_reveal`](crate::RecallEngine::finish_reveal) with the given round.
pub trait RevealScheduler {
    /// Handle to a scheduled timer. Dropping it must cancel the timer.
    type Pending;

    fn schedule(&mut self, round: RoundId, delay_ms: u32) -> Self::Pending;
}

#[derive(Debug)]
struct ManualTimer {
    round: RoundId,
    due_ms: u64,
    cancelled: Rc<Cell<bool>>,
}

/// Headless scheduler driven by an explicit millisecond clock.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    timers: Vec<ManualTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers that are neither fired nor cancelled.
    pub fn pending_count(&self) -> usize {
        self.timers
            .iter()
            .filter(|timer| !timer.cancelled.get())
            .count()
    }

    /// Moves the clock forward and returns the rounds whose timers came due, in due order.
    pub fn advance(&mut self, ms: u64) -> Vec<RoundId> {
        self.now_ms = self.now_ms.saturating_add(ms);
        let now_ms = self.now_ms;

        self.timers.retain(|timer| !timer.cancelled.get());
        self.timers.sort_by_key(|timer| timer.due_ms);

        let due = self.timers.partition_point(|timer| timer.due_ms <= now_ms);
        self.timers
            .drain(..due)
            .map(|timer| {
                timer.cancelled.set(true);
                timer.round
            })
            .collect()
    }
}

/// Pending timer of a [`ManualScheduler`], cancelled on drop.
#[derive(Debug)]
pub struct ManualPending {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for ManualPending {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

impl RevealScheduler for ManualScheduler {
    type Pending = ManualPending;

    fn schedule(&mut self, round: RoundId, delay_ms: u32) -> Self::Pending {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.push(ManualTimer {
            round,
            due_ms: self.now_ms.saturating_add(delay_ms.into()),
            cancelled: Rc::clone(&cancelled),
        });
        ManualPending { cancelled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_fires_once_when_due() {
        let mut scheduler = ManualScheduler::new();
        let _pending = scheduler.schedule(RoundId(1), 100);

        assert!(scheduler.advance(99).is_empty());
        assert_eq!(scheduler.advance(1), [RoundId(1)]);
        assert!(scheduler.advance(1000).is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn dropping_pending_cancels_timer() {
        let mut scheduler = ManualScheduler::new();
        let pending = scheduler.schedule(RoundId(1), 100);
        let _other = scheduler.schedule(RoundId(2), 200);
        assert_eq!(scheduler.pending_count(), 2);

        drop(pending);

        assert_eq!(scheduler.pending_count(), 1);
        assert_eq!(scheduler.advance(500), [RoundId(2)]);
    }

    #[test]
    fn timers_come_due_in_order() {
        let mut scheduler = ManualScheduler::new();
        let _late = scheduler.schedule(RoundId(1), 300);
        let _early = scheduler.schedule(RoundId(2), 100);

        assert_eq!(scheduler.advance(300), [RoundId(2), RoundId(1)]);
        assert_eq!(scheduler.now_ms(), 300);
    }
}
