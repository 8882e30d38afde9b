//! # Scheduler
//!
//! A virtual-time timer queue. Nothing in here reads the wall clock: the
//! owner feeds it a monotonically increasing "now" in milliseconds and pops
//! whatever became due.
//!
//! ```text
//! after(300, A)   every(4000, B)   after(300, C)
//!        │               │               │
//!        ▼               ▼               ▼
//!   ┌─────────────────────────────────────────┐
//!   │ BTreeMap<(due_ms, seq), Entry>          │
//!   │   (300, 0) A                            │
//!   │   (300, 2) C   ← same deadline, later   │
//!   │   (4000, 1) B     registration          │
//!   └─────────────────────────────────────────┘
//!                        │
//!                 pop_due(now_ms)
//! ```
//!
//! Ordering: earlier deadlines first, equal deadlines in registration order.
//! Repeating tasks are re-inserted with a fresh sequence number when they
//! fire, so they queue behind anything registered before that moment. A
//! repeating task that fell several periods behind fires once and skips the
//! periods it missed.

use std::collections::BTreeMap;

/// Handle for cancelling a scheduled task. Repeating tasks keep their id
/// across iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TaskId,
    task: T,
    period_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), Entry<T>>,
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            queue: BTreeMap::new(),
        }
    }

    /// The scheduler's notion of the current time. Inside a `pop_due` drain
    /// this is the deadline of the task just popped, so follow-up delays are
    /// measured from when that task was due.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Schedule `task` to fire once, `delay_ms` from now.
    pub fn after(&mut self, delay_ms: u64, task: T) -> TaskId {
        let due = self.now_ms.saturating_add(delay_ms);
        self.push(due, None, task, None)
    }

    /// Schedule `task` to fire every `period_ms`, first firing one period
    /// from now. A zero period is treated as one millisecond.
    pub fn every(&mut self, period_ms: u64, task: T) -> TaskId {
        let period = period_ms.max(1);
        let due = self.now_ms.saturating_add(period);
        self.push(due, None, task, Some(period))
    }

    /// Cancel a task. Returns false if it already fired (one-shot) or was
    /// never scheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|_, entry| entry.id != id);
        before != self.queue.len()
    }

    /// Cancel everything. Returns how many tasks were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// Pop the next task due at or before `now_ms`.
    ///
    /// Call in a loop until it returns `None`; tasks scheduled while draining
    /// are picked up by the same loop if they are already due.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskId, T)> {
        let Some(first) = self.queue.first_entry() else {
            self.now_ms = self.now_ms.max(now_ms);
            return None;
        };
        let (due, _) = *first.key();
        if due > now_ms {
            self.now_ms = self.now_ms.max(now_ms);
            return None;
        }

        let entry = first.remove();
        self.now_ms = self.now_ms.max(due);
        if let Some(period) = entry.period_ms {
            self.push(next_due(due, period, now_ms), Some(entry.id), entry.task.clone(), Some(period));
        }
        Some((entry.id, entry.task))
    }

    fn push(&mut self, due_ms: u64, id: Option<TaskId>, task: T, period_ms: Option<u64>) -> TaskId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = id.unwrap_or(TaskId(seq));
        self.queue.insert((due_ms, seq), Entry { id, task, period_ms });
        id
    }
}

/// First deadline on the `due + k * period` grid that is later than `now_ms`.
fn next_due(due: u64, period: u64, now_ms: u64) -> u64 {
    let missed = now_ms.saturating_sub(due) / period;
    due.saturating_add(missed.saturating_add(1).saturating_mul(period))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler<&'static str>, now_ms: u64) -> Vec<&'static str> {
        std::iter::from_fn(|| scheduler.pop_due(now_ms).map(|(_, task)| task)).collect()
    }

    #[test]
    fn test_nothing_fires_early() {
        let mut scheduler = Scheduler::new();
        scheduler.after(300, "effects");
        assert!(drain(&mut scheduler, 299).is_empty());
        assert_eq!(scheduler.now_ms(), 299);
        assert_eq!(drain(&mut scheduler, 300), vec!["effects"]);
    }

    #[test]
    fn test_deadline_order_then_registration_order() {
        let mut scheduler = Scheduler::new();
        scheduler.after(500, "release");
        scheduler.after(300, "first");
        scheduler.after(300, "second");
        scheduler.after(200, "hearts");
        assert_eq!(
            drain(&mut scheduler, 1_000),
            vec!["hearts", "first", "second", "release"]
        );
    }

    #[test]
    fn test_repeating_task_reschedules() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.every(4_000, "autoplay");
        assert_eq!(drain(&mut scheduler, 4_000), vec!["autoplay"]);
        assert_eq!(drain(&mut scheduler, 8_000), vec!["autoplay"]);
        assert_eq!(scheduler.len(), 1);

        assert!(scheduler.cancel(id));
        assert!(drain(&mut scheduler, 40_000).is_empty());
    }

    #[test]
    fn test_repeating_task_skips_missed_periods() {
        let mut scheduler = Scheduler::new();
        scheduler.every(100, "sparkles");
        scheduler.after(5_000, "release");
        // A long stall fires the repeating task once, not a hundred times.
        assert_eq!(drain(&mut scheduler, 10_050), vec!["sparkles", "release"]);
        assert!(drain(&mut scheduler, 10_099).is_empty());
        // Back on the original grid.
        assert_eq!(drain(&mut scheduler, 10_100), vec!["sparkles"]);
    }

    #[test]
    fn test_next_due_stays_on_grid() {
        assert_eq!(next_due(4_000, 4_000, 4_000), 8_000);
        assert_eq!(next_due(4_000, 4_000, 11_999), 12_000);
        assert_eq!(next_due(4_000, 4_000, 12_000), 16_000);
        assert_eq!(next_due(u64::MAX - 1, 10, u64::MAX), u64::MAX);
    }

    #[test]
    fn test_delay_measured_from_popped_deadline() {
        let mut scheduler = Scheduler::new();
        scheduler.after(2_000, "loading");
        let (_, task) = scheduler.pop_due(5_000).unwrap();
        assert_eq!(task, "loading");
        // Follow-up scheduled from inside the drain counts from 2000, not 5000.
        scheduler.after(1_000, "intro");
        assert_eq!(drain(&mut scheduler, 5_000), vec!["intro"]);
    }

    #[test]
    fn test_cancel_one_shot_after_fire_is_false() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.after(10, "once");
        assert_eq!(drain(&mut scheduler, 10), vec!["once"]);
        assert!(!scheduler.cancel(id));
    }

    #[test]
    fn test_cancel_all_reports_dropped() {
        let mut scheduler = Scheduler::new();
        scheduler.every(3_000, "sparkles");
        scheduler.every(4_000, "hearts");
        scheduler.after(500, "release");
        assert_eq!(scheduler.cancel_all(), 3);
        assert!(scheduler.is_empty());
        assert!(drain(&mut scheduler, 100_000).is_empty());
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let mut scheduler: Scheduler<&'static str> = Scheduler::new();
        scheduler.pop_due(1_000);
        scheduler.pop_due(400);
        assert_eq!(scheduler.now_ms(), 1_000);
    }
}
