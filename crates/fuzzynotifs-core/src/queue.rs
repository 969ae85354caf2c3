//! One-at-a-time reminder delivery from a built schedule.
//!
//! The queue arms a single one-shot timer for the next not-yet-passed slot;
//! after each delivery the caller re-arms it for the following slot.
//! Cancellation is idempotent: aborting a fired or already cancelled timer
//! is a no-op. Timers count wall-clock-relative delays with no correction
//! for clock adjustments made while they sleep.

use chrono::NaiveTime;
use tokio::task::AbortHandle;

use crate::schedule::Schedule;
use crate::todo::Todo;

/// Pending one-shot reminder timers for a live schedule.
///
/// Owned by the orchestration layer next to the schedule it serves. Must be
/// cancelled before the schedule is replaced so a stale schedule can never
/// fire after reconfiguration; dropping the queue cancels for you.
#[derive(Debug)]
pub struct ReminderQueue {
    pending: Vec<AbortHandle>,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// The earliest slot at or after `now`, if any remain today.
    ///
    /// A slot exactly at `now` still qualifies. Asking repeatedly past the
    /// last slot keeps returning `None`; the day never wraps.
    pub fn find_next(schedule: &Schedule, now: NaiveTime) -> Option<(NaiveTime, &Todo)> {
        schedule
            .slots()
            .range(now..)
            .next()
            .map(|(time, todo)| (*time, todo))
    }

    /// Arm a one-shot timer for the next slot at or after `now`.
    ///
    /// Returns the queued slot time, or `None` (not an error) when every
    /// slot has already passed. One call arms exactly one delivery; the
    /// caller re-arms after the callback runs. Must be called from within a
    /// tokio runtime.
    pub fn queue_next<F>(
        &mut self,
        schedule: &Schedule,
        now: NaiveTime,
        callback: F,
    ) -> Option<NaiveTime>
    where
        F: FnOnce(Todo, NaiveTime) + Send + 'static,
    {
        let (time, todo) = Self::find_next(schedule, now)?;
        let todo = todo.clone();
        let delay = (time - now).to_std().unwrap_or_default();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback(todo, time);
        });
        self.pending.push(handle.abort_handle());
        Some(time)
    }

    /// Cancel every pending timer. Safe to call repeatedly; callbacks that
    /// already ran are unaffected.
    pub fn cancel_all(&mut self) {
        for handle in self.pending.drain(..) {
            handle.abort();
        }
    }

    /// Handles retained since the last `cancel_all`.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for ReminderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReminderQueue {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::BiasCategory;
    use crate::config::SchedulerConfig;
    use chrono::{Duration, NaiveDate};

    fn make_test_schedule() -> Schedule {
        let config = SchedulerConfig {
            day_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            last_opened: NaiveDate::from_ymd_opt(2026, 3, 9)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            cooldown: Duration::minutes(5),
            seed: 42,
            todos: vec![
                Todo::new("Read", 2, BiasCategory::MorningOnly),
                Todo::new("Walk", 1, BiasCategory::Evening),
            ],
        };
        Schedule::build(&config).unwrap()
    }

    #[test]
    fn find_next_returns_the_earliest_upcoming_slot() {
        let schedule = make_test_schedule();
        let first = *schedule.slots().keys().next().unwrap();

        let (t, _) = ReminderQueue::find_next(&schedule, schedule.config().day_start).unwrap();
        assert_eq!(t, first);

        // A slot exactly at "now" still counts.
        let (t, _) = ReminderQueue::find_next(&schedule, first).unwrap();
        assert_eq!(t, first);
    }

    #[test]
    fn find_next_skips_passed_slots() {
        let schedule = make_test_schedule();
        let times: Vec<NaiveTime> = schedule.slots().keys().copied().collect();
        let (t, _) =
            ReminderQueue::find_next(&schedule, times[0] + Duration::milliseconds(1)).unwrap();
        assert_eq!(t, times[1]);
    }

    #[test]
    fn find_next_runs_dry_after_the_last_slot() {
        let schedule = make_test_schedule();
        let last = *schedule.slots().keys().last().unwrap();
        let after = last + Duration::milliseconds(1);
        assert!(ReminderQueue::find_next(&schedule, after).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn queued_callback_fires_with_its_slot() {
        let schedule = make_test_schedule();
        let mut queue = ReminderQueue::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let now = schedule.config().day_start;
        let queued = queue.queue_next(&schedule, now, move |todo, time| {
            let _ = tx.send((todo.title, time));
        });

        let first = *schedule.slots().keys().next().unwrap();
        assert_eq!(queued, Some(first));
        assert_eq!(queue.pending_count(), 1);

        let (title, fired_for) = rx.recv().await.unwrap();
        assert_eq!(fired_for, first);
        assert_eq!(title, schedule.slots()[&first].title);
    }

    #[tokio::test(start_paused = true)]
    async fn queue_next_is_a_noop_once_the_day_is_over() {
        let schedule = make_test_schedule();
        let mut queue = ReminderQueue::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

        let after = *schedule.slots().keys().last().unwrap() + Duration::milliseconds(1);
        for _ in 0..2 {
            let tx = tx.clone();
            let queued = queue.queue_next(&schedule, after, move |todo, _| {
                let _ = tx.send(todo.title);
            });
            assert!(queued.is_none());
        }
        assert_eq!(queue.pending_count(), 0);

        tokio::time::advance(std::time::Duration::from_secs(24 * 3600)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_silences_pending_timers() {
        let schedule = make_test_schedule();
        let mut queue = ReminderQueue::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let now = schedule.config().day_start;
        queue.queue_next(&schedule, now, move |todo, _| {
            let _ = tx.send(todo.title);
        });
        queue.cancel_all();
        assert_eq!(queue.pending_count(), 0);
        queue.cancel_all();

        tokio::time::advance(std::time::Duration::from_secs(24 * 3600)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_is_a_noop() {
        let schedule = make_test_schedule();
        let mut queue = ReminderQueue::new();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        let now = schedule.config().day_start;
        queue.queue_next(&schedule, now, move |todo, _| {
            let _ = tx.send(todo.title);
        });
        rx.recv().await.unwrap();
        queue.cancel_all();
        assert_eq!(queue.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timers() {
        let schedule = make_test_schedule();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        {
            let mut queue = ReminderQueue::new();
            queue.queue_next(&schedule, schedule.config().day_start, move |todo, _| {
                let _ = tx.send(todo.title);
            });
        }

        tokio::time::advance(std::time::Duration::from_secs(24 * 3600)).await;
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
