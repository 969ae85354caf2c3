//! Orchestration-visible happenings, emitted as tagged JSON for observers
//! (the CLI `run` loop streams them line by line with `--json`).

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A schedule was (re)built from the current config.
    ScheduleBuilt {
        slot_count: usize,
        day_start: NaiveTime,
        day_end: NaiveTime,
        at: DateTime<Utc>,
    },
    /// The reminder window start slid forward on the first open of the day.
    DayRolledOver {
        day_start: NaiveTime,
        at: DateTime<Utc>,
    },
    /// A one-shot timer was armed for the next slot.
    ReminderQueued {
        title: String,
        time: NaiveTime,
        at: DateTime<Utc>,
    },
    /// A slot came due and was handed to the notifier.
    ReminderDue {
        title: String,
        time: NaiveTime,
        at: DateTime<Utc>,
    },
    /// Every slot for today has fired or passed.
    ScheduleExhausted { at: DateTime<Utc> },
}
