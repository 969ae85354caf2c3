//! Scheduler configuration: the whole input to allocation.
//!
//! Holds the reminder day window, the cooldown spacing, the allocation seed
//! and the todo list, plus the once-per-day window rollover. Persisted as
//! TOML by [`crate::storage::ConfigStore`]; time-of-day and cooldown fields
//! serialize as integer milliseconds.

use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::bias::{EVENING_START, MORNING_LENGTH};
use crate::error::{CoreError, Result, ScheduleError};
use crate::todo::{Todo, TodoPatch};

const MS_PER_DAY: i64 = 86_400_000;

fn ms_since_midnight(time: NaiveTime) -> i64 {
    (time - NaiveTime::MIN).num_milliseconds()
}

fn default_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).expect("22:00 is a valid time")
}

/// Display bucket for a time of day. Presentation-only: the allocator never
/// reads it, but the thresholds are shared with the bias model so "morning"
/// here means the same thing as a `Morning` bias there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySegment {
    Morning,
    Midday,
    Evening,
}

impl fmt::Display for DaySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DaySegment::Morning => "morning",
            DaySegment::Midday => "midday",
            DaySegment::Evening => "evening",
        };
        f.write_str(name)
    }
}

/// Everything the allocator needs to build one day's schedule.
///
/// Field order matters for the TOML layout: `todos` must stay last so the
/// scalar fields precede the array-of-tables section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Start of the reminder window. Slides forward to "now" once per day.
    #[serde(with = "ms_of_day")]
    pub day_start: NaiveTime,
    /// End of the reminder window.
    #[serde(with = "ms_of_day")]
    pub day_end: NaiveTime,
    /// When the daily rollover last ran.
    pub last_opened: NaiveDateTime,
    /// Minimum spacing between any two allocated reminder times.
    #[serde(with = "ms_duration")]
    pub cooldown: Duration,
    /// Seed for the allocation RNG.
    pub seed: u64,
    /// Reminder definitions, in presentation order.
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl SchedulerConfig {
    /// The fallback configuration: the current time as day start, a fixed
    /// 22:00 day end, no cooldown, seed zero, empty todo list.
    pub fn default_at(now: NaiveDateTime) -> Self {
        Self {
            day_start: now.time(),
            day_end: default_day_end(),
            last_opened: now,
            cooldown: Duration::zero(),
            seed: 0,
            todos: Vec::new(),
        }
    }

    /// Slide the reminder window start to "now", at most once per calendar
    /// day.
    ///
    /// Returns true when the config changed; the caller is expected to save
    /// and rebuild. Returns false when `last_opened` is already today or
    /// later (a future `last_opened` after a clock adjustment is tolerated,
    /// never rolled back).
    pub fn update_morning(&mut self, now: NaiveDateTime) -> bool {
        if self.last_opened.date() >= now.date() {
            return false;
        }
        self.last_opened = now;
        self.day_start = now.time();
        true
    }

    /// Which third of the day window a time falls in.
    ///
    /// A time exactly on a boundary belongs to the earlier bucket; times
    /// outside the window clamp to the nearest bucket.
    pub fn classify(&self, time: NaiveTime) -> DaySegment {
        let window = self.day_end - self.day_start;
        let morning_end = self.day_start + scale(window, MORNING_LENGTH);
        let evening_start = self.day_start + scale(window, EVENING_START);
        if time > evening_start {
            DaySegment::Evening
        } else if time > morning_end {
            DaySegment::Midday
        } else {
            DaySegment::Morning
        }
    }

    /// Check the allocation invariants: `day_end > day_start` and a
    /// non-negative cooldown.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.day_end <= self.day_start {
            return Err(ScheduleError::InvalidWindow {
                start: self.day_start,
                end: self.day_end,
            });
        }
        if self.cooldown < Duration::zero() {
            return Err(ScheduleError::NegativeCooldown {
                ms: self.cooldown.num_milliseconds(),
            });
        }
        Ok(())
    }

    /// Append a todo to the list.
    pub fn add_todo(&mut self, todo: Todo) {
        self.todos.push(todo);
    }

    /// Remove todos by list index.
    ///
    /// All indices are validated before anything is removed, so an
    /// out-of-bounds index leaves the list untouched. Removal runs in
    /// descending index order (earlier removals cannot shift later ones)
    /// and duplicate indices collapse to one removal. Returns the number
    /// of todos removed.
    pub fn remove_todos(&mut self, indices: &[usize]) -> Result<usize> {
        let len = self.todos.len();
        if let Some(&bad) = indices.iter().find(|&&index| index >= len) {
            return Err(CoreError::TodoOutOfBounds { index: bad, len });
        }
        let mut sorted = indices.to_vec();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();
        for index in &sorted {
            self.todos.remove(*index);
        }
        Ok(sorted.len())
    }

    /// Apply a single-field edit to the todo at `index`.
    pub fn update_todo(&mut self, index: usize, patch: TodoPatch) -> Result<()> {
        let len = self.todos.len();
        let todo = self
            .todos
            .get_mut(index)
            .ok_or(CoreError::TodoOutOfBounds { index, len })?;
        match patch {
            TodoPatch::Title(title) => todo.title = title,
            TodoPatch::TimesPerDay(times) => todo.times_per_day = times,
            TodoPatch::Bias(bias) => todo.bias = bias,
        }
        Ok(())
    }

    /// Read a config field by name, rendered as a string.
    ///
    /// Values pass through the serde view, so `day_start` reads back as
    /// milliseconds, the same as the stored form.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Write a config field by name from a string value.
    ///
    /// The value is coerced to the field's current JSON type; array-valued
    /// fields (`todos`) take a JSON literal. Unknown keys are rejected and
    /// values the field's deserializer refuses (say, an out-of-range time
    /// of day) fail without modifying the config. Persistence stays with
    /// the caller.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let Some(object) = json.as_object_mut() else {
            return Err(CoreError::UnknownKey(key.to_string()));
        };
        let Some(existing) = object.get(key) else {
            return Err(CoreError::UnknownKey(key.to_string()));
        };
        let parsed = match existing {
            serde_json::Value::Number(_) => parse_number(key, value)?,
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                serde_json::from_str(value)?
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        object.insert(key.to_string(), parsed);
        *self = serde_json::from_value(json)?;
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        return Ok(serde_json::Value::Number(n.into()));
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(serde_json::Value::Number(n.into()));
    }
    if let Ok(n) = value.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(n) {
            return Ok(serde_json::Value::Number(number));
        }
    }
    Err(CoreError::InvalidValue {
        key: key.to_string(),
        message: format!("cannot parse '{value}' as a number"),
    })
}

fn scale(window: Duration, fraction: f64) -> Duration {
    Duration::milliseconds((window.num_milliseconds() as f64 * fraction) as i64)
}

/// Serialize a `NaiveTime` as whole milliseconds since midnight.
mod ms_of_day {
    use chrono::{Duration, NaiveTime};
    use serde::de::{self, Deserialize, Deserializer};
    use serde::Serializer;

    use super::{ms_since_midnight, MS_PER_DAY};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(ms_since_midnight(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let ms = i64::deserialize(deserializer)?;
        if !(0..MS_PER_DAY).contains(&ms) {
            return Err(de::Error::custom(format!(
                "time of day must be 0..{MS_PER_DAY} milliseconds, got {ms}"
            )));
        }
        Ok(NaiveTime::MIN + Duration::milliseconds(ms))
    }
}

/// Serialize a `Duration` as signed whole milliseconds.
mod ms_duration {
    use chrono::Duration;
    use serde::de::{Deserialize, Deserializer};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        // Sign is preserved here; validate() rejects negatives at use.
        Ok(Duration::milliseconds(i64::deserialize(deserializer)?))
    }
}
