//! Recurring reminder definitions.

use chrono::{Duration, NaiveTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bias::BiasCategory;

/// A recurring reminder definition.
///
/// `times_per_day` may be zero or negative; the allocator treats anything
/// below one as "no occurrences today".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    pub times_per_day: i32,
    pub bias: BiasCategory,
}

impl Todo {
    pub fn new(title: impl Into<String>, times_per_day: i32, bias: BiasCategory) -> Self {
        Self {
            title: title.into(),
            times_per_day,
            bias,
        }
    }

    /// Propose a candidate reminder time within `[day_start, day_end)`.
    ///
    /// Samples a day fraction from the bias model and interpolates linearly
    /// into the window, flooring to whole milliseconds. Repeated calls drive
    /// the allocator's rejection sampling and consume RNG state in call
    /// order.
    pub fn propose_time<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        day_start: NaiveTime,
        day_end: NaiveTime,
    ) -> NaiveTime {
        let fraction = self.bias.sample(rng);
        let window_ms = (day_end - day_start).num_milliseconds();
        day_start + Duration::milliseconds((fraction * window_ms as f64) as i64)
    }
}

/// Single-field edit to a todo, issued by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum TodoPatch {
    Title(String),
    TimesPerDay(i32),
    Bias(BiasCategory),
}
