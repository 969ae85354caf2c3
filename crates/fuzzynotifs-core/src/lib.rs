//! # FuzzyNotifs Core Library
//!
//! Core logic for FuzzyNotifs, a fuzzy reminder scheduler: recurring todo
//! items are allocated biased-random reminder times across a day window and
//! delivered one at a time from a timer queue. All functionality is
//! available through the standalone CLI binary; any GUI shell is a thin
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Bias model**: category to Beta distribution over the day fraction
//! - **Allocator**: seeded rejection sampling building one day's
//!   time-to-todo slot map under a minimum spacing (cooldown)
//! - **Reminder queue**: cancellable one-shot timers delivering the next
//!   slot; the caller re-arms after each delivery
//! - **Storage**: TOML-based configuration under the user config dir
//!
//! ## Key Components
//!
//! - [`BiasCategory`]: time-of-day sampling distributions
//! - [`SchedulerConfig`]: day window, cooldown, seed and todo list
//! - [`Schedule`]: the built time-to-todo assignment
//! - [`ReminderQueue`]: pending one-shot reminder timers
//! - [`ConfigStore`]: config persistence

pub mod bias;
pub mod config;
pub mod error;
pub mod events;
pub mod queue;
pub mod schedule;
pub mod storage;
pub mod todo;

pub use bias::BiasCategory;
pub use config::{DaySegment, SchedulerConfig};
pub use error::{CoreError, Result, ScheduleError, StoreError};
pub use events::Event;
pub use queue::ReminderQueue;
pub use schedule::{Schedule, MAX_PLACEMENT_ATTEMPTS};
pub use storage::ConfigStore;
pub use todo::{Todo, TodoPatch};
