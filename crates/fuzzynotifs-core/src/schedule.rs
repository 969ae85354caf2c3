//! Schedule construction: the time-slot allocation core.
//!
//! Turns a [`SchedulerConfig`] into one day's concrete time-to-todo
//! assignment. Candidate times are drawn through each todo's bias
//! distribution from a generator seeded by the config, so the same config
//! always produces the same schedule; candidates that land within the
//! cooldown of an already committed slot are re-drawn (rejection sampling).
//!
//! The cooldown distance is a plain absolute difference between times of
//! day, deliberately not circular: a slot at 23:58 and one at 00:02 are
//! 236 minutes apart, not four. Identical-instant proposals (reachable
//! only with a zero cooldown) keep the later occurrence, overwriting the
//! earlier one.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveTime};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::todo::Todo;

/// Proposals drawn per occurrence before the allocator gives up.
///
/// Rejection sampling has no natural termination when the cooldown leaves
/// too little room, especially inside the `*Only` sub-windows which the
/// upfront capacity check cannot see, so placement is bounded and fails
/// with a descriptive error instead of looping.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1_000;

/// One day's time-to-todo assignment, derived from a config snapshot.
///
/// The slot map is fully populated at construction and never mutated
/// afterwards; its ordering doubles as the presentation layer's by-time
/// view. Reconfiguration means building a new `Schedule`.
#[derive(Debug, Clone)]
pub struct Schedule {
    slots: BTreeMap<NaiveTime, Todo>,
    config: SchedulerConfig,
}

impl Schedule {
    /// Allocate reminder times for every todo occurrence in `config`.
    ///
    /// Todos are processed in list order and occurrences in sequence, so a
    /// given config reproduces the identical slot map on every run. Todos
    /// with `times_per_day <= 0` are skipped.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` or `NegativeCooldown` for a malformed config,
    /// `Infeasible` when the requested occurrences cannot fit the window
    /// even optimally packed, `PlacementExhausted` when rejection sampling
    /// exceeds [`MAX_PLACEMENT_ATTEMPTS`] for a single occurrence.
    pub fn build(config: &SchedulerConfig) -> Result<Self, ScheduleError> {
        config.validate()?;
        check_capacity(config)?;

        let mut rng = Mcg128Xsl64::seed_from_u64(config.seed);
        let mut slots = BTreeMap::new();

        for todo in &config.todos {
            for _ in 0..todo.times_per_day.max(0) {
                let time = place(todo, &slots, config, &mut rng)?;
                slots.insert(time, todo.clone());
            }
        }

        Ok(Self {
            slots,
            config: config.clone(),
        })
    }

    /// The allocated slots, ordered by time of day.
    pub fn slots(&self) -> &BTreeMap<NaiveTime, Todo> {
        &self.slots
    }

    /// The config snapshot this schedule was derived from.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Draw candidate times until one clears the cooldown of every committed
/// slot.
fn place(
    todo: &Todo,
    slots: &BTreeMap<NaiveTime, Todo>,
    config: &SchedulerConfig,
    rng: &mut Mcg128Xsl64,
) -> Result<NaiveTime, ScheduleError> {
    let mut candidate = todo.propose_time(rng, config.day_start, config.day_end);
    let mut attempts = 1;
    while violates_cooldown(slots, candidate, config.cooldown) {
        if attempts >= MAX_PLACEMENT_ATTEMPTS {
            return Err(ScheduleError::PlacementExhausted {
                title: todo.title.clone(),
                attempts,
            });
        }
        candidate = todo.propose_time(rng, config.day_start, config.day_end);
        attempts += 1;
    }
    Ok(candidate)
}

/// True when `candidate` sits closer than `cooldown` to any committed slot
/// time. Absolute difference, never wrapping around midnight.
fn violates_cooldown(
    slots: &BTreeMap<NaiveTime, Todo>,
    candidate: NaiveTime,
    cooldown: Duration,
) -> bool {
    slots
        .keys()
        .any(|&taken| (candidate - taken).abs() < cooldown)
}

/// Fail fast when even optimal packing cannot satisfy the cooldown.
fn check_capacity(config: &SchedulerConfig) -> Result<(), ScheduleError> {
    let occurrences: i64 = config
        .todos
        .iter()
        .map(|todo| i64::from(todo.times_per_day.max(0)))
        .sum();
    let cooldown_ms = config.cooldown.num_milliseconds();
    if occurrences <= 1 || cooldown_ms == 0 {
        return Ok(());
    }
    let window_ms = (config.day_end - config.day_start).num_milliseconds();
    if (occurrences - 1) * cooldown_ms > window_ms {
        return Err(ScheduleError::Infeasible {
            occurrences,
            cooldown_ms,
            window_ms,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::BiasCategory;
    use chrono::{NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn opened_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 9)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn make_test_config(seed: u64) -> SchedulerConfig {
        SchedulerConfig {
            day_start: time(8, 0),
            day_end: time(22, 0),
            last_opened: opened_at(),
            cooldown: Duration::minutes(5),
            seed,
            todos: vec![
                Todo::new("Stretch", 3, BiasCategory::None),
                Todo::new("Drink water", 4, BiasCategory::Midday),
                Todo::new("Journal", 1, BiasCategory::EveningOnly),
            ],
        }
    }

    #[test]
    fn test_same_config_builds_the_same_slots() {
        let config = make_test_config(42);
        let a = Schedule::build(&config).unwrap();
        let b = Schedule::build(&config).unwrap();
        assert_eq!(a.slots(), b.slots());
    }

    #[test]
    fn test_different_seeds_build_different_slots() {
        let a = Schedule::build(&make_test_config(1)).unwrap();
        let b = Schedule::build(&make_test_config(2)).unwrap();
        assert_ne!(a.slots(), b.slots());
    }

    #[test]
    fn test_occurrence_counts_match_times_per_day() {
        let config = make_test_config(7);
        let schedule = Schedule::build(&config).unwrap();
        assert_eq!(schedule.len(), 8);
        for todo in &config.todos {
            let count = schedule
                .slots()
                .values()
                .filter(|t| t.title == todo.title)
                .count();
            assert_eq!(count as i32, todo.times_per_day, "{}", todo.title);
        }
    }

    #[test]
    fn test_slots_stay_inside_the_window() {
        let config = make_test_config(13);
        let schedule = Schedule::build(&config).unwrap();
        for t in schedule.slots().keys() {
            assert!(*t >= config.day_start && *t < config.day_end, "slot {t}");
        }
    }

    #[test]
    fn test_cooldown_spacing_holds_pairwise() {
        let schedule = Schedule::build(&make_test_config(3)).unwrap();
        let times: Vec<NaiveTime> = schedule.slots().keys().copied().collect();
        for (i, a) in times.iter().enumerate() {
            for b in &times[i + 1..] {
                assert!(
                    (*a - *b).abs() >= Duration::minutes(5),
                    "{a} and {b} are too close"
                );
            }
        }
    }

    #[test]
    fn test_nonpositive_times_per_day_are_skipped() {
        let mut config = make_test_config(5);
        config.todos = vec![
            Todo::new("Never", 0, BiasCategory::None),
            Todo::new("Also never", -2, BiasCategory::Morning),
            Todo::new("Once", 1, BiasCategory::None),
        ];
        let schedule = Schedule::build(&config).unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.slots().values().next().unwrap().title, "Once");
    }

    #[test]
    fn test_empty_todo_list_builds_an_empty_schedule() {
        let mut config = make_test_config(5);
        config.todos.clear();
        let schedule = Schedule::build(&config).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_morning_only_scenario_stays_in_the_morning_window() {
        let config = SchedulerConfig {
            day_start: time(8, 0),
            day_end: time(22, 0),
            last_opened: opened_at(),
            cooldown: Duration::minutes(5),
            seed: 42,
            todos: vec![Todo::new("Read", 2, BiasCategory::MorningOnly)],
        };
        let schedule = Schedule::build(&config).unwrap();
        assert_eq!(schedule.len(), 2);
        let times: Vec<NaiveTime> = schedule.slots().keys().copied().collect();
        // 08:00 + 0.3 * 14h = 12:12
        for t in &times {
            assert!((time(8, 0)..time(12, 12)).contains(t), "slot {t}");
        }
        assert!((times[1] - times[0]).abs() >= Duration::minutes(5));
    }

    #[test]
    fn test_rejects_inverted_window() {
        let mut config = make_test_config(0);
        config.day_end = time(7, 0);
        assert!(matches!(
            Schedule::build(&config),
            Err(ScheduleError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_cooldown() {
        let mut config = make_test_config(0);
        config.cooldown = Duration::seconds(-1);
        assert!(matches!(
            Schedule::build(&config),
            Err(ScheduleError::NegativeCooldown { .. })
        ));
    }

    #[test]
    fn test_rejects_over_capacity_before_sampling() {
        // 3 occurrences spaced 20 minutes apart cannot fit 10 minutes.
        let mut config = make_test_config(0);
        config.day_end = time(8, 10);
        config.cooldown = Duration::minutes(20);
        config.todos = vec![Todo::new("Hydrate", 3, BiasCategory::None)];
        assert!(matches!(
            Schedule::build(&config),
            Err(ScheduleError::Infeasible {
                occurrences: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_placement_gives_up_on_an_overpacked_sub_window() {
        // Capacity says 4 x 25min fits the 100-minute day, but every sample
        // must land in the 30-minute morning sub-window, which holds at
        // most two slots spaced 25 minutes apart.
        let mut config = make_test_config(0);
        config.day_end = time(9, 40);
        config.cooldown = Duration::minutes(25);
        config.todos = vec![Todo::new("Stand", 4, BiasCategory::MorningOnly)];
        match Schedule::build(&config) {
            Err(ScheduleError::PlacementExhausted { title, attempts }) => {
                assert_eq!(title, "Stand");
                assert_eq!(attempts, MAX_PLACEMENT_ATTEMPTS);
            }
            other => panic!("expected PlacementExhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_cooldown_skips_the_capacity_check() {
        let mut config = make_test_config(0);
        config.day_end = time(8, 1);
        config.cooldown = Duration::zero();
        config.todos = vec![Todo::new("Blink", 10, BiasCategory::None)];
        assert!(Schedule::build(&config).is_ok());
    }

    proptest! {
        #[test]
        fn test_determinism_holds_for_any_seed(seed in any::<u64>()) {
            let config = make_test_config(seed);
            let a = Schedule::build(&config).unwrap();
            let b = Schedule::build(&config).unwrap();
            prop_assert_eq!(a.slots(), b.slots());
        }

        #[test]
        fn test_spacing_holds_for_any_seed(seed in any::<u64>()) {
            let schedule = Schedule::build(&make_test_config(seed)).unwrap();
            let times: Vec<NaiveTime> = schedule.slots().keys().copied().collect();
            for (i, a) in times.iter().enumerate() {
                for b in &times[i + 1..] {
                    prop_assert!((*a - *b).abs() >= Duration::minutes(5));
                }
            }
        }
    }
}
