//! Time-of-day bias model.
//!
//! Each bias category maps to a Beta distribution over the fraction of the
//! day window that has elapsed. Sampling is pure: callers supply the RNG,
//! so a seeded generator reproduces the same fraction sequence on every run.
//!
//! | category      | distribution                                       | domain     |
//! |---------------|----------------------------------------------------|------------|
//! | `None`        | Beta(1.02, 1.02)                                   | [0, 1)     |
//! | `Morning`     | Beta(1, 1.35)                                      | [0, 1)     |
//! | `MorningOnly` | MORNING_START + Beta(1.15, 1) * MORNING_LENGTH     | [0, 0.3)   |
//! | `Evening`     | Beta(1.35, 1)                                      | [0, 1)     |
//! | `EveningOnly` | EVENING_START + Beta(1, 1.15) * EVENING_LENGTH     | [0.7, 1)   |
//! | `Midday`      | Beta(5, 5)                                         | [0, 1)     |

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fraction of the day window at which the morning region begins.
pub const MORNING_START: f64 = 0.0;
/// Fraction of the day window covered by the morning region.
pub const MORNING_LENGTH: f64 = 0.3;
/// Fraction of the day window at which the evening region begins.
pub const EVENING_START: f64 = 0.7;
/// Fraction of the day window covered by the evening region.
pub const EVENING_LENGTH: f64 = 0.3;

/// Ordinal outside 0-5 found where a bias category was expected.
#[derive(Debug, Error)]
#[error("invalid bias ordinal {0} (expected 0-5)")]
pub struct InvalidBias(pub u8);

/// Unrecognized bias name passed on the command line.
#[derive(Debug, Error)]
#[error("unknown bias '{0}' (expected none, morning, morning_only, evening, evening_only or midday)")]
pub struct ParseBiasError(String);

/// Named sampling distribution skewing proposed times toward part of the day.
///
/// Persisted by ordinal (0-5) in declaration order; the numbering is part of
/// the stored config format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BiasCategory {
    None,
    Morning,
    MorningOnly,
    Evening,
    EveningOnly,
    Midday,
}

impl BiasCategory {
    /// All categories in ordinal order.
    pub const ALL: [BiasCategory; 6] = [
        BiasCategory::None,
        BiasCategory::Morning,
        BiasCategory::MorningOnly,
        BiasCategory::Evening,
        BiasCategory::EveningOnly,
        BiasCategory::Midday,
    ];

    /// Distribution parameters: (alpha, beta, window start, window length).
    ///
    /// The `*Only` categories confine samples to the morning or evening
    /// sub-window; the rest span the whole day.
    fn distribution(self) -> (f64, f64, f64, f64) {
        match self {
            BiasCategory::None => (1.02, 1.02, 0.0, 1.0),
            BiasCategory::Morning => (1.0, 1.35, 0.0, 1.0),
            BiasCategory::MorningOnly => (1.15, 1.0, MORNING_START, MORNING_LENGTH),
            BiasCategory::Evening => (1.35, 1.0, 0.0, 1.0),
            BiasCategory::EveningOnly => (1.0, 1.15, EVENING_START, EVENING_LENGTH),
            BiasCategory::Midday => (5.0, 5.0, 0.0, 1.0),
        }
    }

    /// Sample a fractional position within the day window.
    ///
    /// Full-day categories yield values in `[0, 1)`; the `*Only` categories
    /// yield values in their sub-window.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        let (alpha, beta, start, length) = self.distribution();
        let dist = Beta::new(alpha, beta).expect("bias table parameters are valid");
        start + dist.sample(rng) * length
    }

    fn name(self) -> &'static str {
        match self {
            BiasCategory::None => "none",
            BiasCategory::Morning => "morning",
            BiasCategory::MorningOnly => "morning_only",
            BiasCategory::Evening => "evening",
            BiasCategory::EveningOnly => "evening_only",
            BiasCategory::Midday => "midday",
        }
    }
}

impl From<BiasCategory> for u8 {
    fn from(bias: BiasCategory) -> u8 {
        match bias {
            BiasCategory::None => 0,
            BiasCategory::Morning => 1,
            BiasCategory::MorningOnly => 2,
            BiasCategory::Evening => 3,
            BiasCategory::EveningOnly => 4,
            BiasCategory::Midday => 5,
        }
    }
}

impl TryFrom<u8> for BiasCategory {
    type Error = InvalidBias;

    fn try_from(ordinal: u8) -> Result<Self, InvalidBias> {
        match ordinal {
            0 => Ok(BiasCategory::None),
            1 => Ok(BiasCategory::Morning),
            2 => Ok(BiasCategory::MorningOnly),
            3 => Ok(BiasCategory::Evening),
            4 => Ok(BiasCategory::EveningOnly),
            5 => Ok(BiasCategory::Midday),
            other => Err(InvalidBias(other)),
        }
    }
}

impl fmt::Display for BiasCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BiasCategory {
    type Err = ParseBiasError;

    fn from_str(s: &str) -> Result<Self, ParseBiasError> {
        match s {
            "none" => Ok(BiasCategory::None),
            "morning" => Ok(BiasCategory::Morning),
            "morning_only" => Ok(BiasCategory::MorningOnly),
            "evening" => Ok(BiasCategory::Evening),
            "evening_only" => Ok(BiasCategory::EveningOnly),
            "midday" => Ok(BiasCategory::Midday),
            other => Err(ParseBiasError(other.to_string())),
        }
    }
}
