use serde::{Deserialize, Serialize};

use crate::*;
pub use distance::*;
pub use fixed::*;

mod distance;
mod fixed;

pub const PROBABILITY_MINE_MIN: f64 = 0.15;
pub const PROBABILITY_MINE_MAX: f64 = 0.25;
pub const DISTANCE_MINE_CAP: f64 = 20.0;

/// Anything within this squared distance of the origin is never a mine, which keeps the
/// origin and its 8 neighbours safe.
pub const SAFE_RADIUS_SQUARED: i64 = 2;

/// Mine placement policy, consulted once for every position the engine materializes.
pub trait MineGenerator {
    fn is_mine(&self, position: Position) -> bool;
}

impl<G: MineGenerator + ?Sized> MineGenerator for &G {
    fn is_mine(&self, position: Position) -> bool {
        (**self).is_mine(position)
    }
}

/// Mine probability as a function of distance from the origin: linear from
/// `min_probability` at the origin up to `max_probability` at `distance_cap`, flat after.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineCurve {
    min_probability: f64,
    max_probability: f64,
    distance_cap: f64,
}

impl MineCurve {
    pub const DEFAULT: Self = Self {
        min_probability: PROBABILITY_MINE_MIN,
        max_probability: PROBABILITY_MINE_MAX,
        distance_cap: DISTANCE_MINE_CAP,
    };

    pub fn new(min_probability: f64, max_probability: f64, distance_cap: f64) -> Result<Self> {
        let valid = (0.0..=1.0).contains(&min_probability)
            && (min_probability..=1.0).contains(&max_probability)
            && distance_cap > 0.0
            && distance_cap.is_finite();
        if valid {
            Ok(Self {
                min_probability,
                max_probability,
                distance_cap,
            })
        } else {
            Err(GameError::InvalidCurve)
        }
    }

    /// Like [`MineCurve::new`] but forces the values into a usable range instead of failing.
    pub fn new_clamped(min_probability: f64, max_probability: f64, distance_cap: f64) -> Self {
        if let Ok(curve) = Self::new(min_probability, max_probability, distance_cap) {
            return curve;
        }

        let min = clamp_probability(min_probability, PROBABILITY_MINE_MIN);
        let max = clamp_probability(max_probability, PROBABILITY_MINE_MAX).max(min);
        let cap = if distance_cap > 0.0 && distance_cap.is_finite() {
            distance_cap
        } else {
            DISTANCE_MINE_CAP
        };
        log::warn!(
            "Mine curve ({}, {}, {}) out of range, using ({}, {}, {})",
            min_probability,
            max_probability,
            distance_cap,
            min,
            max,
            cap
        );
        Self {
            min_probability: min,
            max_probability: max,
            distance_cap: cap,
        }
    }

    pub const fn min_probability(&self) -> f64 {
        self.min_probability
    }

    pub const fn max_probability(&self) -> f64 {
        self.max_probability
    }

    pub const fn distance_cap(&self) -> f64 {
        self.distance_cap
    }

    /// Chance that `position` holds a mine, zero inside the safe start area.
    pub fn probability(&self, position: Position) -> f64 {
        if position.distance_squared() <= SAFE_RADIUS_SQUARED {
            return 0.0;
        }
        let distance = position.distance().min(self.distance_cap);
        self.min_probability
            + (distance / self.distance_cap) * (self.max_probability - self.min_probability)
    }
}

impl Default for MineCurve {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn clamp_probability(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}
