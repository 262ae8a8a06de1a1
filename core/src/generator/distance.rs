use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::*;

/// Seeded generator following a [`MineCurve`].
///
/// Every position gets its own draw derived from `(seed, row, col)`, so a game is fully
/// reproducible from its seed regardless of the order the field is explored in.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceWeightedGenerator {
    seed: u64,
    curve: MineCurve,
}

impl DistanceWeightedGenerator {
    pub fn new(seed: u64, curve: MineCurve) -> Self {
        Self { seed, curve }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, MineCurve::DEFAULT)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn curve(&self) -> MineCurve {
        self.curve
    }

    /// Uniform draw in `[0, 1)` for `position`.
    fn roll(&self, position: Position) -> f64 {
        let packed = (u64::from(position.row as u32) << 32) | u64::from(position.col as u32);
        // spread the coordinates before mixing in the seed so nearby cells of different games
        // don't share streams
        let mixed = self.seed ^ packed.wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut rng = SmallRng::seed_from_u64(mixed);
        rng.random::<f64>()
    }
}

impl MineGenerator for DistanceWeightedGenerator {
    fn is_mine(&self, position: Position) -> bool {
        let probability = self.curve.probability(position);
        if probability <= 0.0 {
            return false;
        }
        self.roll(position) < probability
    }
}
