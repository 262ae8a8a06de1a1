//! Logic core of an infinite-field minesweeper.
//!
//! The field is materialized lazily around player actions: revealing a tile grows the
//! [`Board`] by its missing neighbours, drawing each new tile from a [`MineGenerator`].
//! Every action goes through a [`RevealEngine`] and yields a fresh board snapshot, leaving
//! the previous one untouched.

use core::ops::BitOr;

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use input::*;
pub use tile::*;
pub use types::*;
pub use view::*;

mod board;
mod engine;
mod error;
mod generator;
mod input;
mod tile;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of a reveal or chord. Hitting a mine is reported but does not end the game.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Merges outcomes of a multi-reveal, a mine anywhere wins.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}
