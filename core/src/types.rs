use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis. The field is unbounded in both directions, so this is signed.
pub type Coord = i32;

/// Integer coordinate on the infinite field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    pub const ORIGIN: Self = Self::new(0, 0);

    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Canonical `"{row}_{col}"` key.
    pub fn key(self) -> String {
        self.to_string()
    }

    pub fn from_key(key: &str) -> Result<Self> {
        let invalid = || GameError::InvalidPositionKey(key.to_owned());
        let (row, col) = key.split_once('_').ok_or_else(invalid)?;
        let row = row.parse().map_err(|_| invalid())?;
        let col = col.parse().map_err(|_| invalid())?;
        let position = Self::new(row, col);
        // only the canonical spelling is accepted, no `+3` or `03`
        if position.key() != key {
            return Err(invalid());
        }
        Ok(position)
    }

    /// Squared euclidean distance from the origin, widened so it cannot overflow.
    pub const fn distance_squared(self) -> i64 {
        let row = self.row as i64;
        let col = self.col as i64;
        row * row + col * col
    }

    pub fn distance(self) -> f64 {
        (self.distance_squared() as f64).sqrt()
    }

    pub fn offset(self, (d_row, d_col): (Coord, Coord)) -> Option<Self> {
        Some(Self::new(
            self.row.checked_add(d_row)?,
            self.col.checked_add(d_col)?,
        ))
    }

    /// The 8 surrounding positions in [`NEIGHBOUR_OFFSETS`] order.
    pub fn neighbours(self) -> NeighbourIter {
        NeighbourIter::new(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_key(s)
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self::new(row, col)
    }
}

/// `(d_row, d_col)` for each neighbour, row-major with the centre skipped.
///
/// The order is part of the rendering contract: [`Board::neighbour_types`](crate::Board::neighbour_types)
/// reports slots in exactly this order.
pub const NEIGHBOUR_OFFSETS: [(Coord, Coord); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone)]
pub struct NeighbourIter {
    center: Position,
    index: u8,
}

impl NeighbourIter {
    fn new(center: Position) -> Self {
        Self { center, index: 0 }
    }
}

impl Iterator for NeighbourIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *NEIGHBOUR_OFFSETS.get(usize::from(self.index))?;
            self.index += 1;

            // positions past the coordinate range simply do not exist
            if let Some(next_item) = self.center.offset(delta) {
                return Some(next_item);
            }
        }
    }
}
