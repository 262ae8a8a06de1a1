use serde::{Deserialize, Serialize};

/// Reserved `adjacent_mines` value marking a mine. Safe tiles only ever count 0 to 8.
pub const MINE_SENTINEL: u8 = 9;

/// Per-cell state of a materialized tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub adjacent_mines: u8,
}

impl Tile {
    /// Fresh, unrevealed and unflagged tile.
    pub const fn new(adjacent_mines: u8) -> Self {
        Self {
            is_revealed: false,
            is_flagged: false,
            adjacent_mines,
        }
    }

    pub const fn mine() -> Self {
        Self::new(MINE_SENTINEL)
    }

    pub const fn is_mine(&self) -> bool {
        self.adjacent_mines == MINE_SENTINEL
    }

    /// Safe with no mine neighbours, flood fill continues through these.
    pub const fn is_empty(&self) -> bool {
        self.adjacent_mines == 0
    }

    /// Counts toward a chord: either marked by the player or an exposed mine.
    pub const fn is_known_mine(&self) -> bool {
        self.is_flagged || (self.is_revealed && self.is_mine())
    }
}
