use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileSymbol {
    /// Nothing materialized here yet.
    Absent,
    Hidden,
    Flag,
    Mine,
    /// Revealed with no mine neighbours.
    Blank,
    Number(u8),
}

impl TileSymbol {
    pub fn of(tile: Option<&Tile>) -> Self {
        use TileSymbol::*;

        match tile {
            None => Absent,
            Some(tile) if tile.is_flagged => Flag,
            Some(tile) if !tile.is_revealed => Hidden,
            Some(tile) if tile.is_mine() => Mine,
            Some(tile) if tile.is_empty() => Blank,
            Some(tile) => Number(tile.adjacent_mines),
        }
    }
}

/// Which corners of a cell face open space on all three touching sides.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corners {
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_right: bool,
    pub bottom_left: bool,
}

impl Corners {
    pub fn from_neighbour_types(types: NeighbourTypes) -> Self {
        let all_missing = |slots: [usize; 3]| slots.iter().all(|&slot| types[slot]);
        Self {
            top_left: all_missing([0, 1, 3]),
            top_right: all_missing([1, 2, 4]),
            bottom_right: all_missing([4, 6, 7]),
            bottom_left: all_missing([3, 5, 6]),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub position: Position,
    pub symbol: TileSymbol,
    pub corners: Corners,
}

/// Everything a renderer needs for one board snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Field position of `cells[(0, 0)]`.
    pub origin: Position,
    pub score: u64,
    pub cells: Array2<CellView>,
}

impl Frame {
    pub fn from_board(board: &Board) -> Self {
        let bounds = board.bounds();
        let grid = board.generate_grid();
        let cells = Array2::from_shape_fn(grid.dim(), |index| {
            let position = bounds.position_at(index);
            CellView {
                position,
                symbol: TileSymbol::of(grid[index].as_ref()),
                corners: Corners::from_neighbour_types(
                    board.neighbour_types(position.row, position.col),
                ),
            }
        });

        Self {
            origin: bounds.origin(),
            score: board.score(),
            cells,
        }
    }
}
