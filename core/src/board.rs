use std::cell::{OnceCell, RefCell};

use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// One entry per neighbour in [`NEIGHBOUR_OFFSETS`] order, `true` where no tile exists.
pub type NeighbourTypes = [bool; 8];

/// Inclusive bounding rectangle of every materialized tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_row: Coord,
    pub max_row: Coord,
    pub min_col: Coord,
    pub max_col: Coord,
}

impl Bounds {
    pub const fn at(position: Position) -> Self {
        Self {
            min_row: position.row,
            max_row: position.row,
            min_col: position.col,
            max_col: position.col,
        }
    }

    pub fn include(&mut self, position: Position) {
        self.min_row = self.min_row.min(position.row);
        self.max_row = self.max_row.max(position.row);
        self.min_col = self.min_col.min(position.col);
        self.max_col = self.max_col.max(position.col);
    }

    pub const fn contains(&self, position: Position) -> bool {
        self.min_row <= position.row
            && position.row <= self.max_row
            && self.min_col <= position.col
            && position.col <= self.max_col
    }

    /// Top-left corner, maps to index `[0, 0]` of the dense grid.
    pub const fn origin(&self) -> Position {
        Position::new(self.min_row, self.min_col)
    }

    /// `(rows, cols)` of the dense grid.
    pub fn dim(&self) -> (usize, usize) {
        let span = |min: Coord, max: Coord| (i64::from(max) - i64::from(min) + 1) as usize;
        (
            span(self.min_row, self.max_row),
            span(self.min_col, self.max_col),
        )
    }

    /// Inverse of the dense grid indexing.
    pub fn position_at(&self, (row, col): (usize, usize)) -> Position {
        Position::new(
            (i64::from(self.min_row) + row as i64) as Coord,
            (i64::from(self.min_col) + col as i64) as Coord,
        )
    }
}

/// Sparse, only-growing tile map over the infinite field.
///
/// The dense grid and the neighbour masks are memoized; every mutation goes through
/// [`Board::add_tile`] or [`Board::tile_mut`], which drop both memos.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: HashMap<Position, Tile>,
    bounds: Bounds,
    grid_cache: OnceCell<Array2<Option<Tile>>>,
    neighbour_cache: RefCell<HashMap<Position, NeighbourTypes>>,
}

impl Board {
    /// Board holding only the unrevealed origin tile.
    pub fn new() -> Self {
        let mut board = Self {
            tiles: HashMap::new(),
            bounds: Bounds::at(Position::ORIGIN),
            grid_cache: OnceCell::new(),
            neighbour_cache: RefCell::default(),
        };
        board.add_tile(Position::ORIGIN, Tile::default());
        board
    }

    pub fn add_tile(&mut self, position: Position, tile: Tile) {
        self.bounds.include(position);
        self.tiles.insert(position, tile);
        self.invalidate_cache();
    }

    pub fn get_tile(&self, position: Position) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn has_tile(&self, position: Position) -> bool {
        self.tiles.contains_key(&position)
    }

    /// Mutable access to an existing tile. Caches are dropped up front since the caller
    /// is about to change state the memos depend on.
    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        if !self.tiles.contains_key(&position) {
            return None;
        }
        self.invalidate_cache();
        self.tiles.get_mut(&position)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tiles in arbitrary order.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> {
        self.tiles.iter().map(|(&position, tile)| (position, tile))
    }

    pub fn iter_neighbour_tiles(
        &self,
        position: Position,
    ) -> impl Iterator<Item = (Position, &Tile)> {
        position
            .neighbours()
            .filter_map(|pos| self.tiles.get(&pos).map(|tile| (pos, tile)))
    }

    pub fn revealed_count(&self) -> usize {
        self.tiles.values().filter(|tile| tile.is_revealed).count()
    }

    pub fn flagged_count(&self) -> usize {
        self.tiles.values().filter(|tile| tile.is_flagged).count()
    }

    /// Dense `[row - min_row][col - min_col]` view, `None` where nothing is materialized.
    pub fn generate_grid(&self) -> &Array2<Option<Tile>> {
        self.grid_cache.get_or_init(|| {
            let bounds = self.bounds;
            log::trace!("Building dense grid {:?}", bounds.dim());
            Array2::from_shape_fn(bounds.dim(), |index| {
                self.tiles.get(&bounds.position_at(index)).copied()
            })
        })
    }

    pub fn invalidate_cache(&mut self) {
        self.grid_cache.take();
        self.neighbour_cache.get_mut().clear();
    }

    pub fn neighbour_types(&self, row: Coord, col: Coord) -> NeighbourTypes {
        let position = Position::new(row, col);
        if let Some(&types) = self.neighbour_cache.borrow().get(&position) {
            return types;
        }

        let types = NEIGHBOUR_OFFSETS.map(|delta| {
            position
                .offset(delta)
                .is_none_or(|neighbour| !self.tiles.contains_key(&neighbour))
        });
        self.neighbour_cache.borrow_mut().insert(position, types);
        types
    }

    /// Sum of `adjacent_mines` over revealed safe tiles.
    pub fn score(&self) -> u64 {
        self.tiles
            .values()
            .filter(|tile| tile.is_revealed && !tile.is_mine())
            .map(|tile| u64::from(tile.adjacent_mines))
            .sum()
    }

    pub fn count_adjacent_mines(&self, position: Position) -> u8 {
        // at most 8 neighbours, the cast cannot truncate
        self.iter_neighbour_tiles(position)
            .filter(|(_, tile)| tile.is_mine())
            .count() as u8
    }

    /// Recounts the listed safe tiles, leaving mines and absent positions alone.
    pub fn recount<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Position>,
    {
        let updates: Vec<_> = positions
            .into_iter()
            .filter(|pos| self.tiles.get(pos).is_some_and(|tile| !tile.is_mine()))
            .map(|pos| (pos, self.count_adjacent_mines(pos)))
            .collect();

        for (position, count) in updates {
            if let Some(tile) = self.tiles.get_mut(&position) {
                tile.adjacent_mines = count;
            }
        }
        self.invalidate_cache();
    }

    pub fn recount_all(&mut self) {
        let positions: Vec<_> = self.tiles.keys().copied().collect();
        self.recount(positions);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Value equality over tiles and bounds, memos are ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds && self.tiles == other.tiles
    }
}

impl Eq for Board {}

#[cfg(test)]
mod tests {
    use super::*;

    fn revealed(adjacent_mines: u8) -> Tile {
        Tile {
            is_revealed: true,
            ..Tile::new(adjacent_mines)
        }
    }

    #[test]
    fn new_board_holds_only_origin() {
        let board = Board::new();

        assert_eq!(board.len(), 1);
        assert_eq!(board.get_tile(Position::ORIGIN), Some(&Tile::default()));
        assert_eq!(board.bounds(), Bounds::at(Position::ORIGIN));
    }

    #[test]
    fn bounds_track_exact_extremes() {
        let mut board = Board::new();
        let inserted = [(3, -2), (-7, 4), (1, 1), (2, 9), (-1, -11)];

        for &(row, col) in &inserted {
            board.add_tile(Position::new(row, col), Tile::new(0));
        }

        let rows = inserted.iter().map(|p| p.0).chain([0]);
        let cols = inserted.iter().map(|p| p.1).chain([0]);
        assert_eq!(
            board.bounds(),
            Bounds {
                min_row: rows.clone().min().unwrap(),
                max_row: rows.max().unwrap(),
                min_col: cols.clone().min().unwrap(),
                max_col: cols.max().unwrap(),
            }
        );
    }

    #[test]
    fn grid_is_offset_by_bounds_and_sparse() {
        let mut board = Board::new();
        board.add_tile(Position::new(-1, 2), Tile::mine());

        let grid = board.generate_grid();

        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[(0, 2)], Some(Tile::mine()));
        assert_eq!(grid[(1, 0)], Some(Tile::default()));
        assert_eq!(grid[(0, 0)], None);
        assert_eq!(grid[(1, 2)], None);
    }

    #[test]
    fn grid_is_rebuilt_after_mutation() {
        let mut board = Board::new();
        assert_eq!(board.generate_grid()[(0, 0)], Some(Tile::default()));

        board.tile_mut(Position::ORIGIN).unwrap().is_revealed = true;

        assert_eq!(board.generate_grid()[(0, 0)], Some(revealed(0)));
    }

    #[test]
    fn neighbour_types_report_missing_slots_in_order() {
        let mut board = Board::new();
        board.add_tile(Position::new(-1, 0), Tile::new(0));
        board.add_tile(Position::new(1, 1), Tile::new(0));

        assert_eq!(
            board.neighbour_types(0, 0),
            [true, false, true, true, true, true, true, false]
        );
    }

    #[test]
    fn neighbour_types_refresh_after_add() {
        let mut board = Board::new();
        assert!(board.neighbour_types(0, 0).iter().all(|&missing| missing));

        board.add_tile(Position::new(0, 1), Tile::new(0));

        assert_eq!(
            board.neighbour_types(0, 0),
            [true, true, true, true, false, true, true, true]
        );
    }

    #[test]
    fn score_sums_revealed_safe_counts() {
        let mut board = Board::new();
        board.add_tile(Position::new(0, 1), revealed(3));
        board.add_tile(Position::new(0, 2), revealed(2));
        board.add_tile(Position::new(0, 3), Tile::new(5));
        board.add_tile(
            Position::new(0, 4),
            Tile {
                is_revealed: true,
                ..Tile::mine()
            },
        );

        assert_eq!(board.score(), 5);
    }

    #[test]
    fn clone_is_independent() {
        let mut board = Board::new();
        let snapshot = board.clone();

        board.tile_mut(Position::ORIGIN).unwrap().is_flagged = true;
        board.add_tile(Position::new(4, 4), Tile::mine());

        assert_eq!(snapshot, Board::new());
        assert_ne!(snapshot, board);
        assert!(!snapshot.get_tile(Position::ORIGIN).unwrap().is_flagged);
    }

    #[test]
    fn recount_skips_mines() {
        let mut board = Board::new();
        board.add_tile(Position::new(0, 1), Tile::mine());
        board.add_tile(Position::new(1, 1), Tile::mine());
        board.add_tile(Position::new(1, 0), Tile::new(7));

        board.recount_all();

        assert_eq!(board.get_tile(Position::ORIGIN).unwrap().adjacent_mines, 2);
        assert_eq!(board.get_tile(Position::new(1, 0)).unwrap().adjacent_mines, 2);
        assert!(board.get_tile(Position::new(0, 1)).unwrap().is_mine());
    }
}
