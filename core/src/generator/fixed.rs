use hashbrown::HashSet;

use super::*;

/// Generator backed by an explicit set of mine positions.
///
/// The field is infinite, so a layout with few mines can flood fill without end. A wall
/// turns everything outside the given bounds into mines, which keeps reveals finite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixedLayoutGenerator {
    mines: HashSet<Position>,
    wall: Option<Bounds>,
}

impl FixedLayoutGenerator {
    pub fn from_mines<I, P>(mines: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let mines: HashSet<Position> = mines.into_iter().map(Into::into).collect();
        if let Some(pos) = mines
            .iter()
            .find(|pos| pos.distance_squared() <= SAFE_RADIUS_SQUARED)
        {
            log::warn!("Fixed layout places a mine in the safe start area at {}", pos);
        }
        Self { mines, wall: None }
    }

    /// Everything outside `bounds` is a mine.
    pub fn walled(mut self, bounds: Bounds) -> Self {
        self.wall = Some(bounds);
        self
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }
}

impl MineGenerator for FixedLayoutGenerator {
    fn is_mine(&self, position: Position) -> bool {
        self.mines.contains(&position) || self.wall.is_some_and(|wall| !wall.contains(position))
    }
}
