use std::collections::VecDeque;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How adjacency counts are fixed up after new tiles are materialized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recount {
    /// Recount every safe tile on the board.
    #[default]
    Full,
    /// Recount only the new tiles and their neighbours.
    Incremental,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub recount: Recount,
}

/// Drives every player action against a board.
///
/// Snapshot methods take `&Board` and hand back a new board; the `*_in_place` variants
/// mutate a board the caller already owns and report what happened.
#[derive(Clone, Debug)]
pub struct RevealEngine<G = DistanceWeightedGenerator> {
    generator: G,
    config: EngineConfig,
}

impl<G: MineGenerator> RevealEngine<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, EngineConfig::default())
    }

    pub fn with_config(generator: G, config: EngineConfig) -> Self {
        Self { generator, config }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn expand_frontier(&self, board: &Board, row: Coord, col: Coord) -> Board {
        let mut next = board.clone();
        self.expand_in_place(&mut next, Position::new(row, col));
        next
    }

    pub fn reveal_tile(&self, board: &Board, row: Coord, col: Coord) -> Board {
        let mut next = board.clone();
        self.reveal_in_place(&mut next, Position::new(row, col));
        next
    }

    pub fn toggle_flag(&self, board: &Board, row: Coord, col: Coord) -> Board {
        let mut next = board.clone();
        self.toggle_flag_in_place(&mut next, Position::new(row, col));
        next
    }

    pub fn handle_chord(&self, board: &Board, row: Coord, col: Coord) -> Board {
        let mut next = board.clone();
        self.chord_in_place(&mut next, Position::new(row, col));
        next
    }

    /// Materializes the missing neighbours of `center` and fixes up adjacency counts.
    ///
    /// `center` itself is never created. Returns how many tiles were added.
    pub fn expand_in_place(&self, board: &mut Board, center: Position) -> usize {
        let missing: SmallVec<[Position; 8]> = center
            .neighbours()
            .filter(|&pos| !board.has_tile(pos))
            .collect();
        // a full recount also repairs counts on hosts that built the board by hand
        if missing.is_empty() && self.config.recount == Recount::Incremental {
            return 0;
        }

        // the generator sees each position exactly once, when it stops being missing
        for &pos in &missing {
            let tile = if self.generator.is_mine(pos) {
                Tile::mine()
            } else {
                Tile::new(0)
            };
            board.add_tile(pos, tile);
        }

        match self.config.recount {
            Recount::Full => board.recount_all(),
            Recount::Incremental => {
                let affected: HashSet<Position> = missing
                    .iter()
                    .flat_map(|&pos| core::iter::once(pos).chain(pos.neighbours()))
                    .collect();
                board.recount(affected);
            }
        }

        log::trace!("Expanded around {}, {} new tiles", center, missing.len());
        missing.len()
    }

    pub fn reveal_in_place(&self, board: &mut Board, position: Position) -> RevealOutcome {
        match board.get_tile(position) {
            Some(tile) if !tile.is_revealed && !tile.is_flagged => {}
            _ => return RevealOutcome::NoChange,
        }

        self.expand_in_place(board, position);

        let Some(tile) = board.tile_mut(position) else {
            unreachable!("tile at {position} vanished during expansion");
        };
        tile.is_revealed = true;
        let tile = *tile;

        if tile.is_mine() {
            // no terminal state, play goes on
            log::debug!("Revealed mine at {}", position);
            return RevealOutcome::HitMine;
        }

        log::debug!("Revealed {} with {} adjacent mines", position, tile.adjacent_mines);
        if tile.is_empty() {
            self.flood_fill(board, position);
        }
        RevealOutcome::Revealed
    }

    /// Breadth-first reveal of the empty region connected to `origin` and its safe border.
    fn flood_fill(&self, board: &mut Board, origin: Position) {
        let mut to_visit = VecDeque::from([origin]);
        let mut revealed = 0usize;

        while let Some(current) = to_visit.pop_front() {
            for neighbour in current.neighbours() {
                // counts must be final before the tile is judged
                self.expand_in_place(board, neighbour);

                let Some(tile) = board.get_tile(neighbour) else {
                    continue;
                };
                if tile.is_revealed || tile.is_mine() || tile.is_flagged {
                    continue;
                }

                if let Some(tile) = board.tile_mut(neighbour) {
                    tile.is_revealed = true;
                    revealed += 1;
                    log::trace!("Flood revealed {} ({})", neighbour, tile.adjacent_mines);
                    if tile.is_empty() {
                        to_visit.push_back(neighbour);
                    }
                }
            }
        }

        log::debug!("Flood fill from {} revealed {} tiles", origin, revealed);
    }

    pub fn toggle_flag_in_place(&self, board: &mut Board, position: Position) -> MarkOutcome {
        match board.get_tile(position) {
            Some(tile) if !tile.is_revealed => {}
            _ => return MarkOutcome::NoChange,
        }

        let Some(tile) = board.tile_mut(position) else {
            return MarkOutcome::NoChange;
        };
        tile.is_flagged = !tile.is_flagged;
        log::debug!("Flag at {} set to {}", position, tile.is_flagged);
        MarkOutcome::Changed
    }

    /// Reveals every open neighbour of a revealed tile once enough mines around it are known.
    ///
    /// Flags and already exposed mines both count toward the tile's number.
    pub fn chord_in_place(&self, board: &mut Board, position: Position) -> RevealOutcome {
        let count = match board.get_tile(position) {
            Some(tile) if tile.is_revealed => tile.adjacent_mines,
            _ => return RevealOutcome::NoChange,
        };

        let known_mines = board
            .iter_neighbour_tiles(position)
            .filter(|(_, tile)| tile.is_known_mine())
            .count();
        if known_mines != usize::from(count) {
            log::trace!(
                "Chord at {} skipped, {} known mines for count {}",
                position,
                known_mines,
                count
            );
            return RevealOutcome::NoChange;
        }

        let targets: SmallVec<[Position; 8]> = board
            .iter_neighbour_tiles(position)
            .filter(|(_, tile)| !tile.is_revealed && !tile.is_flagged)
            .map(|(pos, _)| pos)
            .collect();
        log::debug!("Chord at {} opens {} tiles", position, targets.len());

        targets
            .into_iter()
            .map(|target| self.reveal_in_place(board, target))
            .reduce(core::ops::BitOr::bitor)
            .unwrap_or(RevealOutcome::NoChange)
    }
}
