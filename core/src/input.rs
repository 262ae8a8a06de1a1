use std::rc::Rc;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Pressed pointer buttons, same bit layout as `MouseEvent.buttons`.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MouseButtons: u16 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const MIDDLE    = 1 << 2;
        const BACK      = 1 << 3;
        const FORWARD   = 1 << 4;
    }
}

impl MouseButtons {
    pub const CHORD: Self = Self::PRIMARY.union(Self::SECONDARY);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PointerState {
    position: Position,
    buttons: MouseButtons,
}

/// A running game: the engine, the current board snapshot and the pointer gesture in flight.
///
/// Snapshots are shared through [`Rc`], a renderer may keep an old one while the game moves on.
#[derive(Debug)]
pub struct Game<G = DistanceWeightedGenerator> {
    engine: RevealEngine<G>,
    board: Rc<Board>,
    pressed: Option<PointerState>,
}

impl Game {
    pub fn with_seed(seed: u64) -> Self {
        log::debug!("New game with seed {}", seed);
        Self::new(RevealEngine::new(DistanceWeightedGenerator::with_seed(seed)))
    }
}

impl<G: MineGenerator> Game<G> {
    /// Starts a game with the origin already revealed.
    pub fn new(engine: RevealEngine<G>) -> Self {
        let board = engine.reveal_tile(&Board::new(), 0, 0);
        Self {
            engine,
            board: Rc::new(board),
            pressed: None,
        }
    }

    pub fn engine(&self) -> &RevealEngine<G> {
        &self.engine
    }

    /// Current snapshot. Later actions never mutate it.
    pub fn board(&self) -> Rc<Board> {
        Rc::clone(&self.board)
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }

    pub fn frame(&self) -> Frame {
        Frame::from_board(&self.board)
    }

    /// Secondary button alone flags right away; anything else is remembered for the release.
    pub fn on_tile_mouse_down(&mut self, buttons: MouseButtons, row: Coord, col: Coord) -> bool {
        let position = Position::new(row, col);
        log::trace!("{} mouse down ({:?})", position, buttons);

        let updated = if buttons == MouseButtons::SECONDARY {
            self.apply(|engine, board| engine.toggle_flag_in_place(board, position).has_update())
        } else {
            false
        };
        self.pressed = Some(PointerState { position, buttons });
        updated
    }

    /// Completes the gesture started by the last mouse down: a lone primary click released
    /// over the same tile reveals it, a two-button press chords where it is released.
    pub fn on_tile_mouse_up(&mut self, buttons: MouseButtons, row: Coord, col: Coord) -> bool {
        let position = Position::new(row, col);
        log::trace!("{} mouse up ({:?})", position, buttons);

        let Some(pressed) = self.pressed.take() else {
            return false;
        };

        if pressed.buttons == MouseButtons::PRIMARY && buttons.is_empty() {
            if pressed.position != position {
                log::trace!("Released away from {}, reveal cancelled", pressed.position);
                return false;
            }
            self.apply(|engine, board| engine.reveal_in_place(board, position).has_update())
        } else if pressed.buttons == MouseButtons::CHORD {
            self.apply(|engine, board| engine.chord_in_place(board, position).has_update())
        } else {
            false
        }
    }

    /// Runs `action` on a private copy and publishes it only if something changed.
    fn apply<F>(&mut self, action: F) -> bool
    where
        F: FnOnce(&RevealEngine<G>, &mut Board) -> bool,
    {
        let mut next = Board::clone(&self.board);
        let updated = action(&self.engine, &mut next);
        if updated {
            self.board = Rc::new(next);
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Origin surrounded by a ring of mines at distance 2 with a single gap at (2, 0).
    fn ringed_game() -> Game<FixedLayoutGenerator> {
        let ring = (-2..=2)
            .flat_map(|row| (-2..=2).map(move |col| (row, col)))
            .filter(|&(row, col): &(Coord, Coord)| row.abs().max(col.abs()) == 2)
            .filter(|&pos| pos != (2, 0));
        let wall = Bounds {
            min_row: -3,
            max_row: 3,
            min_col: -3,
            max_col: 3,
        };
        Game::new(RevealEngine::new(
            FixedLayoutGenerator::from_mines(ring).walled(wall),
        ))
    }

    fn tile(game: &Game<FixedLayoutGenerator>, row: Coord, col: Coord) -> Tile {
        *game.board().get_tile(Position::new(row, col)).unwrap()
    }

    #[test]
    fn new_game_reveals_origin() {
        let game = ringed_game();

        assert!(tile(&game, 0, 0).is_revealed);
        assert!(tile(&game, 1, 0).is_revealed);
        assert_eq!(tile(&game, 1, 0).adjacent_mines, 2);
        assert!(!tile(&game, 2, 0).is_revealed);
    }

    #[test]
    fn seeded_game_starts_revealed() {
        let game = Game::with_seed(99);

        assert!(game.board().get_tile(Position::ORIGIN).unwrap().is_revealed);
        assert_eq!(game.score(), game.board().score());
    }

    #[test]
    fn primary_click_reveals_on_same_tile() {
        let mut game = ringed_game();

        assert!(!game.on_tile_mouse_down(MouseButtons::PRIMARY, 2, 0));
        assert!(game.on_tile_mouse_up(MouseButtons::empty(), 2, 0));

        assert!(tile(&game, 2, 0).is_revealed);
        assert_eq!(tile(&game, 2, 0).adjacent_mines, 2);
    }

    #[test]
    fn primary_release_elsewhere_cancels() {
        let mut game = ringed_game();

        game.on_tile_mouse_down(MouseButtons::PRIMARY, 2, 0);
        assert!(!game.on_tile_mouse_up(MouseButtons::empty(), 1, 0));

        assert!(!tile(&game, 2, 0).is_revealed);
    }

    #[test]
    fn secondary_press_toggles_flag_immediately() {
        let mut game = ringed_game();

        assert!(game.on_tile_mouse_down(MouseButtons::SECONDARY, 2, 1));
        assert!(tile(&game, 2, 1).is_flagged);
        assert!(!game.on_tile_mouse_up(MouseButtons::empty(), 2, 1));
        assert!(tile(&game, 2, 1).is_flagged);

        assert!(game.on_tile_mouse_down(MouseButtons::SECONDARY, 2, 1));
        assert!(!tile(&game, 2, 1).is_flagged);
    }

    #[test]
    fn flagging_revealed_tile_reports_no_update() {
        let mut game = ringed_game();

        assert!(!game.on_tile_mouse_down(MouseButtons::SECONDARY, 0, 0));
    }

    #[test]
    fn both_buttons_chord_on_release() {
        let mut game = ringed_game();
        game.on_tile_mouse_down(MouseButtons::SECONDARY, 2, -1);
        game.on_tile_mouse_up(MouseButtons::empty(), 2, -1);
        game.on_tile_mouse_down(MouseButtons::SECONDARY, 2, 1);
        game.on_tile_mouse_up(MouseButtons::empty(), 2, 1);

        game.on_tile_mouse_down(MouseButtons::PRIMARY, 1, 0);
        game.on_tile_mouse_down(MouseButtons::CHORD, 1, 0);
        assert!(game.on_tile_mouse_up(MouseButtons::SECONDARY, 1, 0));
        // releasing the remaining button finishes nothing
        assert!(!game.on_tile_mouse_up(MouseButtons::empty(), 1, 0));

        assert!(tile(&game, 2, 0).is_revealed);
        assert!(!tile(&game, 2, 1).is_revealed);
    }

    #[test]
    fn release_without_press_does_nothing() {
        let mut game = ringed_game();
        let before = game.board();

        assert!(!game.on_tile_mouse_up(MouseButtons::empty(), 2, 0));
        assert!(Rc::ptr_eq(&before, &game.board()));
    }

    #[test]
    fn old_snapshots_survive_actions() {
        let mut game = ringed_game();
        let before = game.board();

        game.on_tile_mouse_down(MouseButtons::PRIMARY, 2, 0);
        game.on_tile_mouse_up(MouseButtons::empty(), 2, 0);

        assert!(!before.get_tile(Position::new(2, 0)).unwrap().is_revealed);
        assert!(!before.has_tile(Position::new(3, 0)));
        assert!(game.board().has_tile(Position::new(3, 0)));
    }
}
