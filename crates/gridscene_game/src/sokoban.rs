//! Box-pushing rules

use gridscene_math::Vec2;

use crate::level::Level;
use crate::state::{Board, Cell, GameState, ObjectPositions};

/// Sokoban played on a board of cell codes
///
/// Targets under boxes are kept as [`Cell::BoxOnTarget`] so they reappear
/// when the box is pushed off, and the player may walk over targets. This
/// departs from the stricter browser rules, where a target is overwritten
/// by the box that lands on it and blocks the player. The debug board text
/// therefore shows code 4 for a covered target.
///
/// Boards are expected to have passed [`Level::validate`]; moves into cells
/// outside a ragged row are rejected rather than panicking.
#[derive(Debug, Clone, PartialEq)]
pub struct Sokoban {
    name: String,
    board: Board,
    /// (column, row)
    player: [usize; 2],
    move_count: u32,
    is_complete: bool,
}

impl Default for Sokoban {
    fn default() -> Self {
        Self::new(&Level::builtin())
    }
}

impl Sokoban {
    /// Start a game from `level`, which should already be validated
    pub fn new(level: &Level) -> Self {
        Self {
            name: level.name.clone(),
            board: level.board.clone(),
            player: [level.player.0, level.player.1],
            move_count: 0,
            is_complete: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> usize {
        self.board.len()
    }

    pub fn columns(&self) -> usize {
        self.board.first().map_or(0, Vec::len)
    }

    fn offset(&self, from: [usize; 2], offset: [i32; 2]) -> Option<[usize; 2]> {
        let x = from[0].checked_add_signed(offset[0] as isize)?;
        let y = from[1].checked_add_signed(offset[1] as isize)?;
        (x < self.columns() && y < self.rows()).then_some([x, y])
    }

    /// `None` for unknown codes and cells outside a ragged row
    fn cell(&self, at: [usize; 2]) -> Option<Cell> {
        let code = *self.board.get(at[1])?.get(at[0])?;
        Cell::from_code(code)
    }

    fn set(&mut self, at: [usize; 2], cell: Cell) {
        self.board[at[1]][at[0]] = cell.code();
    }

    fn has_uncovered_target(&self) -> bool {
        self.board
            .iter()
            .flatten()
            .any(|&code| code == Cell::Target.code())
    }
}

impl GameState for Sokoban {
    fn player_position(&self) -> Vec2 {
        Vec2::from(self.player)
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn object_positions(&self) -> ObjectPositions {
        ObjectPositions::scan(&self.board)
    }

    fn move_count(&self) -> u32 {
        self.move_count
    }

    fn is_complete(&self) -> bool {
        self.is_complete
    }

    fn update_player_position(&mut self, offset: [i32; 2]) -> bool {
        if self.is_complete || offset[0].abs() + offset[1].abs() != 1 {
            return false;
        }
        let Some(next) = self.offset(self.player, offset) else {
            return false;
        };

        match self.cell(next) {
            Some(cell) if cell.is_walkable() => {}
            Some(cell) if cell.has_box() => {
                let Some(beyond) = self.offset(next, offset) else {
                    return false;
                };
                let landed = match self.cell(beyond) {
                    Some(Cell::Floor) => Cell::Box,
                    Some(Cell::Target) => Cell::BoxOnTarget,
                    _ => return false,
                };
                self.set(beyond, landed);
                self.set(next, if cell.has_target() { Cell::Target } else { Cell::Floor });

                if !self.has_uncovered_target() {
                    self.is_complete = true;
                    log::info!("Level {} complete after {} moves", self.name, self.move_count + 1);
                }
            }
            _ => return false,
        }

        self.player = next;
        self.move_count += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(board: Board, player: (usize, usize)) -> Sokoban {
        Sokoban::new(&Level {
            name: "test".to_string(),
            board,
            player,
        })
    }

    #[test]
    fn test_builtin_start() {
        let game = Sokoban::default();
        assert_eq!(game.player_position(), Vec2::new(4.0, 4.0));
        assert_eq!(game.object_positions().boxes.len(), 3);
        assert_eq!(game.object_positions().targets.len(), 3);
        assert_eq!(game.move_count(), 0);
        assert!(!game.is_complete());
    }

    #[test]
    fn test_walk_onto_floor() {
        let mut game = game(vec![vec![0, 0, 3, 2]], (0, 0));
        assert!(game.update_player_position([1, 0]));
        assert_eq!(game.player_position(), Vec2::new(1.0, 0.0));
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn test_blocked_by_wall_and_edge() {
        let mut game = game(vec![vec![0, 1], vec![3, 2]], (0, 0));
        assert!(!game.update_player_position([1, 0]));
        assert!(!game.update_player_position([-1, 0]));
        assert!(!game.update_player_position([0, -1]));
        assert_eq!(game.move_count(), 0);
        assert_eq!(game.player_position(), Vec2::ZERO);
    }

    #[test]
    fn test_non_unit_offsets_rejected() {
        let mut game = game(vec![vec![0, 0, 0, 3, 2]], (0, 0));
        assert!(!game.update_player_position([2, 0]));
        assert!(!game.update_player_position([1, 1]));
        assert!(!game.update_player_position([0, 0]));
    }

    #[test]
    fn test_push_box_onto_target_completes() {
        let mut game = game(vec![vec![0], vec![3], vec![2]], (0, 0));
        assert!(game.update_player_position([0, 1]));
        assert_eq!(game.board(), &vec![vec![0], vec![0], vec![4]]);
        assert_eq!(game.object_positions().boxes, vec![Vec2::new(0.0, 2.0)]);
        assert!(game.is_complete());
        // solved games accept no further moves
        assert!(!game.update_player_position([0, -1]));
    }

    #[test]
    fn test_cannot_push_two_boxes() {
        let mut game = game(vec![vec![0, 3, 3, 2, 2]], (0, 0));
        assert!(!game.update_player_position([1, 0]));
        assert_eq!(game.board(), &vec![vec![0, 3, 3, 2, 2]]);
    }

    #[test]
    fn test_cannot_push_box_off_board() {
        let mut game = game(vec![vec![2, 0, 3]], (1, 0));
        assert!(!game.update_player_position([1, 0]));
    }

    #[test]
    fn test_pushing_off_target_restores_it() {
        let mut game = game(vec![vec![0, 4, 0, 3, 2]], (0, 0));
        assert!(game.update_player_position([1, 0]));
        assert_eq!(game.board(), &vec![vec![0, 2, 3, 3, 2]]);
        assert!(!game.is_complete());
    }

    #[test]
    fn test_player_walks_over_target() {
        let mut game = game(vec![vec![0, 2, 0, 3]], (0, 0));
        assert!(game.update_player_position([1, 0]));
        assert!(game.update_player_position([1, 0]));
        assert_eq!(game.player_position(), Vec2::new(2.0, 0.0));
        assert_eq!(game.board(), &vec![vec![0, 2, 0, 3]]);
    }

    #[test]
    fn test_ragged_board_rejects_missing_cells() {
        let mut game = game(vec![vec![0, 0], vec![0]], (0, 0));
        assert!(game.update_player_position([0, 1]));
        assert!(!game.update_player_position([1, 0]));
        assert_eq!(game.player_position(), Vec2::new(0.0, 1.0));
        assert_eq!(game.move_count(), 1);
    }
}
