//! Game-state interface consumed by the scene and session layers

use gridscene_math::Vec2;

/// Rows of cell codes, indexed `board[row][column]`
pub type Board = Vec<Vec<u8>>;

/// Board cell kinds and their numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cell {
    Floor = 0,
    Block = 1,
    Target = 2,
    Box = 3,
    /// A box resting on a target
    BoxOnTarget = 4,
}

impl Cell {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cell::Floor),
            1 => Some(Cell::Block),
            2 => Some(Cell::Target),
            3 => Some(Cell::Box),
            4 => Some(Cell::BoxOnTarget),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn has_box(self) -> bool {
        matches!(self, Cell::Box | Cell::BoxOnTarget)
    }

    pub fn has_target(self) -> bool {
        matches!(self, Cell::Target | Cell::BoxOnTarget)
    }

    /// The player may step here
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Floor | Cell::Target)
    }
}

/// Grid positions of the board's objects, scanned row by row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPositions {
    pub blocks: Vec<Vec2>,
    pub targets: Vec<Vec2>,
    pub boxes: Vec<Vec2>,
}

impl ObjectPositions {
    /// Collect positions from a board of cell codes; unknown codes are skipped
    pub fn scan(board: &Board) -> Self {
        let mut positions = Self::default();
        for (row, cells) in board.iter().enumerate() {
            for (column, &code) in cells.iter().enumerate() {
                let Some(cell) = Cell::from_code(code) else {
                    continue;
                };
                let position = Vec2::new(column as f32, row as f32);
                if cell == Cell::Block {
                    positions.blocks.push(position);
                }
                if cell.has_target() {
                    positions.targets.push(position);
                }
                if cell.has_box() {
                    positions.boxes.push(position);
                }
            }
        }
        positions
    }
}

/// Puzzle state the renderer and input layers read and drive
pub trait GameState {
    /// Player cell as (column, row)
    fn player_position(&self) -> Vec2;

    fn board(&self) -> &Board;

    fn object_positions(&self) -> ObjectPositions;

    /// Accepted moves so far
    fn move_count(&self) -> u32;

    fn is_complete(&self) -> bool;

    /// Try to move the player by a unit `offset` of `[dx, dy]`
    ///
    /// Returns whether the move was accepted; a rejected move changes nothing.
    fn update_player_position(&mut self, offset: [i32; 2]) -> bool;
}

/// Render a board as text, one space-separated row per line
pub fn board_to_text(board: &Board) -> String {
    board.iter().fold(String::new(), |mut out, row| {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_codes_round_trip() {
        for code in 0..=4 {
            assert_eq!(Cell::from_code(code).map(Cell::code), Some(code));
        }
        assert_eq!(Cell::from_code(5), None);
    }

    #[test]
    fn test_box_on_target_counts_twice() {
        let board = vec![vec![1, 4], vec![2, 3]];
        let positions = ObjectPositions::scan(&board);
        assert_eq!(positions.blocks, vec![Vec2::new(0.0, 0.0)]);
        assert_eq!(positions.targets, vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        assert_eq!(positions.boxes, vec![Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]);
    }

    #[test]
    fn test_board_to_text() {
        assert_eq!(board_to_text(&vec![vec![1, 0], vec![2, 3]]), "1 0\n2 3\n");
    }
}
