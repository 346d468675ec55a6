//! Level definitions in RON
//!
//! ```ron
//! Level(
//!     name: "level 1",
//!     board: [[1, 1, 1], [1, 0, 1], [1, 1, 1]],
//!     player: (1, 1),
//! )
//! ```

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::{Board, Cell};

/// Starting layout of a puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Cell codes, `board[row][column]`
    pub board: Board,
    /// Player start as (column, row)
    pub player: (usize, usize),
}

/// Error loading or validating a level
#[derive(Debug)]
pub enum LevelError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// The level parses but cannot be played
    Invalid { name: String, reason: String },
}

impl From<io::Error> for LevelError {
    fn from(e: io::Error) -> Self {
        LevelError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::Parse(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::Io(e) => write!(f, "IO error: {}", e),
            LevelError::Parse(e) => write!(f, "Parse error: {}", e),
            LevelError::Invalid { name, reason } => write!(f, "Invalid level '{}': {}", name, reason),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io(e) => Some(e),
            LevelError::Parse(e) => Some(e),
            LevelError::Invalid { .. } => None,
        }
    }
}

impl Level {
    /// Parse and validate a level from RON text
    pub fn from_ron(source: &str) -> Result<Self, LevelError> {
        let level: Level = ron::from_str(source)?;
        level.validate()?;
        Ok(level)
    }

    /// Load and validate a level file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// The classic nine by nine board
    pub fn builtin() -> Self {
        Self {
            name: "classic".to_string(),
            board: vec![
                vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
                vec![1, 2, 0, 0, 1, 1, 1, 2, 1],
                vec![1, 0, 0, 0, 0, 1, 1, 0, 1],
                vec![1, 1, 0, 0, 0, 0, 3, 0, 1],
                vec![1, 1, 3, 0, 0, 0, 0, 0, 1],
                vec![1, 0, 0, 1, 0, 0, 3, 0, 1],
                vec![1, 0, 1, 1, 0, 0, 1, 1, 1],
                vec![1, 0, 0, 0, 0, 0, 2, 1, 1],
                vec![1, 1, 1, 1, 1, 1, 1, 1, 1],
            ],
            player: (4, 4),
        }
    }

    pub fn rows(&self) -> usize {
        self.board.len()
    }

    pub fn columns(&self) -> usize {
        self.board.first().map_or(0, Vec::len)
    }

    /// Check that the level is rectangular and playable
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |reason: String| LevelError::Invalid {
            name: self.name.clone(),
            reason,
        };

        let columns = self.columns();
        if self.rows() == 0 || columns == 0 {
            return Err(invalid("board is empty".to_string()));
        }

        let mut boxes = 0;
        let mut targets = 0;
        let mut uncovered = 0;
        for (row, cells) in self.board.iter().enumerate() {
            if cells.len() != columns {
                return Err(invalid(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    columns
                )));
            }
            for (column, &code) in cells.iter().enumerate() {
                let cell = Cell::from_code(code).ok_or_else(|| {
                    invalid(format!("unknown cell code {} at ({}, {})", code, column, row))
                })?;
                boxes += cell.has_box() as usize;
                targets += cell.has_target() as usize;
                uncovered += (cell == Cell::Target) as usize;
            }
        }

        let (x, y) = self.player;
        if x >= columns || y >= self.rows() {
            return Err(invalid(format!("player ({}, {}) is outside the board", x, y)));
        }
        if !Cell::from_code(self.board[y][x]).is_some_and(Cell::is_walkable) {
            return Err(invalid(format!("player ({}, {}) starts on an occupied cell", x, y)));
        }
        if boxes == 0 || targets == 0 {
            return Err(invalid("needs at least one box and one target".to_string()));
        }
        if boxes != targets {
            return Err(invalid(format!("{} boxes for {} targets", boxes, targets)));
        }
        if uncovered == 0 {
            return Err(invalid("every target is already covered".to_string()));
        }

        Ok(())
    }
}
