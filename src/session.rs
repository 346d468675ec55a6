//! Game session
//!
//! Owns the level list, the running [`Sokoban`] and the handles tying it to
//! the renderer. Input subscribers call into the session; the session
//! mutates the renderer's objects and decides when the game is over.

use std::fmt;
use std::time::{Duration, Instant};

use gridscene_game::{board_to_text, GameState, Level, LevelError, Sokoban};
use gridscene_math::Vec4;
use gridscene_render::{FrameLoop, LoopHandle, RenderError, Renderer};

use crate::assets::TextureSet;
use crate::input::Direction;
use crate::scene::{SceneBuilder, SceneHandles};

/// Message shown once the puzzle is solved
pub const FINISHED_MESSAGE: &str = "Finished!";

/// Surface and timing settings for a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Drawing surface size in pixels
    pub surface: (u32, u32),
    pub background: Vec4,
    /// Delay between the winning move and the end of the game
    pub completion_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            surface: (500, 500),
            background: Vec4::WHITE,
            completion_delay: Duration::from_millis(100),
        }
    }
}

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The move solved the puzzle; completion is now pending
    Completed,
    /// The game refused the move; nothing changed
    Rejected,
}

#[derive(Debug)]
pub enum SessionError {
    NoLevels,
    LevelOutOfRange(usize),
    /// The chosen level is not playable
    Level(LevelError),
    Render(RenderError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoLevels => write!(f, "No levels to play"),
            SessionError::LevelOutOfRange(index) => write!(f, "No level at index {}", index),
            SessionError::Level(e) => write!(f, "{}", e),
            SessionError::Render(e) => write!(f, "Failed to build scene: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Level(e) => Some(e),
            SessionError::Render(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LevelError> for SessionError {
    fn from(e: LevelError) -> Self {
        SessionError::Level(e)
    }
}

impl From<RenderError> for SessionError {
    fn from(e: RenderError) -> Self {
        SessionError::Render(e)
    }
}

pub struct Session {
    levels: Vec<Level>,
    textures: TextureSet,
    config: SessionConfig,
    current: usize,
    game: Sokoban,
    handles: SceneHandles,
    completion_due: Option<Instant>,
    finished: bool,
}

impl Session {
    /// Start a session on level `start`
    pub fn new(
        levels: Vec<Level>,
        textures: TextureSet,
        config: SessionConfig,
        start: usize,
    ) -> Result<Self, SessionError> {
        if levels.is_empty() {
            return Err(SessionError::NoLevels);
        }
        let level = levels.get(start).ok_or(SessionError::LevelOutOfRange(start))?;
        level.validate()?;
        let game = Sokoban::new(level);

        Ok(Self {
            levels,
            textures,
            config,
            current: start,
            game,
            handles: SceneHandles::default(),
            completion_due: None,
            finished: false,
        })
    }

    /// Build a renderer for the current game and remember its handles
    pub fn build_renderer(&mut self) -> Result<Renderer, RenderError> {
        let (width, height) = self.config.surface;
        let (renderer, handles) = SceneBuilder::for_game(
            &self.game,
            width,
            height,
            self.config.background,
            &self.textures,
        )
        .build()?;
        self.handles = handles;
        Ok(renderer)
    }

    /// Ask the game to move the player and mirror the result into `renderer`
    pub fn apply_move(
        &mut self,
        direction: Direction,
        renderer: &mut Renderer,
        now: Instant,
    ) -> MoveOutcome {
        let offset = direction.offset();
        if !self.game.update_player_position(offset) {
            log::error!(
                "unable to update player position with offset [{}, {}]",
                offset[0],
                offset[1]
            );
            return MoveOutcome::Rejected;
        }

        self.handles.sync(renderer, &self.game);

        if self.game.is_complete() && self.completion_due.is_none() {
            self.completion_due = Some(now + self.config.completion_delay);
            MoveOutcome::Completed
        } else {
            MoveOutcome::Moved
        }
    }

    /// When the pending completion is due, stop the loop and return the message
    pub fn poll_completion(&mut self, now: Instant, frames: &LoopHandle) -> Option<&'static str> {
        let due = self.completion_due?;
        if now < due {
            return None;
        }

        self.completion_due = None;
        self.finished = true;
        frames.stop();
        log::info!("{} ({} moves)", FINISHED_MESSAGE, self.game.move_count());
        Some(FINISHED_MESSAGE)
    }

    /// Instant at which a pending completion fires
    pub fn completion_deadline(&self) -> Option<Instant> {
        self.completion_due
    }

    /// Switch to level `index`, rebuilding the static layer
    pub fn select_level(&mut self, index: usize, frames: &mut FrameLoop) -> Result<(), SessionError> {
        let level = self
            .levels
            .get(index)
            .ok_or(SessionError::LevelOutOfRange(index))?;
        if let Err(e) = level.validate() {
            log::error!("{}", e);
            return Err(e.into());
        }
        let previous = std::mem::replace(&mut self.game, Sokoban::new(level));

        match self.build_renderer() {
            Ok(renderer) => {
                frames.replace_renderer(renderer);
                self.current = index;
                self.completion_due = None;
                self.finished = false;
                log::info!("Level {} selected", self.game.name());
                Ok(())
            }
            Err(e) => {
                self.game = previous;
                log::error!("{}", e);
                Err(e.into())
            }
        }
    }

    /// Start the current level over
    pub fn restart(&mut self, frames: &mut FrameLoop) -> Result<(), SessionError> {
        self.select_level(self.current, frames)
    }

    /// Move counter followed by the board, one row per line
    pub fn debug_text(&self) -> String {
        format!(
            "move count: {}\n\n{}",
            self.game.move_count(),
            board_to_text(self.game.board())
        )
    }

    pub fn game(&self) -> &Sokoban {
        &self.game
    }

    pub fn level_names(&self) -> Vec<String> {
        self.levels.iter().map(|level| level.name.clone()).collect()
    }

    pub fn current_level(&self) -> usize {
        self.current
    }

    pub fn handles(&self) -> &SceneHandles {
        &self.handles
    }

    /// Whether the completion notification has fired
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
