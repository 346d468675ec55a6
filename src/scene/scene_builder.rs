//! SceneBuilder - Declarative scene construction
//!
//! Provides a fluent API for turning a game board into drawable objects.
//! Blocks and targets never move, so they go into the renderer's cached
//! static layer. The player, the boxes and each box's outline twin are
//! redrawn every frame.

use gridscene_game::GameState;
use gridscene_math::{Vec2, Vec3, Vec4};
use gridscene_render::{
    unit_square, DrawMode, DrawableObject, RenderError, Renderer, RendererConfig,
};

use crate::assets::TextureSet;

pub const PLAYER_COLOR: Vec4 = Vec4::rgba(100.0, 100.0, 255.0, 1.0);
pub const BLOCK_COLOR: Vec4 = Vec4::rgba(125.0, 125.0, 125.0, 1.0);
pub const TARGET_COLOR: Vec4 = Vec4::rgba(250.0, 250.0, 200.0, 1.0);
pub const BOX_COLOR: Vec4 = Vec4::rgba(200.0, 150.0, 0.0, 1.0);
pub const BOX_LINE_COLOR: Vec4 = Vec4::BLACK;

/// Stroked cross drawn over each box
pub fn box_line_shape() -> Vec<Vec3> {
    vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(1.0, 0.0, 0.0),
    ]
}

/// Ids of the objects that follow the game state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneHandles {
    player: Option<String>,
    /// (box id, outline twin id), in board scan order
    boxes: Vec<(String, String)>,
}

impl SceneHandles {
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn boxes(&self) -> &[(String, String)] {
        &self.boxes
    }

    /// Copy player and box positions from `game` into the renderer
    ///
    /// Returns the number of objects updated.
    pub fn sync(&self, renderer: &mut Renderer, game: &dyn GameState) -> usize {
        let mut updated = 0;

        if let Some(id) = &self.player {
            if let Some(mut player) = renderer.object_mut(id) {
                player.set_position(game.player_position());
                updated += 1;
            }
        }

        let positions = game.object_positions().boxes;
        if positions.len() != self.boxes.len() {
            log::warn!(
                "Game reports {} boxes, scene has {}",
                positions.len(),
                self.boxes.len()
            );
        }
        for ((box_id, line_id), position) in self.boxes.iter().zip(positions) {
            for id in [box_id, line_id] {
                if let Some(mut object) = renderer.object_mut(id) {
                    object.set_position(position);
                    updated += 1;
                }
            }
        }

        updated
    }
}

/// Builder for grid scenes
///
/// # Example
/// ```ignore
/// let (renderer, handles) = SceneBuilder::new(config)
///     .with_textures(&textures)
///     .add_blocks(&positions.blocks)
///     .add_targets(&positions.targets)
///     .add_player(game.player_position())
///     .add_boxes(&positions.boxes)
///     .build()?;
/// ```
pub struct SceneBuilder {
    config: RendererConfig,
    textures: TextureSet,
    statics: Vec<DrawableObject>,
    dynamics: Vec<DrawableObject>,
    handles: SceneHandles,
}

impl SceneBuilder {
    /// Create a new scene builder
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            textures: TextureSet::new(),
            statics: Vec::new(),
            dynamics: Vec::new(),
            handles: SceneHandles::default(),
        }
    }

    /// Builder sized for `game`'s board and filled with all its objects
    pub fn for_game(
        game: &dyn GameState,
        width: u32,
        height: u32,
        background: Vec4,
        textures: &TextureSet,
    ) -> Self {
        let board = game.board();
        let rows = board.len();
        let columns = board.first().map_or(0, Vec::len);
        let positions = game.object_positions();

        Self::new(RendererConfig::for_board(width, height, rows, columns, background))
            .with_textures(textures)
            .add_blocks(&positions.blocks)
            .add_targets(&positions.targets)
            .add_player(game.player_position())
            .add_boxes(&positions.boxes)
    }

    /// Use `textures` for the objects added after this call
    pub fn with_textures(mut self, textures: &TextureSet) -> Self {
        self.textures = textures.clone();
        self
    }

    /// Add the player as a per-frame object
    pub fn add_player(mut self, position: Vec2) -> Self {
        let player = DrawableObject::new("player", position, unit_square(), PLAYER_COLOR)
            .with_texture(self.textures.get("player"));
        self.handles.player = Some(player.id.clone());
        self.dynamics.push(player);
        self
    }

    /// Add blocks to the static layer
    pub fn add_blocks(mut self, positions: &[Vec2]) -> Self {
        let texture = self.textures.get("block");
        for (i, position) in positions.iter().enumerate() {
            self.statics.push(
                DrawableObject::new(format!("block-{}", i), *position, unit_square(), BLOCK_COLOR)
                    .with_texture(texture.clone()),
            );
        }
        self
    }

    /// Add targets to the static layer
    pub fn add_targets(mut self, positions: &[Vec2]) -> Self {
        for (i, position) in positions.iter().enumerate() {
            self.statics.push(DrawableObject::new(
                format!("target-{}", i),
                *position,
                unit_square(),
                TARGET_COLOR,
            ));
        }
        self
    }

    /// Add boxes and their outline twins as per-frame objects
    ///
    /// All boxes are drawn before any outline.
    pub fn add_boxes(mut self, positions: &[Vec2]) -> Self {
        let texture = self.textures.get("box");
        let mut lines = Vec::with_capacity(positions.len());

        for (i, position) in positions.iter().enumerate() {
            let body = DrawableObject::new(format!("box-{}", i), *position, unit_square(), BOX_COLOR)
                .with_texture(texture.clone());
            let mut line = body
                .with_id(format!("box-line-{}", i))
                .with_mode(DrawMode::Stroked)
                .with_texture(None);
            line.shape = box_line_shape();
            line.color = BOX_LINE_COLOR;

            self.handles.boxes.push((body.id.clone(), line.id.clone()));
            self.dynamics.push(body);
            lines.push(line);
        }

        self.dynamics.extend(lines);
        self
    }

    /// Build the renderer and the handles needed to keep it in sync
    pub fn build(self) -> Result<(Renderer, SceneHandles), RenderError> {
        let mut renderer = Renderer::new(self.config, self.statics)?;
        for object in self.dynamics {
            renderer.add(object)?;
        }

        log::info!(
            "Scene built: {} static, {} dynamic objects",
            renderer.static_len(),
            renderer.len()
        );

        Ok((renderer, self.handles))
    }
}
