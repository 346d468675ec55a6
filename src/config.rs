//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`GS_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use gridscene_math::Vec4;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Drawing surface configuration
    #[serde(default)]
    pub renderer: RendererSettings,
    /// Level list
    #[serde(default)]
    pub levels: LevelsConfig,
    /// Texture files
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Gameplay timing
    #[serde(default)]
    pub game: GameConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`GS_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    ///
    /// Missing files are skipped, so an empty directory yields the defaults
    /// plus any `GS_*` overrides.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let figment = ["default.toml", "user.toml"]
            .iter()
            .map(|name| config_dir.join(name))
            .filter(|path| path.exists())
            .fold(Figment::new(), |figment, path| figment.merge(Toml::file(path)))
            // GS_GAME__COMPLETION_DELAY_MS=250 -> game.completion_delay_ms = 250
            .merge(Env::prefixed("GS_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sokoban".to_string(),
            width: 500,
            height: 500,
            vsync: true,
        }
    }
}

/// Drawing surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererSettings {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    /// Background color [r, g, b, a] with 0-255 channels and 0-1 alpha
    pub background_color: [f32; 4],
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
            background_color: [255.0, 255.0, 255.0, 1.0],
        }
    }
}

impl RendererSettings {
    pub fn background(&self) -> Vec4 {
        Vec4::from(self.background_color)
    }
}

/// Level list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelsConfig {
    /// RON level files, in selection order
    pub paths: Vec<String>,
    /// Index of the level shown first
    pub start: usize,
}

impl Default for LevelsConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                "levels/level1.ron".to_string(),
                "levels/level2.ron".to_string(),
            ],
            start: 0,
        }
    }
}

/// Texture files keyed by object kind (`block`, `box`, `player`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetsConfig {
    pub textures: BTreeMap<String, String>,
}

/// Gameplay timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Delay between the winning move and the end-of-game notification
    pub completion_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            completion_delay_ms: 100,
        }
    }
}

impl GameConfig {
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Show the move counter in the window title
    pub show_debug_text: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_debug_text: true,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    source: figment::Error,
}

impl From<figment::Error> for ConfigError {
    fn from(source: figment::Error) -> Self {
        ConfigError { source }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.source)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.renderer.width, 500);
        assert_eq!(config.game.completion_delay(), Duration::from_millis(100));
        assert_eq!(config.levels.paths.len(), 2);
        assert_eq!(config.renderer.background(), Vec4::WHITE);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("completion_delay_ms"));
    }

    #[test]
    fn test_bad_value_reports_key() {
        let dir = std::env::temp_dir().join(format!("gridscene-bad-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("default.toml"), "[game]\ncompletion_delay_ms = \"soon\"\n").unwrap();
        let result = AppConfig::load_from(&dir);
        std::fs::remove_dir_all(&dir).unwrap();

        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("Configuration error:"));
        assert!(message.contains("completion_delay_ms"));
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let config = AppConfig::load_from("/nonexistent/config").unwrap();
        assert_eq!(config.window.title, "Sokoban");
    }
}
