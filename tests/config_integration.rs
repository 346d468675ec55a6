//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use gridscene::config::AppConfig;
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("GS_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("GS_WINDOW__TITLE");
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_env_override_nested_number() {
    std::env::set_var("GS_GAME__COMPLETION_DELAY_MS", "250");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("GS_GAME__COMPLETION_DELAY_MS");
    assert_eq!(config.game.completion_delay(), Duration::from_millis(250));
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("GS_WINDOW__TITLE");

    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert_eq!(config.levels.paths, ["levels/level1.ron", "levels/level2.ron"]);
    assert!(config.assets.textures.is_empty());
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = std::env::temp_dir().join(format!("gridscene-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("default.toml"), "[window]\ntitle = \"Base\"\nwidth = 500\nheight = 500\nvsync = true\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[window]\ntitle = \"Mine\"\n").unwrap();

    let config = AppConfig::load_from(&dir);
    std::fs::remove_dir_all(&dir).unwrap();

    let config = config.unwrap();
    assert_eq!(config.window.title, "Mine");
    assert_eq!(config.window.width, 500);
}
