//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use meshgrad::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("MG_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("MG_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_env_overrides_gradient_props() {
    std::env::set_var("MG_GRADIENT__SPEED", "0.05");
    std::env::set_var("MG_GRADIENT__WIREFRAME", "true");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("MG_GRADIENT__SPEED");
    std::env::remove_var("MG_GRADIENT__WIREFRAME");

    assert_eq!(config.gradient.speed, 0.05);
    assert!(config.gradient.wireframe);
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("MG_WINDOW__TITLE");

    let config = AppConfig::load_from("config").unwrap();
    assert_eq!(config.demo.palettes.len(), 2);
    assert_eq!(config.demo.palettes[1].len(), 5);
    assert_eq!(config.gradient.background_opacity, 0.8);
    assert_eq!(config.input.double_click_ms, 300);
    assert_eq!(config.rendering.segments, 500);
}

#[test]
#[serial]
fn test_missing_dir_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.gradient.speed, 0.01);
    assert_eq!(config.initial_props().colors, config.demo.palettes[0]);
}
