//! Optional settings file for the macroquad backend.
//!
//! Settings load from `maze-walk.toml` next to the executable; a
//! missing file falls back to defaults, a malformed one is an error so
//! typos never silently disappear.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default settings file name looked up in the working directory.
pub const SETTINGS_FILE: &str = "maze-walk.toml";

const DEFAULT_WINDOW_WIDTH: i32 = 960;
const DEFAULT_WINDOW_HEIGHT: i32 = 720;

/// Window and input settings honored by the backend.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Initial window width in pixels.
    pub window_width: i32,
    /// Initial window height in pixels.
    pub window_height: i32,
    /// Overrides the window title provided by the presentation.
    pub window_title: Option<String>,
    /// Scales pointer and touch look offsets before they reach the
    /// simulation.
    pub look_sensitivity: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_title: None,
            look_sensitivity: 1.0,
        }
    }
}

impl BackendConfig {
    /// Loads settings from the given path, falling back to defaults
    /// when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse settings file {}", path.display()))
    }
}
