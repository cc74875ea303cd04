use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::game::MazeStartup;

/// Where the maze configuration is read from at startup.
pub const MAZE_CONFIG_PATH: &str = "assets/maze_config.ron";

/// Level layout and tile-set parameters, loaded once at startup.
///
/// `width`/`height` are in tile units; the maze generator divides them by
/// three, so 60×60 yields a 20×20 cell maze rendered as 61×61 tiles.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// Fixed seed for a reproducible maze; a fresh one is drawn when absent.
    pub seed: Option<u64>,
    /// Tile set used for this level.
    pub tile_set: String,
    /// Tile sets the factory has sprites for.
    pub tile_sets: Vec<String>,
    /// Glyphs whose tiles block movement.
    pub collider_glyphs: String,
    /// Glyph placed on the maze entry points.
    pub entry_glyph: char,
    /// Glyph for the blocking rim around the maze.
    pub rim_glyph: char,
    /// Layer walkers move on.
    pub walker_layer: i32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 60,
            seed: None,
            tile_set: "Hideout".to_string(),
            tile_sets: vec!["Hideout".to_string()],
            collider_glyphs: "+|- ".to_string(),
            entry_glyph: '$',
            rim_glyph: ' ',
            walker_layer: -1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read maze config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse maze config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl MazeConfig {
    pub fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}

pub struct MazeConfigPlugin;

impl Plugin for MazeConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_maze_config.in_set(MazeStartup::Config));
    }
}

/// Load the maze configuration synchronously, falling back to defaults.
/// A configuration inserted before startup is kept as is.
pub fn load_maze_config(mut commands: Commands, existing: Option<Res<MazeConfig>>) {
    if existing.is_some() {
        info!("Using preset maze config");
        return;
    }

    match MazeConfig::load(MAZE_CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded maze config from {}", MAZE_CONFIG_PATH);
            commands.insert_resource(config);
        }
        Err(e) => {
            error!("{}", e);
            error!("Using default MazeConfig");
            commands.insert_resource(MazeConfig::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config = MazeConfig::from_ron_str("(width: 30, seed: Some(7), collider_glyphs: \"+|-\")").unwrap();
        assert_eq!(config.width, 30);
        assert_eq!(config.height, 60);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.collider_glyphs, "+|-");
        assert_eq!(config.entry_glyph, '$');
    }

    #[test]
    fn malformed_config_is_a_parse_error() {
        let err = MazeConfig::from_ron_str("(width: \"wide\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = MazeConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
