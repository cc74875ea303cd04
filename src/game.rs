use bevy::prelude::*;

pub mod config;
pub mod coord;
pub mod maze;
pub mod tiles;
pub mod pathfinding;
pub mod world;

use config::MazeConfigPlugin;
use pathfinding::PathfindingPlugin;
use world::MazeWorldPlugin;

/// Maze generation, tile graph and walker pathfinding.
///
/// Config loading and world setup both run at `Startup`; the world is built
/// after the config so a preset `MazeConfig` resource is honoured.
pub struct MazeGamePlugin;

impl Plugin for MazeGamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((MazeConfigPlugin, MazeWorldPlugin, PathfindingPlugin))
            .configure_sets(Startup, (MazeStartup::Config, MazeStartup::World).chain());
    }
}

/// Startup ordering between config loading and world construction.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MazeStartup {
    Config,
    World,
}
