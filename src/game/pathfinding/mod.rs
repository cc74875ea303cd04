mod types;
mod graph;
mod astar;
mod systems;
mod navigation;


// ============================================================================
// PUBLIC API
// ============================================================================

pub use types::{PathRequest, GridPosition, Walker, WalkPath, MoveTick, GraphNode, NodeId, NodeSearchState, NoPathError};
pub use graph::{TileGraph, Neighbors};
pub use astar::Pathfinder;
pub use navigation::follow_path;

use bevy::prelude::*;
use crate::game::world::MazeWorld;

pub struct PathfindingPlugin;

impl Plugin for PathfindingPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PathRequest>();
        app.init_resource::<MoveTick>();
        app.add_systems(
            FixedUpdate,
            (systems::process_path_requests, navigation::follow_path)
                .chain()
                .run_if(resource_exists::<MazeWorld>),
        );
    }
}
