use bevy::prelude::*;
use labyrinth_macros::profile;
use crate::game::coord::Coord;
use crate::game::world::{MazeWorld, TILE_LAYER};
use super::types::{GridPosition, PathRequest, WalkPath, Walker};

/// Solve pending path requests against the maze, one at a time.
///
/// A walker that is still following a path ignores new requests. A request
/// with no valid path leaves the walker and the world's last path as they were.
#[profile(5)]
pub(super) fn process_path_requests(
    mut path_requests: MessageReader<PathRequest>,
    mut commands: Commands,
    mut maze: ResMut<MazeWorld>,
    walkers: Query<(&GridPosition, &Walker, Option<&WalkPath>)>,
) {
    if path_requests.is_empty() {
        return;
    }

    let request_count = path_requests.len();
    if request_count > 10 {
        warn!("[PATHFINDING] High path request count: {} pending requests!", request_count);
    }

    for request in path_requests.read() {
        let Ok((position, walker, walking)) = walkers.get(request.entity) else {
            warn!("[PATHFINDING] Path request for {:?}, which is not a walker", request.entity);
            continue;
        };
        if walking.is_some_and(|p| !p.0.is_empty()) {
            debug!("[PATHFINDING] {:?} is still walking, request ignored", request.entity);
            continue;
        }

        let start = position.0.with_layer(TILE_LAYER);
        let target = Coord::from_world(request.goal);
        if maze.pathfind(start, target) {
            commands.entity(request.entity).insert(WalkPath(maze.walk_path(walker.layer)));
        }
    }
}
