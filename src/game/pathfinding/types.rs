use bevy::prelude::*;
use std::collections::VecDeque;
use thiserror::Error;

use crate::game::coord::Coord;
use crate::game::tiles::Tile;

/// Index of a node in the [`TileGraph`](super::TileGraph) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Persistent graph node: one per placed tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
    pub tile: Tile,
}

impl GraphNode {
    #[inline]
    pub fn position(&self) -> Coord {
        self.tile.position
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.tile.walkable
    }
}

/// Search-local state of one node, as left by the most recent search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeSearchState {
    pub cost_from_start: u32,
    pub estimate_to_target: u32,
    pub parent: Option<NodeId>,
    pub visited: bool,
}

impl NodeSearchState {
    pub fn total_cost(&self) -> u32 {
        self.cost_from_start + self.estimate_to_target
    }
}

/// The target is missing, blocked, or unreachable. Callers cannot tell which.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no walkable path to target")]
pub struct NoPathError;

/// Ask for a walker to be routed to a world position.
#[derive(Event, Message, Debug, Clone)]
pub struct PathRequest {
    pub entity: Entity,
    pub goal: Vec2,
}

/// Cell a walker currently occupies (on the walker's layer).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition(pub Coord);

/// Something that walks the maze on its own layer.
#[derive(Component, Debug, Clone, Copy)]
pub struct Walker {
    pub layer: i32,
}

/// Remaining steps, drained one per movement tick.
#[derive(Component, Debug, Clone, Default)]
pub struct WalkPath(pub VecDeque<Coord>);

/// Movement ticks elapsed.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MoveTick(pub u64);
