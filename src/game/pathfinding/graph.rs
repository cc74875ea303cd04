use bevy::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::game::coord::Coord;
use crate::game::tiles::Tile;
use super::types::{GraphNode, NodeId};

/// Walkable neighbours of a node with their step cost, cheapest first.
pub type Neighbors = SmallVec<[(NodeId, u32); 8]>;

/// Sparse tile graph: an arena of nodes plus a coordinate lookup.
///
/// Built once per level. Searches borrow it immutably and keep their own
/// scratch state, so a failed or finished search can never alter it.
#[derive(Clone, Debug, Default)]
pub struct TileGraph {
    nodes: Vec<GraphNode>,
    lookup: FxHashMap<Coord, NodeId>,
}

impl TileGraph {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            lookup: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Add a tile. A second tile at an occupied position is dropped and the
    /// existing node is returned.
    pub fn insert(&mut self, tile: Tile) -> NodeId {
        if let Some(&existing) = self.lookup.get(&tile.position) {
            warn!("Duplicate tile at {} ignored (glyph {:?})", tile.position, tile.glyph);
            return existing;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.lookup.insert(tile.position, id);
        self.nodes.push(GraphNode { tile });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, coord: Coord) -> Option<NodeId> {
        self.lookup.get(&coord).copied()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.lookup.contains_key(&coord)
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id.index()]
    }

    /// `false` for blocked and for absent coordinates.
    pub fn is_walkable(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(|id| self.node(id).is_walkable())
    }

    pub fn walkable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_walkable()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Moore neighbourhood of `id`, skipping absent and blocked cells,
    /// sorted by movement cost. Ties keep scan order (column-major from the
    /// lower-left).
    pub fn neighbors(&self, id: NodeId) -> Neighbors {
        let center = self.node(id).position();
        let mut out = Neighbors::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let candidate = center.offset(dx, dy);
                let Some(n) = self.get(candidate) else {
                    continue;
                };
                if !self.node(n).is_walkable() {
                    continue;
                }
                out.push((n, center.octile_distance(candidate)));
            }
        }
        out.sort_by_key(|&(_, cost)| cost);
        out
    }
}
