use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use labyrinth_macros::profile;
use std::collections::VecDeque;

use crate::game::coord::Coord;
use super::graph::TileGraph;
use super::types::{NoPathError, NodeId, NodeSearchState};

/// Per-search node state, sized to the graph and reused between searches.
#[derive(Clone, Debug, Default)]
struct SearchScratch {
    cost_from_start: Vec<u32>,
    estimate_to_target: Vec<u32>,
    parent: Vec<Option<NodeId>>,
    visited: FixedBitSet,
    /// Nodes whose state must be cleared before the next search.
    touched: Vec<NodeId>,
}

impl SearchScratch {
    fn with_len(len: usize) -> Self {
        Self {
            cost_from_start: vec![0; len],
            estimate_to_target: vec![0; len],
            parent: vec![None; len],
            visited: FixedBitSet::with_capacity(len),
            touched: Vec::new(),
        }
    }

    fn fit(&mut self, len: usize) {
        if self.parent.len() != len {
            *self = Self::with_len(len);
        }
    }

    /// Clear only what the previous search touched.
    fn reset(&mut self) {
        for id in self.touched.drain(..) {
            let i = id.index();
            self.visited.set(i, false);
            self.cost_from_start[i] = 0;
            self.estimate_to_target[i] = 0;
            self.parent[i] = None;
        }
    }

    fn is_visited(&self, id: NodeId) -> bool {
        self.visited.contains(id.index())
    }

    fn mark_visited(&mut self, id: NodeId) {
        if !self.visited.put(id.index()) {
            self.touched.push(id);
        }
    }
}

/// Grid pathfinder with 8-directional movement and corner-cut blocking.
///
/// Expansion order is first-in first-out, not cost-ordered: cost and
/// estimate are recorded on every node but do not steer the search. On
/// mazes with corridors of uniform cost this finds the same routes a
/// cost-ordered A* would, but it is not a shortest-path guarantee in general.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    scratch: SearchScratch,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route from `start` to `target`.
    ///
    /// The result excludes `start` and ends with `target`. An absent or
    /// blocked target is rejected before any search state is touched.
    #[profile(1)]
    pub fn find_path(
        &mut self,
        graph: &TileGraph,
        start: Coord,
        target: Coord,
    ) -> Result<Vec<Coord>, NoPathError> {
        let target_id = match graph.get(target) {
            Some(id) if graph.node(id).is_walkable() => id,
            _ => return Err(NoPathError),
        };
        let start_id = graph.get(start).ok_or(NoPathError)?;

        self.scratch.fit(graph.len());
        self.scratch.reset();

        self.scratch.mark_visited(start_id);
        self.scratch.estimate_to_target[start_id.index()] = start.octile_distance(target);

        let mut frontier = VecDeque::from([start_id]);
        let mut expanded = 0usize;

        while let Some(current) = frontier.pop_front() {
            expanded += 1;
            if current == target_id {
                let path = self.retrace(graph, start_id, current);
                debug!(
                    "Path {} -> {}: {} steps, {} nodes expanded, {} touched",
                    start,
                    target,
                    path.len(),
                    expanded,
                    self.scratch.touched.len()
                );
                return Ok(path);
            }

            let current_pos = graph.node(current).position();
            for (neighbor, step_cost) in graph.neighbors(current) {
                if self.scratch.is_visited(neighbor) {
                    continue;
                }
                if self.cuts_corner(graph, current, neighbor) {
                    continue;
                }

                let n = neighbor.index();
                self.scratch.parent[n] = Some(current);
                self.scratch.cost_from_start[n] = self.scratch.cost_from_start[current.index()] + step_cost;
                self.scratch.estimate_to_target[n] = graph.node(neighbor).position().octile_distance(target);
                self.scratch.mark_visited(neighbor);
                frontier.push_back(neighbor);
            }
            trace!("Expanded {} (frontier {})", current_pos, frontier.len());
        }

        debug!("No path {} -> {} after expanding {} nodes", start, target, expanded);
        Err(NoPathError)
    }

    /// State a node was left in by the latest search.
    pub fn node_state(&self, id: NodeId) -> NodeSearchState {
        let i = id.index();
        if i >= self.scratch.parent.len() {
            return NodeSearchState::default();
        }
        NodeSearchState {
            cost_from_start: self.scratch.cost_from_start[i],
            estimate_to_target: self.scratch.estimate_to_target[i],
            parent: self.scratch.parent[i],
            visited: self.scratch.visited.contains(i),
        }
    }

    /// Nodes the latest search left marked.
    pub fn touched_count(&self) -> usize {
        self.scratch.touched.len()
    }

    /// A diagonal step is illegal when either orthogonal corner it passes
    /// is a blocked tile. Blocked corners are marked visited so the rest of
    /// the search skips them.
    fn cuts_corner(&mut self, graph: &TileGraph, from: NodeId, to: NodeId) -> bool {
        let a = graph.node(from).position();
        let b = graph.node(to).position();
        if !a.is_diagonal_to(b) {
            return false;
        }

        let mut blocked = false;
        for corner in [Coord { x: b.x, y: a.y, ..b }, Coord { x: a.x, y: b.y, ..b }] {
            if let Some(id) = graph.get(corner) {
                if !graph.node(id).is_walkable() {
                    self.scratch.mark_visited(id);
                    blocked = true;
                }
            }
        }
        blocked
    }

    fn retrace(&self, graph: &TileGraph, start: NodeId, end: NodeId) -> Vec<Coord> {
        let mut path = Vec::new();
        let mut current = end;
        while current != start {
            path.push(graph.node(current).position());
            match self.scratch.parent[current.index()] {
                Some(prev) => current = prev,
                None => break,
            }
        }
        path.reverse();
        path
    }
}
