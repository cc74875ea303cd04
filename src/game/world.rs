//! The level: a generated maze, its tile graph, and path requests against it.

use bevy::prelude::*;
use labyrinth_macros::profile;
use std::collections::VecDeque;

use crate::game::config::MazeConfig;
use crate::game::coord::Coord;
use crate::game::maze::{MazeText, WallGrid};
use crate::game::pathfinding::{GridPosition, Pathfinder, TileGraph, Walker};
use crate::game::tiles::{Tile, TileFactory};
use crate::game::MazeStartup;

/// Layer the tile graph lives on.
pub const TILE_LAYER: i32 = 0;

/// Owns the level and answers path requests for it.
#[derive(Resource, Debug, Clone)]
pub struct MazeWorld {
    text: MazeText,
    graph: TileGraph,
    pathfinder: Pathfinder,
    entry_points: Vec<Coord>,
    path: Vec<Coord>,
    seed: Option<u64>,
}

impl MazeWorld {
    /// Carve a maze from `config` and place its tiles.
    pub fn generate(config: &MazeConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!(
            "Generating {}x{} maze with seed {} (tile set '{}')",
            config.width, config.height, seed, config.tile_set
        );
        let text = WallGrid::generate(config.width, config.height, seed).render();
        let mut world = Self::from_text(text, config);
        world.seed = Some(seed);
        world
    }

    /// Place tiles for an already rendered maze.
    pub fn from_text(text: MazeText, config: &MazeConfig) -> Self {
        let mut factory = TileFactory::new(config.tile_sets.iter().cloned(), config.collider_glyphs.as_str());
        let entry_points = entry_points(&text);
        let graph = build_tile_graph(&text, &mut factory, &entry_points, config);
        info!(
            "Placed {} tiles ({} walkable) for a {}x{} glyph maze",
            graph.len(),
            graph.walkable_count(),
            text.columns(),
            text.rows()
        );
        Self {
            text,
            graph,
            pathfinder: Pathfinder::new(),
            entry_points,
            path: Vec::new(),
            seed: None,
        }
    }

    /// Try to route from `position` to `target` and keep the route as the
    /// current path. Returns `false` and keeps the previous path otherwise.
    pub fn pathfind(&mut self, position: Coord, target: Coord) -> bool {
        if !self.graph.contains(position) || !self.graph.contains(target) {
            return false;
        }
        match self.pathfinder.find_path(&self.graph, position, target) {
            Ok(path) => {
                self.path = path;
                true
            }
            Err(e) => {
                debug!("Pathfind {} -> {} declined: {}", position, target, e);
                false
            }
        }
    }

    pub fn path(&self) -> &[Coord] {
        &self.path
    }

    /// Tile at the end of the current path.
    pub fn target(&self) -> Option<&Tile> {
        let last = self.path.last()?;
        let id = self.graph.get(*last)?;
        Some(&self.graph.node(id).tile)
    }

    /// Current path as a step queue on the walker's layer.
    pub fn walk_path(&self, layer: i32) -> VecDeque<Coord> {
        self.path.iter().map(|c| c.with_layer(layer)).collect()
    }

    pub fn graph(&self) -> &TileGraph {
        &self.graph
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn text(&self) -> &MazeText {
        &self.text
    }

    pub fn entry_points(&self) -> &[Coord] {
        &self.entry_points
    }

    /// Seed the maze was carved with, if it was generated here.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Openings in the outer wall: two on the first line, two on the last.
pub fn entry_points(text: &MazeText) -> Vec<Coord> {
    let last_column = text.columns() as i32 - 1;
    let last_row = text.rows() as i32 - 1;
    [
        Coord::new(0, 1),
        Coord::new(0, 2),
        Coord::new(last_column, last_row - 1),
        Coord::new(last_column, last_row - 2),
    ]
    .into_iter()
    .filter(|c| c.x >= 0 && c.y >= 0 && text.glyph_at(c.x as usize, c.y as usize).is_some())
    .collect()
}

/// One tile per glyph, entry points swapped for the entry glyph, plus a
/// blocking rim one cell outside the glyph bounds.
#[profile(2)]
pub fn build_tile_graph(
    text: &MazeText,
    factory: &mut TileFactory,
    entry_points: &[Coord],
    config: &MazeConfig,
) -> TileGraph {
    let columns = text.columns() as i32;
    let rows = text.rows() as i32;
    let rim_len = 2 * (columns + 2) + 2 * rows;
    let mut graph = TileGraph::with_capacity(text.glyphs().count() + rim_len.max(0) as usize);
    let tile_set = config.tile_set.as_str();

    for (column, row, glyph) in text.glyphs() {
        let (x, y) = (column as i32, row as i32);
        let glyph = if entry_points.contains(&Coord::new(x, y)) {
            config.entry_glyph
        } else {
            glyph
        };
        graph.insert(factory.get_tile(glyph, tile_set, x, y));
    }

    for x in -1..=columns {
        graph.insert(factory.get_tile(config.rim_glyph, tile_set, x, -1));
        graph.insert(factory.get_tile(config.rim_glyph, tile_set, x, rows));
    }
    for y in 0..rows {
        graph.insert(factory.get_tile(config.rim_glyph, tile_set, -1, y));
        graph.insert(factory.get_tile(config.rim_glyph, tile_set, columns, y));
    }

    graph
}

pub struct MazeWorldPlugin;

impl Plugin for MazeWorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_maze_world.in_set(MazeStartup::World));
    }
}

/// Build the level from the loaded config and put a walker on the first entry.
pub fn setup_maze_world(mut commands: Commands, config: Option<Res<MazeConfig>>) {
    let config = match config {
        Some(config) => (*config).clone(),
        None => {
            warn!("No MazeConfig resource at world setup, using defaults");
            MazeConfig::default()
        }
    };
    let world = MazeWorld::generate(&config);
    if let Some(&entry) = world.entry_points().first() {
        commands.spawn((
            Walker { layer: config.walker_layer },
            GridPosition(entry.with_layer(config.walker_layer)),
        ));
        info!("Walker placed at entry {}", entry);
    }
    commands.insert_resource(world);
}
