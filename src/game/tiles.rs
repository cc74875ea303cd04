//! Tile placement: turns glyphs into positioned tiles with walkability.
//!
//! Sprites and colliders for a tile set live outside this crate; the factory
//! only needs to know which glyphs block movement.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::coord::Coord;

/// A placed grid cell. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub glyph: char,
    pub position: Coord,
    pub walkable: bool,
}

/// Produces tiles for one maze instantiation, numbering them in creation order.
#[derive(Clone, Debug)]
pub struct TileFactory {
    tile_sets: Vec<String>,
    collider_glyphs: String,
    counter: u32,
}

impl TileFactory {
    pub fn new(tile_sets: impl IntoIterator<Item = String>, collider_glyphs: impl Into<String>) -> Self {
        Self {
            tile_sets: tile_sets.into_iter().collect(),
            collider_glyphs: collider_glyphs.into(),
            counter: 0,
        }
    }

    pub fn is_collider(&self, glyph: char) -> bool {
        self.collider_glyphs.contains(glyph)
    }

    /// Tiles handed out so far.
    pub fn produced(&self) -> u32 {
        self.counter
    }

    /// Place the tile for `glyph` at `(x, y)`.
    ///
    /// An unknown tile set only affects rendering, so the tile is still
    /// produced and the mismatch is logged.
    pub fn get_tile(&mut self, glyph: char, tile_set: &str, x: i32, y: i32) -> Tile {
        if !self.tile_sets.iter().any(|t| t == tile_set) {
            warn!("Unknown tile set '{}' for glyph {:?} at ({}, {})", tile_set, glyph, x, y);
        }
        self.counter += 1;
        Tile {
            id: self.counter,
            glyph,
            position: Coord::new(x, y),
            walkable: !self.is_collider(glyph),
        }
    }
}
