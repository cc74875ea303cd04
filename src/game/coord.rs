use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement cost of one orthogonal step.
pub const ORTHOGONAL_COST: u32 = 10;

/// Movement cost of one diagonal step (10·√2 rounded down).
pub const DIAGONAL_COST: u32 = 14;

/// Integer grid position, also used as the tile graph key.
///
/// `layer` tags logically stacked grids (the walker moves on its own layer
/// above the tiles). It takes part in equality and hashing but never in
/// distance or adjacency math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
    pub layer: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y, layer: 0 }
    }

    /// Round a world position to the nearest whole cell on layer 0.
    pub fn from_world(pos: Vec2) -> Self {
        Self::new(pos.x.round() as i32, pos.y.round() as i32)
    }

    pub fn to_world(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Same cell on another layer.
    pub const fn with_layer(self, layer: i32) -> Self {
        Self { layer, ..self }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, layer: self.layer }
    }

    /// True when `other` is one of the eight surrounding cells.
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
    }

    pub fn is_diagonal_to(self, other: Coord) -> bool {
        self.x != other.x && self.y != other.y
    }

    /// Octile distance in fixed-point units: `14 * min + 10 * (max - min)`.
    pub fn octile_distance(self, other: Coord) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let (dmin, dmax) = if dx < dy { (dx, dy) } else { (dy, dx) };
        DIAGONAL_COST * dmin + ORTHOGONAL_COST * (dmax - dmin)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octile_cost_matches_fixed_point_table() {
        let origin = Coord::new(0, 0);
        assert_eq!(origin.octile_distance(Coord::new(3, 0)), 30);
        assert_eq!(origin.octile_distance(Coord::new(3, 3)), 42);
        assert_eq!(origin.octile_distance(Coord::new(3, 1)), 34);
        assert_eq!(origin.octile_distance(Coord::new(-1, 3)), 34);
        assert_eq!(origin.octile_distance(origin), 0);
    }

    #[test]
    fn layer_is_ignored_by_distance_but_not_equality() {
        let a = Coord::new(2, 5);
        let b = a.with_layer(-1);
        assert_ne!(a, b);
        assert_eq!(a.octile_distance(b), 0);
        assert_eq!(b.offset(1, 0).layer, -1);
    }

    #[test]
    fn world_positions_round_to_whole_cells() {
        assert_eq!(Coord::from_world(Vec2::new(2.4, 3.6)), Coord::new(2, 4));
        assert_eq!(Coord::from_world(Vec2::new(-0.6, 0.5)), Coord::new(-1, 1));
    }

    #[test]
    fn adjacency_is_moore_neighborhood() {
        let c = Coord::new(5, 5);
        assert!(c.is_adjacent(Coord::new(6, 6)));
        assert!(c.is_adjacent(Coord::new(5, 4)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(7, 5)));
    }
}
