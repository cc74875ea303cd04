//! Perfect-maze generation by randomized depth-first carving.
//!
//! The generator works on a coarse cell grid (one third of the requested
//! size per axis) and renders it into [`MazeText`], where every cell becomes
//! a 3×3 block of glyphs. Tile space is therefore roughly three times maze
//! space; callers map between the two through the text, never directly.

mod text;


pub use text::{MazeText, GLYPH_CORNER, GLYPH_FLOOR, GLYPH_LEFT_WALL, GLYPH_TOP_WALL};

use bevy::prelude::*;
use labyrinth_macros::profile;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Requested dimensions below this are raised to it.
pub const MIN_MAZE_SIZE: usize = 4;

/// Requested size units per logical cell.
pub const CELL_SCALE: usize = 3;

/// Wall and visit flags for one logical cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellWalls(u8);

impl CellWalls {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const BOTTOM: Self = Self(4);
    pub const LEFT: Self = Self(8);
    pub const VISITED: Self = Self(128);
    pub const INITIAL: Self = Self(1 | 2 | 4 | 8);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, flag: CellWalls) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub fn remove(&mut self, flag: CellWalls) {
        self.0 &= !flag.0;
    }

    /// Matching wall on the neighbour across this one (Top↔Bottom, Left↔Right).
    pub const fn opposite(self) -> Self {
        Self(((self.0 >> 2) | (self.0 << 2)) & Self::INITIAL.0)
    }

    /// Wall bits only, without the visited flag.
    pub const fn walls(self) -> Self {
        Self(self.0 & Self::INITIAL.0)
    }
}

impl BitOr for CellWalls {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for CellWalls {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for CellWalls {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// A wall shared by `cell` and `neighbor`, seen from `cell`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RemoveWall {
    neighbor: (usize, usize),
    wall: CellWalls,
}

/// One level of the depth-first walk: a cell and its remaining shuffled exits.
struct Frame {
    cell: (usize, usize),
    exits: Vec<RemoveWall>,
    next: usize,
}

/// Wall state of a finished maze, `width × height` logical cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallGrid {
    width: usize,
    height: usize,
    cells: Vec<CellWalls>,
    start: (usize, usize),
}

impl WallGrid {
    /// Carve a perfect maze for a `width × height` request.
    ///
    /// Dimensions are clamped to [`MIN_MAZE_SIZE`] and divided by
    /// [`CELL_SCALE`]. The same seed always yields the same maze.
    #[profile(1)]
    pub fn generate(width: usize, height: usize, seed: u64) -> Self {
        let width = width.max(MIN_MAZE_SIZE) / CELL_SCALE;
        let height = height.max(MIN_MAZE_SIZE) / CELL_SCALE;

        let mut rng = StdRng::seed_from_u64(seed);
        let start = (rng.random_range(0..width), rng.random_range(0..height));

        let mut grid = Self {
            width,
            height,
            cells: vec![CellWalls::INITIAL; width * height],
            start,
        };
        grid.carve_from(start, &mut rng);

        debug!(
            "Carved {}x{} maze from {:?} (seed {}, {} openings)",
            width,
            height,
            start,
            seed,
            grid.openings()
        );
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell the carving started from.
    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn cell(&self, x: usize, y: usize) -> CellWalls {
        self.cells[self.index(x, y)]
    }

    /// Number of wall pairs removed during carving.
    pub fn openings(&self) -> usize {
        let mut count = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = self.cell(x, y);
                if x + 1 < self.width && !cell.contains(CellWalls::RIGHT) {
                    count += 1;
                }
                if y + 1 < self.height && !cell.contains(CellWalls::BOTTOM) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Cells reachable from `(x, y)` through open walls.
    pub fn open_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cell = self.cell(x, y);
        self.exits((x, y))
            .into_iter()
            .filter(move |exit| !cell.contains(exit.wall))
            .map(|exit| exit.neighbor)
    }

    /// Render into the glyph representation consumed by tile construction.
    pub fn render(&self) -> MazeText {
        MazeText::from_walls(self)
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// In-bounds neighbours in Left, Top, Right, Bottom order.
    fn exits(&self, (x, y): (usize, usize)) -> Vec<RemoveWall> {
        let mut exits = Vec::with_capacity(4);
        if x > 0 {
            exits.push(RemoveWall { neighbor: (x - 1, y), wall: CellWalls::LEFT });
        }
        if y > 0 {
            exits.push(RemoveWall { neighbor: (x, y - 1), wall: CellWalls::TOP });
        }
        if x + 1 < self.width {
            exits.push(RemoveWall { neighbor: (x + 1, y), wall: CellWalls::RIGHT });
        }
        if y + 1 < self.height {
            exits.push(RemoveWall { neighbor: (x, y + 1), wall: CellWalls::BOTTOM });
        }
        exits
    }

    fn enter(&mut self, cell: (usize, usize), rng: &mut StdRng) -> Frame {
        let idx = self.index(cell.0, cell.1);
        self.cells[idx] |= CellWalls::VISITED;
        let mut exits = self.exits(cell);
        exits.shuffle(rng);
        Frame { cell, exits, next: 0 }
    }

    /// Depth-first carving with an explicit stack, so depth is bounded by
    /// the heap rather than the call stack.
    fn carve_from(&mut self, start: (usize, usize), rng: &mut StdRng) {
        let first = self.enter(start, rng);
        let mut stack = vec![first];

        while let Some(frame) = stack.last_mut() {
            let Some(exit) = frame.exits.get(frame.next).copied() else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let from = frame.cell;

            let (nx, ny) = exit.neighbor;
            if self.cell(nx, ny).contains(CellWalls::VISITED) {
                continue;
            }

            let from_idx = self.index(from.0, from.1);
            let to_idx = self.index(nx, ny);
            self.cells[from_idx].remove(exit.wall);
            self.cells[to_idx].remove(exit.wall.opposite());

            let next = self.enter(exit.neighbor, rng);
            stack.push(next);
        }
    }
}
