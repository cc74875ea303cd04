use std::fmt;

use super::{CellWalls, WallGrid};

/// Corner post between wall segments.
pub const GLYPH_CORNER: char = '+';
/// Top wall run.
pub const GLYPH_TOP_WALL: char = '|';
/// Left wall marker.
pub const GLYPH_LEFT_WALL: char = '-';
/// Open floor.
pub const GLYPH_FLOOR: char = '@';

/// Line-based glyph rendering of a [`WallGrid`].
///
/// Each cell contributes a three-character top segment (`+||` walled,
/// `+@@` open) and two identical body segments (`-@@` walled on the left,
/// `@@@` open). Rows end with `+` / `-`, and the first row's top segment is
/// repeated as the closing boundary.
///
/// Indexing is `text[column][row]`: the column selects a line and the row a
/// character within it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MazeText {
    lines: Vec<Vec<char>>,
}

impl MazeText {
    pub(super) fn from_walls(grid: &WallGrid) -> Self {
        let mut lines = Vec::with_capacity(grid.height() * 3 + 1);
        let mut first_top: Option<Vec<char>> = None;

        for y in 0..grid.height() {
            let mut top = Vec::with_capacity(grid.width() * 3 + 1);
            let mut body = Vec::with_capacity(grid.width() * 3 + 1);
            for x in 0..grid.width() {
                let cell = grid.cell(x, y);
                if cell.contains(CellWalls::TOP) {
                    top.extend([GLYPH_CORNER, GLYPH_TOP_WALL, GLYPH_TOP_WALL]);
                } else {
                    top.extend([GLYPH_CORNER, GLYPH_FLOOR, GLYPH_FLOOR]);
                }
                if cell.contains(CellWalls::LEFT) {
                    body.extend([GLYPH_LEFT_WALL, GLYPH_FLOOR, GLYPH_FLOOR]);
                } else {
                    body.extend([GLYPH_FLOOR, GLYPH_FLOOR, GLYPH_FLOOR]);
                }
            }
            if first_top.is_none() {
                first_top = Some(top.clone());
            }
            top.push(GLYPH_CORNER);
            body.push(GLYPH_LEFT_WALL);
            lines.push(top);
            lines.push(body.clone());
            lines.push(body);
        }

        let mut closing = first_top.unwrap_or_default();
        closing.push(GLYPH_CORNER);
        lines.push(closing);

        Self { lines }
    }

    /// Build from pre-rendered lines, e.g. a hand-drawn test level.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines.into_iter().map(|l| l.as_ref().chars().collect()).collect(),
        }
    }

    /// Number of lines.
    pub fn columns(&self) -> usize {
        self.lines.len()
    }

    /// Length of the longest line.
    pub fn rows(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn glyph_at(&self, column: usize, row: usize) -> Option<char> {
        self.lines.get(column)?.get(row).copied()
    }

    /// Every `(column, row, glyph)` in line order.
    pub fn glyphs(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.lines
            .iter()
            .enumerate()
            .flat_map(|(column, line)| line.iter().enumerate().map(move |(row, &g)| (column, row, g)))
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|l| l.iter().collect())
    }
}

impl fmt::Display for MazeText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            let s: String = line.iter().collect();
            writeln!(f, "{s}")?;
        }
        Ok(())
    }
}
