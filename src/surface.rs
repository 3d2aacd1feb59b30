use anyhow::Result;

use crate::config::GRID_SIZE;
use crate::Coords;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BOARD_BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const BORDER: Color = Color::rgb(93, 216, 228);
    pub const APPLE: Color = Color::rgb(255, 0, 0);
    pub const SNAKE: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Anything the game objects can paint cells onto. Positions are in screen
/// pixels and are snapped down to the cell that contains them.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_cell(&mut self, pos: Coords, color: Color);
    fn outline_cell(&mut self, pos: Coords, color: Color);
    fn present(&mut self) -> Result<()>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub fill: Color,
    pub border: Option<Color>,
}

impl Tile {
    pub const fn blank(color: Color) -> Self {
        Tile { fill: color, border: None }
    }
}

/// A grid of tiles, one per board cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    cols: usize,
    rows: usize,
    tiles: Vec<Tile>,
}

impl Canvas {
    pub fn new(cols: usize, rows: usize, color: Color) -> Self {
        Canvas { cols, rows, tiles: vec![Tile::blank(color); cols * rows] }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Tile by cell index (not pixels).
    pub fn tile(&self, col: usize, row: usize) -> Option<&Tile> {
        if col < self.cols && row < self.rows {
            self.tiles.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Tile under a pixel position.
    #[cfg(test)]
    pub fn tile_at(&self, pos: Coords) -> Option<&Tile> {
        self.index_of(pos).map(|i| &self.tiles[i])
    }

    fn index_of(&self, pos: Coords) -> Option<usize> {
        if pos.0 < 0 || pos.1 < 0 {
            return None;
        }

        let (col, row) = ((pos.0 / GRID_SIZE) as usize, (pos.1 / GRID_SIZE) as usize);
        if col < self.cols && row < self.rows {
            Some(row * self.cols + col)
        } else {
            None
        }
    }
}

impl Surface for Canvas {
    fn clear(&mut self, color: Color) {
        for tile in self.tiles.iter_mut() {
            *tile = Tile::blank(color);
        }
    }

    fn fill_cell(&mut self, pos: Coords, color: Color) {
        if let Some(i) = self.index_of(pos) {
            self.tiles[i] = Tile::blank(color);
        }
    }

    fn outline_cell(&mut self, pos: Coords, color: Color) {
        if let Some(i) = self.index_of(pos) {
            self.tiles[i].border = Some(color);
        }
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}
