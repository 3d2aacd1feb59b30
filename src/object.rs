use crate::surface::{Color, Surface};
use crate::Coords;

/// Shared shape of everything that lives on the board.
pub trait GameObject {
    fn position(&self) -> Coords;

    fn body_color(&self) -> Color;

    /// Paints the object. Does nothing unless the object overrides it.
    fn draw(&self, _surface: &mut dyn Surface) {}
}

/// Fills one cell and outlines it in the border color.
pub fn draw_cell(surface: &mut dyn Surface, pos: Coords, color: Color) {
    surface.fill_cell(pos, color);
    surface.outline_cell(pos, Color::BORDER);
}
