use rand::Rng;

use crate::config::{GRID_HEIGHT, GRID_SIZE, GRID_WIDTH};
use crate::object::{draw_cell, GameObject};
use crate::surface::{Color, Surface};
use crate::Coords;

pub struct Apple {
    position: Coords,
    body_color: Color,
}

impl Apple {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut apple = Apple { position: (0, 0), body_color: Color::APPLE };
        apple.randomize_position(rng);
        apple
    }

    /// Picks any cell on the board, the snake's included.
    pub fn randomize_position<R: Rng>(&mut self, rng: &mut R) {
        self.position = (
            rng.gen_range(0..GRID_WIDTH) * GRID_SIZE,
            rng.gen_range(0..GRID_HEIGHT) * GRID_SIZE,
        );
    }

    #[cfg(test)]
    pub fn place_at(&mut self, pos: Coords) {
        self.position = pos;
    }
}

impl GameObject for Apple {
    fn position(&self) -> Coords {
        self.position
    }

    fn body_color(&self) -> Color {
        self.body_color
    }

    fn draw(&self, surface: &mut dyn Surface) {
        draw_cell(surface, self.position, self.body_color());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::surface::{Canvas, Tile};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_positions_are_grid_aligned_and_on_screen() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut apple = Apple::new(&mut rng);

        for _ in 0..500 {
            apple.randomize_position(&mut rng);
            let (x, y) = apple.position();
            assert!((0..SCREEN_WIDTH).contains(&x), "x out of range: {}", x);
            assert!((0..SCREEN_HEIGHT).contains(&y), "y out of range: {}", y);
            assert_eq!(x % GRID_SIZE, 0);
            assert_eq!(y % GRID_SIZE, 0);
        }
    }

    #[test]
    fn randomizing_reaches_the_far_corners() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut apple = Apple::new(&mut rng);
        let (mut max_x, mut max_y) = (0, 0);

        for _ in 0..5000 {
            apple.randomize_position(&mut rng);
            max_x = max_x.max(apple.position().0);
            max_y = max_y.max(apple.position().1);
        }

        assert_eq!(max_x, SCREEN_WIDTH - GRID_SIZE);
        assert_eq!(max_y, SCREEN_HEIGHT - GRID_SIZE);
    }

    #[test]
    fn draws_red_cell_with_border() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut apple = Apple::new(&mut rng);
        apple.place_at((40, 60));

        let mut canvas = Canvas::new(32, 24, Color::BOARD_BACKGROUND);
        apple.draw(&mut canvas);

        assert_eq!(
            canvas.tile(2, 3),
            Some(&Tile { fill: Color::APPLE, border: Some(Color::BORDER) })
        );
    }
}
