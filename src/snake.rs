use std::collections::VecDeque;

use rand::Rng;

use crate::config::{GRID_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::object::{draw_cell, GameObject};
use crate::surface::{Color, Surface};
use crate::Coords;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords, old_tail: Option<Coords> },
    /// The head ran into the body; the snake has already been reset.
    Collided { direction: Direction },
}

pub struct Snake {
    spawn: Coords,
    body_color: Color,
    positions: VecDeque<Coords>,
    length: usize,
    direction: Direction,
    next_direction: Option<Direction>,
    last: Option<Coords>,
}

impl Snake {
    pub fn new(spawn: Coords) -> Self {
        Snake {
            spawn,
            body_color: Color::SNAKE,
            positions: VecDeque::from(vec![spawn]),
            length: 1,
            direction: Right,
            next_direction: None,
            last: None,
        }
    }

    #[cfg(test)]
    pub fn positions(&self) -> &VecDeque<Coords> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[cfg(test)]
    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<Coords> {
        self.last
    }

    pub fn head(&self) -> Coords {
        // positions is never empty: it starts with the spawn cell and reset refills it
        self.positions.front().copied().unwrap_or(self.spawn)
    }

    /// Queues a turn for the next tick. Returns false for a turn straight back
    /// into the neck, which is dropped.
    pub fn request_direction(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }

        self.next_direction = Some(dir);
        true
    }

    pub fn update_direction(&mut self) {
        if let Some(dir) = self.next_direction.take() {
            self.direction = dir;
        }
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn move_step<R: Rng>(&mut self, rng: &mut R) -> MoveResult {
        let (head_x, head_y) = self.head();
        let (dx, dy) = self.direction.delta();

        let new_head = (
            (head_x + dx * GRID_SIZE).rem_euclid(SCREEN_WIDTH),
            (head_y + dy * GRID_SIZE).rem_euclid(SCREEN_HEIGHT),
        );

        // The segment right behind the head can't be hit
        if self.positions.iter().skip(2).any(|pos| *pos == new_head) {
            self.reset(rng);
            return Collided { direction: self.direction };
        }

        self.positions.push_front(new_head);

        self.last = if self.positions.len() > self.length {
            self.positions.pop_back()
        } else {
            None
        };

        Moved { new_head, old_tail: self.last }
    }

    pub fn reset<R: Rng>(&mut self, rng: &mut R) {
        self.length = 1;
        self.positions.clear();
        self.positions.push_back(self.spawn);
        self.direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        self.next_direction = None;
        self.last = None;
    }

    #[cfg(test)]
    pub fn with_body(body: &[Coords], direction: Direction) -> Self {
        let mut snake = Snake::new(body[0]);
        snake.positions = body.iter().copied().collect();
        snake.length = body.len();
        snake.direction = direction;
        snake
    }
}

impl GameObject for Snake {
    fn position(&self) -> Coords {
        self.spawn
    }

    fn body_color(&self) -> Color {
        self.body_color
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let body_end = self.positions.len().saturating_sub(1);
        for pos in self.positions.iter().take(body_end) {
            draw_cell(surface, *pos, self.body_color());
        }

        draw_cell(surface, self.head(), self.body_color());

        if let Some(tail) = self.last {
            surface.fill_cell(tail, Color::BOARD_BACKGROUND);
        }
    }
}
