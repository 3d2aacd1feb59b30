use anyhow::Result;
use log::{debug, info};
use rand::Rng;

use crate::apple::Apple;
use crate::clock::Clock;
use crate::config::SCREEN_CENTER;
use crate::input::{InputHandler, Signal};
use crate::object::GameObject;
use crate::snake::{MoveResult::{self, *}, Snake};
use crate::surface::{Color, Surface};
use crate::term::TermManager;

pub struct SnakeGame<R: Rng> {
    snake: Snake,
    apple: Apple,
    input: InputHandler,
    paused: bool,
    rng: R,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(mut rng: R) -> Self {
        let apple = Apple::new(&mut rng);
        SnakeGame { snake: Snake::new(SCREEN_CENTER), apple, input: InputHandler::new(), paused: false, rng }
    }

    #[cfg(test)]
    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    #[cfg(test)]
    pub fn apple(&self) -> &Apple {
        &self.apple
    }

    /// Runs until the player quits.
    pub fn play(&mut self, term: &mut TermManager, clock: &mut Clock) -> Result<()> {
        info!("Game started, apple at {:?}", self.apple.position());

        loop {
            clock.tick();

            let keys = term.read_key_events_queue()?;
            match self.input.handle_keys(&keys, &mut self.snake) {
                Signal::Quit => {
                    info!("Quit requested at length {}", self.snake.len());
                    return Ok(());
                }
                Signal::TogglePause => self.toggle_pause(term)?,
                Signal::Continue => {}
            }

            if self.paused { continue; }

            if let Moved { new_head, old_tail } = self.step() {
                debug!("Head at {:?}, dropped {:?}", new_head, old_tail);
            }
            self.draw(term);
            term.present()?;
        }
    }

    /// One game update: turn, move, eat.
    pub fn step(&mut self) -> MoveResult {
        self.snake.update_direction();
        let move_res = self.snake.move_step(&mut self.rng);

        if let Collided { direction } = &move_res {
            info!("Snake bit itself, respawning heading {:?}", direction);
        }

        if self.snake.head() == self.apple.position() {
            self.snake.grow();
            self.apple.randomize_position(&mut self.rng);
            info!("Apple eaten, length now {}, next apple at {:?}", self.snake.len(), self.apple.position());
        }

        move_res
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear(Color::BOARD_BACKGROUND);
        self.snake.draw(surface);
        self.apple.draw(surface);
    }

    fn toggle_pause(&mut self, term: &mut TermManager) -> Result<()> {
        if !self.paused {
            term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            term.hide_message()?;
        }

        self.paused = !self.paused;
        info!("{}", if self.paused { "Paused" } else { "Resumed" });
        Ok(())
    }
}
