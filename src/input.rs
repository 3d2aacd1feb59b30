use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use crate::snake::{Direction::{self, *}, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    Continue,
    TogglePause,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Steer(Direction),
    Pause,
    Quit,
}

#[derive(Default)]
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        InputHandler
    }

    /// Applies one tick's worth of key presses to the snake. A quit key
    /// wins over anything queued after it.
    pub fn handle_keys(&self, keys: &[KeyEvent], snake: &mut Snake) -> Signal {
        let mut toggle_pause = false;

        for key in keys {
            match command_for(key) {
                Some(Command::Quit) => return Signal::Quit,
                Some(Command::Pause) => toggle_pause = !toggle_pause,
                Some(Command::Steer(dir)) => {
                    if snake.request_direction(dir) {
                        debug!("Queued turn {:?}", dir);
                    } else {
                        debug!("Ignored reversal {:?} while heading {:?}", dir, snake.direction());
                    }
                }
                None => {}
            }
        }

        if toggle_pause { Signal::TogglePause } else { Signal::Continue }
    }
}

fn command_for(key: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(key) {
        return Some(Command::Quit);
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Steer(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Steer(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Steer(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Steer(Right)),
        KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Esc => Some(Command::Pause),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
