mod apple;
mod clock;
mod config;
mod game;
mod input;
mod object;
mod snake;
mod surface;
mod term;

use anyhow::Result;
use log::error;

use crate::clock::Clock;
use crate::config::{LogSettings, SPEED};
use crate::term::{run_session, TermManager};

pub type TermInt = u16;
/// Screen position in pixels, always a multiple of the cell size.
pub type Coords = (i32, i32);

fn main() -> Result<()> {
    LogSettings::from_env()?.init()?;

    let mut term = TermManager::new()?;
    let mut game = game::SnakeGame::new(rand::thread_rng());

    let result = run_session(&mut term, |term| game.play(term, &mut Clock::new(SPEED)));

    if let Err(err) = &result {
        error!("game aborted: {:#}", err);
    }
    result
}
