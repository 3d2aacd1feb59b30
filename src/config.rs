use std::{env, fs::File, str::FromStr};

use anyhow::{anyhow, Context, Result};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::Coords;

pub const SCREEN_WIDTH: i32 = 640;
pub const SCREEN_HEIGHT: i32 = 480;
pub const GRID_SIZE: i32 = 20;
pub const GRID_WIDTH: i32 = SCREEN_WIDTH / GRID_SIZE;
pub const GRID_HEIGHT: i32 = SCREEN_HEIGHT / GRID_SIZE;

/// Ticks per second.
pub const SPEED: u32 = 20;

pub const SCREEN_CENTER: Coords = (SCREEN_WIDTH / 2, SCREEN_HEIGHT / 2);

const LOG_LEVEL_VAR: &str = "SNAKE_LOG";
const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "snake.log";

pub struct LogSettings {
    pub level: LevelFilter,
    pub file: String,
}

impl LogSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_values(env::var(LOG_LEVEL_VAR).ok(), env::var(LOG_FILE_VAR).ok())
    }

    fn from_values(level: Option<String>, file: Option<String>) -> Result<Self> {
        let level = match level {
            Some(name) => LevelFilter::from_str(name.trim())
                .map_err(|_| anyhow!("invalid {} value: {:?}", LOG_LEVEL_VAR, name))?,
            None => LevelFilter::Info,
        };
        let file = file
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        Ok(LogSettings { level, file })
    }

    /// Installs a file logger; stdout is owned by the game screen.
    pub fn init(&self) -> Result<()> {
        let file = File::create(&self.file)
            .with_context(|| format!("failed to create log file {}", self.file))?;

        WriteLogger::init(self.level, Config::default(), file)
            .map_err(|e| anyhow!("failed to initialize logger: {}", e))?;

        info!(
            "Board {}x{} px, {}x{} cells, {} ticks/s",
            SCREEN_WIDTH, SCREEN_HEIGHT, GRID_WIDTH, GRID_HEIGHT, SPEED
        );
        Ok(())
    }
}
