//! Player-adjustable game settings.
use std::time::Duration;

use crate::error::ConfigError;
use crate::grid::Board;

pub const DEFAULT_SNAKE_COLOR: &str = "#4caf50";
pub const DEFAULT_GAME_SPEED: Duration = Duration::from_millis(100);
pub const DEFAULT_BOARD_SIZE: i32 = 400;
pub const DEFAULT_CELL_SIZE: i32 = 20;

/// Options read at every start. Edits made between games only take effect
/// on the next start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Display-only, passed through to the renderer.
    pub snake_color: String,
    /// Interval between ticks.
    pub game_speed: Duration,
    /// Pixels per board side.
    pub board_size: i32,
    /// Pixels per cell side.
    pub cell_size: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            snake_color: DEFAULT_SNAKE_COLOR.to_string(),
            game_speed: DEFAULT_GAME_SPEED,
            board_size: DEFAULT_BOARD_SIZE,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl Settings {
    pub fn board(&self) -> Result<Board, ConfigError> {
        if self.game_speed.is_zero() {
            return Err(ConfigError::ZeroSpeed);
        }
        Board::new(self.cell_size, self.board_size)
    }
}
