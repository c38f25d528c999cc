//! Grid snake: the game-state core (board, snake, food, collisions and the
//! tick-driven session) independent of any drawing surface.

pub mod collision;
pub mod color;
pub mod config;
pub mod error;
pub mod food;
pub mod grid;
pub mod session;
pub mod snake;
pub mod timer;

pub use config::Settings;
pub use error::{ColorError, ConfigError};
pub use grid::{Board, Cell};
pub use session::{Frame, GameOver, Outcome, Presenter, Session, SessionState};
pub use snake::Direction;
