use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSizeNotPositive(i32),

    #[error("board size {board_size} is not divisible by cell size {cell_size}")]
    BoardNotDivisible { board_size: i32, cell_size: i32 },

    #[error("board size {board_size} leaves fewer than 2x2 cells of size {cell_size}")]
    BoardTooSmall { board_size: i32, cell_size: i32 },

    #[error("game speed must be at least 1ms")]
    ZeroSpeed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("colour {0:?} must start with '#'")]
    MissingHash(String),

    #[error("colour {0:?} is not a 6-digit hex value")]
    InvalidHex(String),
}
