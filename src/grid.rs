use std::ops::Add;

use crate::error::ConfigError;

/// Top-left pixel origin of one grid square.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }
}

impl Add<(i32, i32)> for Cell {
    type Output = Cell;

    fn add(self, (dx, dy): (i32, i32)) -> Cell {
        Cell::new(self.x + dx, self.y + dy)
    }
}

/// Square playing field of `board_size` pixels per side, split into cells of
/// `cell_size` pixels. Only constructible with a size that divides evenly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Board {
    cell_size: i32,
    board_size: i32,
}

impl Board {
    pub fn new(cell_size: i32, board_size: i32) -> Result<Self, ConfigError> {
        if cell_size <= 0 {
            return Err(ConfigError::CellSizeNotPositive(cell_size));
        }
        if board_size % cell_size != 0 {
            return Err(ConfigError::BoardNotDivisible { board_size, cell_size });
        }
        if board_size / cell_size < 2 {
            return Err(ConfigError::BoardTooSmall { board_size, cell_size });
        }

        Ok(Board { cell_size, board_size })
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn board_size(&self) -> i32 {
        self.board_size
    }

    pub fn cells_per_side(&self) -> i32 {
        self.board_size / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        let side = self.cells_per_side() as usize;
        side * side
    }

    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(col * self.cell_size, row * self.cell_size)
    }

    pub fn index_of(&self, cell: Cell) -> (i32, i32) {
        (cell.x / self.cell_size, cell.y / self.cell_size)
    }

    /// Grid-aligned cell closest to the middle of the board, rounding down.
    pub fn center(&self) -> Cell {
        let mid = self.board_size / 2 / self.cell_size;
        self.cell_at(mid, mid)
    }

    /// True when the cell lies inside the board, regardless of alignment.
    pub fn in_bounds(&self, cell: Cell) -> bool {
        (0..self.board_size).contains(&cell.x) && (0..self.board_size).contains(&cell.y)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && cell.x % self.cell_size == 0 && cell.y % self.cell_size == 0
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let side = self.cells_per_side();
        (0..side).flat_map(move |row| (0..side).map(move |col| self.cell_at(col, row)))
    }
}
