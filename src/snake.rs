use crate::grid::Cell;
use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Up | Down => Axis::Vertical,
            Left | Right => Axis::Horizontal,
        }
    }

    pub fn vector(self, cell_size: i32) -> (i32, i32) {
        match self {
            Up => (0, -cell_size),
            Down => (0, cell_size),
            Left => (-cell_size, 0),
            Right => (cell_size, 0),
        }
    }
}

/// Accepts `requested` only when it moves along the other axis; reversals and
/// repeats leave `current` as it is.
pub fn turn(current: Direction, requested: Direction) -> Direction {
    if requested.axis() != current.axis() {
        requested
    } else {
        current
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Step {
    /// The cell vacated by the tail, `None` when the snake grew.
    pub dropped_tail: Option<Cell>,
}

impl Step {
    pub fn grew(&self) -> bool {
        self.dropped_tail.is_none()
    }
}

/// Occupied cells with the head at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: Vec<Cell>,
    direction: Direction,
    last_moved: Direction,
    cell_size: i32,
}

impl Snake {
    pub fn new(head: Cell, direction: Direction, cell_size: i32) -> Self {
        Snake { body: vec![head], direction, last_moved: direction, cell_size }
    }

    pub fn body(&self) -> &[Cell] {
        &self.body
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Applies the turn rule against the direction of the last completed
    /// step, so several requests between two steps can never fold the head
    /// back onto the neck. A rejected request keeps any turn already queued.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if turn(self.last_moved, requested) == self.last_moved {
            return false;
        }
        let changed = requested != self.direction;
        self.direction = requested;
        changed
    }

    pub fn advance(&mut self, food: Cell) -> Step {
        let new_head = self.head() + self.direction.vector(self.cell_size);
        self.body.insert(0, new_head);
        self.last_moved = self.direction;

        let dropped_tail = if new_head == food { None } else { self.body.pop() };
        Step { dropped_tail }
    }
}
