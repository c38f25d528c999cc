use crate::grid::{Board, Cell};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfIntersection,
}

/// Reports the first collision of the head (index 0) with the board edge or
/// with the rest of the body.
pub fn check(snake: &[Cell], board: &Board) -> Option<Collision> {
    let (head, tail) = snake.split_first()?;

    if !board.in_bounds(*head) {
        return Some(Collision::Wall);
    }
    if tail.contains(head) {
        return Some(Collision::SelfIntersection);
    }

    None
}

pub fn detect_collision(snake: &[Cell], board: &Board) -> bool {
    check(snake, board).is_some()
}
