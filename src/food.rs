use std::collections::HashSet;

use rand::Rng;

use crate::grid::{Board, Cell};

/// Picks a cell not present in `occupied`, drawing column and row
/// independently and uniformly and rejecting occupied draws.
///
/// Returns `None` when every cell of the board is occupied.
pub fn place_food<R: Rng>(board: &Board, occupied: &[Cell], rng: &mut R) -> Option<Cell> {
    let taken: HashSet<Cell> = occupied.iter().copied().filter(|c| board.contains(*c)).collect();
    if taken.len() >= board.cell_count() {
        return None;
    }

    let side = board.cells_per_side();
    loop {
        let candidate = board.cell_at(rng.gen_range(0..side), rng.gen_range(0..side));
        if !taken.contains(&candidate) {
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn never_lands_on_the_snake() {
        let board = Board::new(20, 60).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let occupied: Vec<Cell> = board.cells().filter(|c| *c != Cell::new(40, 20)).collect();

        for _ in 0..50 {
            assert_eq!(place_food(&board, &occupied, &mut rng), Some(Cell::new(40, 20)));
        }
    }

    #[test]
    fn full_board_has_no_food() {
        let board = Board::new(20, 40).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let occupied: Vec<Cell> = board.cells().collect();
        assert_eq!(place_food(&board, &occupied, &mut rng), None);
    }

    #[test]
    fn off_board_segments_do_not_count_as_taken() {
        let board = Board::new(20, 40).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let occupied = [Cell::new(0, 0), Cell::new(20, 0), Cell::new(0, 20), Cell::new(-20, 0)];
        assert_eq!(place_food(&board, &occupied, &mut rng), Some(Cell::new(20, 20)));
    }

    #[test]
    fn roughly_uniform_on_an_empty_board() {
        let board = Board::new(20, 80).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);
        let draws = 16_000;
        let mut counts = vec![0u32; board.cell_count()];

        for _ in 0..draws {
            let cell = place_food(&board, &[], &mut rng).unwrap();
            assert!(board.contains(cell));
            let (col, row) = board.index_of(cell);
            counts[(row * board.cells_per_side() + col) as usize] += 1;
        }

        // 1000 expected per cell
        for count in counts {
            assert!((800..1200).contains(&count), "skewed count {}", count);
        }
    }
}
