//! Solvable random starting positions.
//!
//! A 4x4 arrangement is solvable iff the number of inversions among the
//! numbered tiles plus the 1-indexed row (from the top) of the empty slot is
//! even. See <http://mathworld.wolfram.com/15Puzzle.html>.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::puzzle::{Puzzle, EMPTY, SIZE, TILE_COUNT};

/// Number of pairs `(i, j)`, `i < j`, of numbered tiles with
/// `values[i] > values[j]`. The empty slot takes no part.
pub fn count_inversions(values: &[u8]) -> usize {
    values
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != EMPTY)
        .map(|(i, &val)| {
            values[i + 1..]
                .iter()
                .filter(|&&next| next != EMPTY && next < val)
                .count()
        })
        .sum()
}

/// Parity check deciding whether the ordered board is reachable from `values`.
pub fn is_solvable(values: &[u8; TILE_COUNT]) -> bool {
    let Some(empty_index) = values.iter().position(|&v| v == EMPTY) else {
        return false;
    };
    let empty_row = empty_index / SIZE + 1;

    (count_inversions(values) + empty_row) % 2 == 0
}

/// Unbiased random permutation of `1..=16` that passes [`is_solvable`].
pub fn solvable_values<R: Rng + ?Sized>(rng: &mut R) -> [u8; TILE_COUNT] {
    let mut values = Puzzle::solved().values();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        values.shuffle(rng);

        if is_solvable(&values) {
            debug!(attempts, "generated solvable permutation");
            return values;
        }
    }
}

/// A freshly shuffled, solvable board.
pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Puzzle {
    // A permutation of 1..=16 always forms a valid board.
    match Puzzle::from_values(solvable_values(rng)) {
        Ok(puzzle) => puzzle,
        Err(err) => unreachable!("shuffled permutation rejected: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const GOOD_GAME: [u8; TILE_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, EMPTY];
    const BAD_GAME: [u8; TILE_COUNT] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, EMPTY];

    #[test]
    fn test_reference_fixtures() {
        assert!(is_solvable(&GOOD_GAME));
        assert!(!is_solvable(&BAD_GAME));
    }

    #[test]
    fn test_count_inversions_skips_empty() {
        assert_eq!(count_inversions(&GOOD_GAME), 0);
        assert_eq!(count_inversions(&BAD_GAME), 1);
        assert_eq!(count_inversions(&[EMPTY, 3, 2, 1]), 3);
        assert_eq!(count_inversions(&[3, EMPTY, 2, EMPTY, 1]), 3);
    }

    #[test]
    fn test_missing_empty_is_unsolvable() {
        let mut values = GOOD_GAME;
        values[15] = 15;
        assert!(!is_solvable(&values));
    }

    #[test]
    fn test_generated_boards_are_solvable() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1000 {
            let puzzle = shuffled(&mut rng);
            assert!(is_solvable(&puzzle.values()));
            assert_eq!(puzzle.tile(puzzle.empty()), EMPTY);

            let mut sorted = puzzle.values();
            sorted.sort_unstable();
            assert_eq!(sorted, GOOD_GAME);
        }
    }

    #[test]
    fn test_every_reachable_board_is_solvable() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut puzzle = Puzzle::solved();

        for _ in 0..5000 {
            let direction = *Direction::ALL.choose(&mut rng).unwrap();
            puzzle.apply_move(direction);
            assert!(puzzle.is_solvable(), "reachable board rejected:\n{}", puzzle);
        }
    }

    #[test]
    fn test_swapping_two_tiles_breaks_solvability() {
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..200 {
            let mut values = solvable_values(&mut rng);
            let numbered: Vec<usize> = (0..TILE_COUNT).filter(|&i| values[i] != EMPTY).collect();
            let picked: Vec<&usize> = numbered.choose_multiple(&mut rng, 2).collect();
            values.swap(*picked[0], *picked[1]);
            assert!(!is_solvable(&values));
        }
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let a = shuffled(&mut StdRng::seed_from_u64(99));
        let b = shuffled(&mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
