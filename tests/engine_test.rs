//! End-to-end play through the public session API.

use fifteen_puzzle::{
    Cell, Direction, EngineConfig, GameSession, Puzzle, Settled, WinCondition, EMPTY, TILE_COUNT,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn seeded(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    }
}

fn assert_consistent(puzzle: &Puzzle) {
    let values = puzzle.values();
    assert_eq!(values.iter().filter(|&&v| v == EMPTY).count(), 1);
    assert_eq!(puzzle.tile(puzzle.empty()), EMPTY);

    let mut sorted = values;
    sorted.sort_unstable();
    let expected: Vec<u8> = (1..=TILE_COUNT as u8).collect();
    assert_eq!(sorted.to_vec(), expected);
}

#[test]
fn test_invariant_holds_through_random_play() {
    let mut session = GameSession::new(&seeded(5));
    let mut rng = StdRng::seed_from_u64(6);

    for _ in 0..2000 {
        let before = session.puzzle().clone();
        let result = if rng.gen_bool(0.5) {
            let direction = *Direction::ALL.choose(&mut rng).unwrap();
            session.attempt_move_by_direction(direction)
        } else {
            let cell = Cell::new(rng.gen_range(0..4), rng.gen_range(0..4));
            session.attempt_move_by_cell(cell)
        };

        assert_consistent(session.puzzle());
        assert_eq!(result.empty, session.puzzle().empty());

        if result.accepted {
            let slide = result.slide.unwrap();
            assert_eq!(slide.to, before.empty());
            assert_eq!(session.puzzle().tile(slide.to), slide.tile);
            assert!(session.puzzle().is_solvable());
            if session.settle() == Settled::Won {
                session.new_game();
            }
        } else {
            assert_eq!(session.puzzle(), &before);
            assert!(!session.is_blocked());
        }
    }
}

#[test]
fn test_non_adjacent_cells_rejected_exhaustively() {
    let config = seeded(1);

    for empty_index in 0..TILE_COUNT {
        // Place the empty slot at every cell in turn.
        let mut values = [0u8; TILE_COUNT];
        let mut next = 1;
        for (i, slot) in values.iter_mut().enumerate() {
            if i == empty_index {
                *slot = EMPTY;
            } else {
                *slot = next;
                next += 1;
            }
        }
        let start = Puzzle::from_values(values).unwrap();
        let empty = start.empty();

        for target_index in 0..TILE_COUNT {
            let target = Cell::from_index(target_index);
            let mut session = GameSession::with_puzzle(start.clone(), &config);
            let result = session.attempt_move_by_cell(target);

            assert_eq!(result.accepted, empty.is_adjacent(target));
            if !result.accepted {
                assert_eq!(session.puzzle(), &start);
            }
        }
    }
}

#[test]
fn test_move_and_inverse_round_trip() {
    let mut session = GameSession::new(&seeded(21));
    let original = session.puzzle().clone();

    for direction in Direction::ALL {
        if session.attempt_move_by_direction(direction).accepted {
            session.settle();
            assert!(
                session
                    .attempt_move_by_direction(direction.opposite())
                    .accepted
            );
            session.settle();
            assert_eq!(session.puzzle(), &original);
        }
    }
}

#[test]
fn test_thousand_new_games_are_solvable() {
    let mut session = GameSession::new(&seeded(1000));

    for _ in 0..1000 {
        let puzzle = session.new_game();
        assert!(puzzle.is_solvable());
        assert_consistent(puzzle);
    }
}

#[test]
fn test_winning_move_then_new_game() {
    let almost = Puzzle::from_values([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 16, 15]).unwrap();
    let config = EngineConfig {
        win_condition: WinCondition::Classic,
        ..seeded(2)
    };
    let mut session = GameSession::with_puzzle(almost, &config);

    let result = session.attempt_move_by_tile(15);
    assert!(result.accepted);
    assert!(session.is_won());
    assert_eq!(session.settle(), Settled::Won);

    session.new_game();
    assert!(!session.is_blocked());
    assert!(session.puzzle().is_solvable());
}
