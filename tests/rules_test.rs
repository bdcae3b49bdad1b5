//! Rule engine and planner properties over the public API.

use noughts::{Board, Difficulty, Mark, Outcome, Position, evaluate, select_move};
use noughts_rules::rules::LINES;
use noughts_rules::{blocking_move, select_move_for};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use strum::IntoEnumIterator;

fn board(s: &str) -> Board {
    s.parse().unwrap()
}

#[test]
fn test_every_line_wins_for_either_mark() {
    for mark in Mark::iter() {
        for line in LINES {
            let mut b = Board::new();
            for pos in line {
                b.place(pos, mark).unwrap();
            }
            assert_eq!(evaluate(&b), Outcome::win_for(mark), "{mark} on {line:?}");
        }
    }
}

#[test]
fn test_full_board_without_line_is_tie() {
    assert_eq!(evaluate(&board("XOXXOOOXX")), Outcome::Tie);
    assert_eq!(evaluate(&board("XOXOXXOXO")), Outcome::Tie);
}

#[test]
fn test_win_on_full_board_is_not_tie() {
    assert_eq!(evaluate(&board("XXXOOXOXO")), Outcome::HumanWin);
}

#[test]
fn test_planner_only_picks_empty_cells() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        // Random partially filled board.
        let mut b = Board::new();
        let mut mark = Mark::X;
        let fill = rng.gen_range(0..9);
        for _ in 0..fill {
            let free = b.empty_positions();
            let pos = free[rng.gen_range(0..free.len())];
            b.place(pos, mark).unwrap();
            mark = mark.opponent();
        }
        for difficulty in Difficulty::iter() {
            let pos = select_move(&b, difficulty, &mut rng).unwrap();
            assert!(b.is_empty(pos), "{difficulty} chose taken {pos} on {}", b.symbols());
        }
    }
}

#[test]
fn test_full_board_has_no_move() {
    let mut rng = StdRng::seed_from_u64(0);
    for difficulty in Difficulty::iter() {
        assert_eq!(select_move(&board("XOXXOOOXX"), difficulty, &mut rng), None);
    }
}

#[test]
fn test_expert_blocks_when_it_cannot_win() {
    let mut rng = StdRng::seed_from_u64(5);
    // X threatens the left column; O has nothing.
    let b = board("XO.X.....");
    assert_eq!(blocking_move(&b, Mark::O), Some(Position::BottomLeft));
    assert_eq!(
        select_move(&b, Difficulty::Expert, &mut rng),
        Some(Position::BottomLeft)
    );
}

#[test]
fn test_harder_prefers_own_win_over_block() {
    let b = board("XX.OO....");
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(
            select_move(&b, Difficulty::Harder, &mut rng),
            Some(Position::MiddleRight)
        );
    }
}

#[test]
fn test_harder_does_not_block() {
    // X threatens the top row; O has no win, so Harder plays at random.
    let b = board("XX.O.....");
    let picks: HashSet<Position> = (0..50)
        .map(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            select_move(&b, Difficulty::Harder, &mut rng).unwrap()
        })
        .collect();
    assert!(picks.len() > 1, "Harder always chose {picks:?}");
    assert_eq!(blocking_move(&b, Mark::O), Some(Position::TopRight));
}

#[test]
fn test_easy_reaches_every_empty_cell() {
    let b = Board::new();
    let mut rng = StdRng::seed_from_u64(21);
    let picks: HashSet<Position> = (0..500)
        .filter_map(|_| select_move(&b, Difficulty::Easy, &mut rng))
        .collect();
    assert_eq!(picks.len(), 9);
}

#[test]
fn test_expert_answers_center_with_corner() {
    let b = board("....X....");
    for seed in 0..100 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pos = select_move(&b, Difficulty::Expert, &mut rng).unwrap();
        assert!(pos.is_corner(), "seed {seed} chose {pos}");
    }
}

#[test]
fn test_planner_can_play_either_side() {
    let mut rng = StdRng::seed_from_u64(1);
    let b = board("OO.XX....");
    assert_eq!(
        select_move_for(&b, Mark::X, Difficulty::Expert, &mut rng),
        Some(Position::MiddleRight)
    );
}
