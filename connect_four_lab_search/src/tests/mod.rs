use std::time::Duration;

use crate::*;




fn board_from_moves(moves: &[Column]) -> Board {
    Board::from_moves(moves, PlayerId::PlayerFirst).unwrap()
}

/// `PlayerSecond` holds row 0 of columns 0 to 2, so `PlayerFirst` to move must play column 3.
fn must_block_board() -> Board {
    use PlayerId::*;
    Board::from_columns(&[
        vec![PlayerSecond, PlayerFirst],
        vec![PlayerSecond, PlayerFirst],
        vec![PlayerSecond],
        vec![],
        vec![],
        vec![],
        vec![PlayerFirst],
    ])
    .unwrap()
}

/// `PlayerFirst` to move wins by completing column 4.
fn must_win_board() -> Board {
    use PlayerId::*;
    Board::from_columns(&[
        vec![PlayerSecond],
        vec![],
        vec![PlayerSecond],
        vec![],
        vec![PlayerFirst, PlayerFirst, PlayerFirst],
        vec![],
        vec![PlayerSecond],
    ])
    .unwrap()
}

/// Every column full except column 5.
fn single_move_board() -> Board {
    let full = [PlayerId::PlayerFirst, PlayerId::PlayerSecond].repeat(4)[..ROWS].to_vec();
    let columns: Vec<_> = (0..COLUMNS)
        .map(|c| if c == 5 { vec![] } else { full.clone() })
        .collect();
    Board::from_columns(&columns).unwrap()
}

fn iteration_limit(max_positions: u64) -> Option<SearchLimits> {
    Some(SearchLimits {
        max_time_ms: None,
        max_positions: Some(max_positions),
    })
}

fn long_budget() -> TimeBudget {
    TimeBudget::default().with_max_cap(Duration::from_secs(600))
}
