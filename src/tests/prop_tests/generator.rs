use proptest::prelude::*;

use crate::prelude::*;

/// Four-in-a-row by scanning every cell in every direction.
pub fn naive_has_four(board: &Board, player: PlayerId) -> bool {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
    let owned = |c: isize, r: isize| {
        (0..COLUMNS as isize).contains(&c)
            && (0..ROWS as isize).contains(&r)
            && board.cell(c as usize, r as usize) == Some(player)
    };
    (0..COLUMNS as isize).any(|c| {
        (0..ROWS as isize).any(|r| {
            DIRECTIONS
                .iter()
                .any(|&(dc, dr)| (0..4).all(|i| owned(c + i * dc, r + i * dr)))
        })
    })
}

pub fn naive_winner(board: &Board) -> Option<PlayerId> {
    PlayerId::VALUES.into_iter().find(|&p| naive_has_four(board, p))
}

pub fn arb_player_id() -> impl Strategy<Value = PlayerId> {
    prop_oneof![Just(PlayerId::PlayerFirst), Just(PlayerId::PlayerSecond)]
}

prop_compose! {
    /// Column stacks of arbitrary owners, respecting gravity but not turn order.
    pub fn arb_stacked_board()(
        stacks in proptest::collection::vec(proptest::collection::vec(arb_player_id(), 0..=ROWS), COLUMNS)
    ) -> Board {
        Board::from_columns(&stacks).unwrap()
    }
}

prop_compose! {
    /// Board reached by alternating legal moves, skipping full columns and stopping at a win.
    pub fn arb_played_board()(
        first in arb_player_id(),
        moves in proptest::collection::vec(0..COLUMNS, 0..=MAX_TURNS_POSSIBLE)
    ) -> Board {
        let mut board = Board::new();
        let mut player = first;
        for column in moves {
            if board.winner().is_some() {
                break;
            }
            if board.apply(column, player).is_ok() {
                player = player.opposite();
            }
        }
        board
    }
}
