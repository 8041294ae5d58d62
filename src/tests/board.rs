use super::*;
use crate::types::board::InvalidMoveReason;

fn stack(column: Column, rows: std::ops::Range<Row>, player: PlayerId) -> Board {
    let mut board = Board::new();
    for row in rows {
        board.set_cell(column, row, Some(player));
    }
    board
}

#[test]
fn test_empty_board() {
    let board = Board::new();
    assert_eq!((0, 0), board.bit_board_split());
    assert_eq!(None, board.winner());
    assert_eq!(0, board.ply());
    assert!(!board.is_full());
    assert_eq!(
        (0..COLUMNS).map(|c| (c, 0)).collect::<Vec<_>>(),
        board.available_positions().collect::<Vec<_>>()
    );
}

#[test]
fn test_vertical_win() {
    let board = stack(1, 0..4, PlayerId::PlayerFirst);
    assert_eq!(Some(PlayerId::PlayerFirst), board.winner());
    let board = stack(1, 0..3, PlayerId::PlayerFirst);
    assert_eq!(None, board.winner());
}

#[test]
fn test_horizontal_win() {
    let mut board = Board::new();
    for column in 2..6 {
        board.set_cell(column, 0, Some(PlayerId::PlayerSecond));
    }
    assert_eq!(Some(PlayerId::PlayerSecond), board.winner());
    board.set_cell(3, 0, Some(PlayerId::PlayerFirst));
    assert_eq!(None, board.winner());
}

#[test]
fn test_diagonal_wins() {
    let mut rising = Board::new();
    let mut falling = Board::new();
    for i in 0..4 {
        rising.set_cell(i + 2, i + 1, Some(PlayerId::PlayerFirst));
        falling.set_cell(i, 6 - i, Some(PlayerId::PlayerSecond));
    }
    assert_eq!(Some(PlayerId::PlayerFirst), rising.winner());
    assert_eq!(Some(PlayerId::PlayerSecond), falling.winner());
}

#[test]
fn test_no_wrap_across_columns() {
    let mut board = Board::new();
    for row in 4..ROWS {
        board.set_cell(0, row, Some(PlayerId::PlayerFirst));
    }
    board.set_cell(1, 0, Some(PlayerId::PlayerFirst));
    assert_eq!(None, board.winner());

    let mut board = Board::new();
    board.set_cell(6, 0, Some(PlayerId::PlayerFirst));
    board.set_cell(6, 1, Some(PlayerId::PlayerFirst));
    board.set_cell(0, 2, Some(PlayerId::PlayerFirst));
    board.set_cell(0, 3, Some(PlayerId::PlayerFirst));
    assert_eq!(None, board.winner());
}

#[test]
fn test_bit_board_layout() {
    let mut board = Board::new();
    board.set_cell(0, 0, Some(PlayerId::PlayerFirst));
    board.set_cell(1, 2, Some(PlayerId::PlayerSecond));
    board.set_cell(6, 6, Some(PlayerId::PlayerFirst));
    assert_eq!((1 | (1 << 54), 1 << 10), board.bit_board_split());
}

#[test]
fn test_next_position() {
    let board = stack(2, 0..4, PlayerId::PlayerFirst);
    assert_eq!(Ok(Some(4)), board.next_position(2));
    assert_eq!(Ok(Some(0)), board.next_position(0));
    assert_eq!(Err(BoardError::out_of_range(7)), board.next_position(7));

    let full = stack(2, 0..ROWS, PlayerId::PlayerSecond);
    assert_eq!(Ok(None), full.next_position(2));
}

#[test]
fn test_apply_and_with_move() {
    let mut board = Board::new();
    assert_eq!(Ok(0), board.apply(3, PlayerId::PlayerFirst));
    assert_eq!(Ok(1), board.apply(3, PlayerId::PlayerSecond));
    assert_eq!(Some(PlayerId::PlayerSecond), board.cell(3, 1));

    let (next, row) = board.with_move(3, PlayerId::PlayerFirst).unwrap();
    assert_eq!(2, row);
    assert_eq!(2, board.ply());
    assert_eq!(3, next.ply());

    let err = Board::new().apply(9, PlayerId::PlayerFirst).unwrap_err();
    assert_eq!(
        BoardError::InvalidMove {
            column: 9,
            reason: InvalidMoveReason::OutOfRange
        },
        err
    );

    let mut full = stack(4, 0..ROWS, PlayerId::PlayerFirst);
    assert_eq!(Err(BoardError::column_full(4)), full.apply(4, PlayerId::PlayerSecond));
}

#[test]
fn test_available_positions_omit_full_columns() {
    let mut board = stack(0, 0..ROWS, PlayerId::PlayerFirst);
    for row in 0..ROWS {
        board.set_cell(5, row, Some(PlayerId::PlayerSecond));
    }
    board.set_cell(3, 0, Some(PlayerId::PlayerSecond));
    assert_eq!(
        vec![(1, 0), (2, 0), (3, 1), (4, 0), (6, 0)],
        board.available_positions().collect::<Vec<_>>()
    );
    assert_eq!(&[1, 2, 3, 4, 6][..], &board.available_columns()[..]);
    // Restartable
    assert_eq!(5, board.available_positions().count());
    assert_eq!(5, board.available_positions().count());
}

#[test]
fn test_full_board() {
    let mut board = Board::new();
    let mut player = PlayerId::PlayerFirst;
    for column in 0..COLUMNS {
        for _ in 0..ROWS {
            board.apply(column, player).unwrap();
            player = player.opposite();
        }
    }
    assert!(board.is_full());
    assert_eq!(CELL_COUNT, board.ply());
    assert_eq!(0, board.available_positions().count());
}

#[test]
fn test_from_columns() {
    use PlayerId::*;
    let board = Board::from_columns(&[vec![PlayerFirst, PlayerSecond], vec![], vec![PlayerSecond]]).unwrap();
    assert_eq!(Some(PlayerSecond), board.cell(0, 1));
    assert_eq!(Some(PlayerSecond), board.cell(2, 0));
    assert_eq!(3, board.ply());

    let too_tall = vec![vec![PlayerFirst; ROWS + 1]];
    assert_eq!(Err(BoardError::column_full(0)), Board::from_columns(&too_tall));
    let too_wide = vec![vec![PlayerFirst]; COLUMNS + 1];
    assert_eq!(Err(BoardError::out_of_range(COLUMNS)), Board::from_columns(&too_wide));
}

#[test]
fn test_to_move_and_switch_ids() {
    let board = board_from_moves(&[3, 3, 4]);
    assert_eq!(PlayerId::PlayerSecond, board.to_move(PlayerId::PlayerFirst));
    assert_eq!(PlayerId::PlayerFirst, board.to_move(PlayerId::PlayerSecond));

    let switched = board.switch_ids();
    assert_eq!(Some(PlayerId::PlayerSecond), switched.cell(3, 0));
    assert_eq!(Some(PlayerId::PlayerFirst), switched.cell(3, 1));
    assert_eq!(board, switched.switch_ids());
    assert_eq!(switched, canonical_board(&board, PlayerId::PlayerSecond));
    assert_eq!(board, canonical_board(&board, PlayerId::PlayerFirst));
}

#[test]
fn test_features() {
    let board = board_from_moves(&[0, 1]);
    let f = board.features(PlayerId::PlayerSecond);
    assert_eq!(1.0, f[0]);
    assert_eq!(-1.0, f[ROWS]);
    assert_eq!(-1.0, f[CELL_COUNT]);
    assert_eq!(2.0, f.iter().take(CELL_COUNT).map(|x| x.abs()).sum::<f32>());
}

#[test]
fn test_display() {
    let board = board_from_moves(&[0, 6]);
    let text = board.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(ROWS + 1, lines.len());
    assert_eq!("X _ _ _ _ _ O", lines[ROWS - 1]);
    assert_eq!("_ _ _ _ _ _ _", lines[0]);
    assert_eq!("0 1 2 3 4 5 6", lines[ROWS]);
}
