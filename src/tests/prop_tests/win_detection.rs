use super::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 5_000,
        ..ProptestConfig::default()
    })]

    #[test]
    fn bitboard_winner_should_agree_with_naive_scan(board in arb_stacked_board()) {
        prop_assert_eq!(naive_winner(&board), board.winner());
    }

    #[test]
    fn bitboard_winner_should_agree_with_naive_scan_for_played_boards(board in arb_played_board()) {
        prop_assert_eq!(naive_winner(&board), board.winner());
    }

    #[test]
    fn bit_boards_should_be_disjoint_and_keep_guard_bits_clear(board in arb_stacked_board()) {
        let (a, b) = board.bit_board_split();
        let guard: u64 = (0..COLUMNS).map(|c| 1u64 << (c * (ROWS + 1) + ROWS)).sum();
        prop_assert_eq!(0, a & b);
        prop_assert_eq!(0, (a | b) & guard);
        prop_assert_eq!(board.ply() as u32, (a | b).count_ones());
    }

    #[test]
    fn available_positions_should_match_next_position(board in arb_stacked_board()) {
        let expected: Vec<(Column, Row)> = (0..COLUMNS)
            .filter_map(|c| board.next_position(c).unwrap().map(|r| (c, r)))
            .collect();
        prop_assert_eq!(expected, board.available_positions().collect::<Vec<_>>());
    }
}
