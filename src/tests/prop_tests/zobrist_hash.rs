use std::collections::HashMap;

use super::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    #[test]
    fn hash_should_be_a_function_of_cells_and_side(board in arb_played_board(), side in arb_player_id(), seed in any::<u64>()) {
        let tables = ZobristTables::from_seed(seed);
        let mut expected = tables.side_to_move[side];
        for c in 0..COLUMNS {
            for r in 0..ROWS {
                if let Some(p) = board.cell(c, r) {
                    expected ^= tables.cells[p][c * ROWS + r];
                }
            }
        }
        prop_assert_eq!(expected, tables.hash(&board, side));
        prop_assert_eq!(expected, ZobristTables::from_seed(seed).hash(&board, side));
    }

    /// Distinct boards should practically never share a fingerprint, over many fresh tables.
    #[test]
    fn distinct_boards_should_not_collide(
        boards in proptest::collection::vec((arb_stacked_board(), arb_player_id()), 64),
        seed in any::<u64>()
    ) {
        let tables = ZobristTables::from_seed(seed);
        let mut seen: HashMap<HashValue, (Board, PlayerId)> = HashMap::new();
        for (board, side) in boards {
            let h = tables.hash(&board, side);
            if let Some(prev) = seen.insert(h, (board, side)) {
                prop_assert_eq!(prev, (board, side));
            }
        }
    }
}
