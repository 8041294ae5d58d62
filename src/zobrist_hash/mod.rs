/// Zobrist hashing is the fingerprinting method used for board states.
/// The Zobrist hash of a board is the XOR over all features that are relevant to
/// its distinctiveness:
/// - The owner of each occupied cell
/// - The side to move
///
/// Wikipedia: https://en.wikipedia.org/wiki/Zobrist_hashing
/// Chess Programming Wiki: https://www.chessprogramming.org/Zobrist_Hashing
///
/// The hash tables are owned by the search strategy that needs them. Regenerating the tables
/// invalidates every fingerprint computed from the previous ones, so a strategy builds its
/// tables once and keeps them for the lifetime of its transposition table.
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::types::board::{Board, CELL_COUNT};
use crate::types::by_player::ByPlayer;
use crate::types::player_id::PlayerId;

#[cfg(feature = "hash128")]
pub type HashValue = u128;

#[cfg(not(feature = "hash128"))]
pub type HashValue = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZobristHasher(pub HashValue);

impl ZobristHasher {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn hash(&mut self, v: HashValue) {
        self.0 ^= v
    }

    #[inline]
    pub fn finish(self) -> HashValue {
        self.0
    }
}

/// Pre-computed random values for every (player, cell) pair plus one salt per side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristTables {
    pub cells: ByPlayer<[HashValue; CELL_COUNT]>,
    pub side_to_move: ByPlayer<HashValue>,
}

impl ZobristTables {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut random_table = || {
            let mut table = [0 as HashValue; CELL_COUNT];
            rng.fill(&mut table[..]);
            table
        };
        let cells = ByPlayer::new(random_table(), random_table());
        let side_to_move = ByPlayer::new(rng.gen(), rng.gen());
        Self {
            cells,
            side_to_move,
        }
    }

    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self::new(&mut SmallRng::seed_from_u64(seed))
    }

    pub fn hasher(&self, board: &Board, side: PlayerId) -> ZobristHasher {
        let mut h = ZobristHasher::new();
        for (index, player) in board.occupied_cells() {
            h.hash(self.cells[player][index]);
        }
        h.hash(self.side_to_move[side]);
        h
    }

    #[inline]
    pub fn hash(&self, board: &Board, side: PlayerId) -> HashValue {
        self.hasher(board, side).finish()
    }
}
