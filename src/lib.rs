#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![doc = include_str!("../README.md")]

/// Module containing the board model: cells, move application and win detection.
pub mod types;

/// Errors raised by boards, searches and matches.
pub mod error;

/// Zobrist hashing of board states.
pub mod zobrist_hash;

/// Interface shared by all search strategies.
pub mod game_tree_search;

/// Wall-clock budgets, chronometers and cancellation flags.
pub mod timer;

/// Runs a full match between two agents.
pub mod match_runner;

/// Pseudorandom number generation
pub mod rng;

/// Re-exports the `smallvec` crate
pub use smallvec;

/// Re-exports the `rand` create
pub use rand;

/// Re-exports the `thiserror` crate
pub use thiserror;

pub mod prelude {
    pub use crate::error::{MatchError, SearchError};
    pub use crate::game_tree_search::{
        canonical_board, GameTreeSearch, SearchCounter, SearchLimits, SearchResult,
    };
    pub use crate::match_runner::{run_match, GameStatus, MatchConfig, MatchOutcome, TurnRecord};
    pub use crate::timer::{
        BudgetRule, CancellationToken, Chronometer, ClockSnapshot, GameClock, TimeBudget, TurnTimer,
    };
    pub use crate::types::board::{
        Board, BoardError, Column, Row, CELL_COUNT, COLUMNS, MAX_TURNS_POSSIBLE, ROWS,
    };
    pub use crate::types::by_player::ByPlayer;
    pub use crate::types::player_id::PlayerId;
    pub use crate::zobrist_hash::{HashValue, ZobristHasher, ZobristTables};
}

#[cfg(test)]
mod tests;
