use crate::types::board::{Board, Column, InvalidMoveReason};
use crate::types::player_id::PlayerId;
use crate::zobrist_hash::HashValue;

pub use crate::types::board::BoardError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidMove(#[from] BoardError),
    #[error("no legal moves on the board")]
    NoLegalMoves,
    /// Two different boards share a fingerprint in the transposition table.
    #[error("hash collision on {hash:#x}: stored board differs from the searched board\nstored:\n{stored}\ncurrent:\n{current}")]
    HashCollision {
        hash: HashValue,
        stored: Box<Board>,
        current: Box<Board>,
    },
    #[error("{strategy}: bad strategy implementation: {reason}")]
    BadStrategyImplementation {
        strategy: &'static str,
        reason: &'static str,
    },
    #[error("{strategy}: no evaluation model supplied")]
    MissingEvaluationModel { strategy: &'static str },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("{player} played an invalid move at column {column}: {reason}")]
    InvalidMove {
        player: PlayerId,
        column: Column,
        reason: InvalidMoveReason,
    },
    #[error("search failed for {player}")]
    Search {
        player: PlayerId,
        #[source]
        source: SearchError,
    },
}
