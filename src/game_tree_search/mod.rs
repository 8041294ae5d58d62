use std::ops::Add;

use crate::error::SearchError;
use crate::timer::ClockSnapshot;
use crate::types::board::{Board, Column};
use crate::types::player_id::PlayerId;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchCounter {
    /// Number of states visited through move applications.
    pub states_visited: u64,
    /// Number of times a board position was being evaluated (zero depth, winner found or rollout).
    pub evals: u64,
    /// Number of times there is a transposition table hit
    pub tt_hits: u64,
    /// Number of completed search iterations (root children for negamax, cycles for MCTS)
    pub iterations: u64,
}

impl SearchCounter {
    pub const ZERO: SearchCounter = SearchCounter {
        states_visited: 0,
        evals: 0,
        tt_hits: 0,
        iterations: 0,
    };

    pub const EVAL: SearchCounter = SearchCounter {
        evals: 1,
        ..Self::ZERO
    };

    pub const HIT: SearchCounter = SearchCounter {
        tt_hits: 1,
        ..Self::ZERO
    };

    #[inline]
    pub fn add_in_place(&mut self, c: &SearchCounter) {
        self.states_visited += c.states_visited;
        self.evals += c.evals;
        self.tt_hits += c.tt_hits;
        self.iterations += c.iterations;
    }

    pub fn summary(&self, dt_ns: u128) -> String {
        let dt_ms: f64 = 1e-6 * (dt_ns as f64);
        let rate: f64 = (1e-6_f64 * 1e9_f64) * (self.states_visited as f64) / (dt_ns.max(1) as f64);
        format!("dt={dt_ms:.2}ms rate={rate:.4} Mstates/s")
    }
}

impl Add for SearchCounter {
    type Output = SearchCounter;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        let mut a = self;
        a.add_in_place(&rhs);
        a
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// The chosen column
    pub column: Column,
    /// Evaluation of the chosen move from the searching player's point of view, if the strategy computes one.
    pub eval: Option<f32>,
    pub counter: SearchCounter,
}

impl SearchResult {
    #[inline]
    pub fn new(column: Column, eval: Option<f32>, counter: SearchCounter) -> Self {
        SearchResult {
            column,
            eval,
            counter,
        }
    }
}

/// Maps the player's own pieces to `PlayerFirst` so strategies always evaluate as `+1`.
#[inline]
pub fn canonical_board(board: &Board, player: PlayerId) -> Board {
    match player {
        PlayerId::PlayerFirst => *board,
        PlayerId::PlayerSecond => board.switch_ids(),
    }
}

/// A move-choosing strategy driven by a turn-management loop.
pub trait GameTreeSearch {
    /// Short identifier used in logs and match summaries.
    fn name(&self) -> &str;

    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError>;

    #[inline]
    fn choose_move(&mut self, board: &Board, player: PlayerId) -> Result<Column, SearchError> {
        self.search(board, player).map(|r| r.column)
    }

    /// Called before every turn of this player. Clock-aware strategies derive their budget here.
    #[inline]
    fn on_turn_begin(&mut self, _turn: u32, _clock: Option<ClockSnapshot>) {}

    /// Clears transient per-match state. Transposition tables survive.
    #[inline]
    fn reset(&mut self) {}
}

impl<T: GameTreeSearch + ?Sized> GameTreeSearch for Box<T> {
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError> {
        (**self).search(board, player)
    }

    #[inline]
    fn choose_move(&mut self, board: &Board, player: PlayerId) -> Result<Column, SearchError> {
        (**self).choose_move(board, player)
    }

    #[inline]
    fn on_turn_begin(&mut self, turn: u32, clock: Option<ClockSnapshot>) {
        (**self).on_turn_begin(turn, clock)
    }

    #[inline]
    fn reset(&mut self) {
        (**self).reset()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchLimits {
    pub max_time_ms: Option<u128>,
    pub max_positions: Option<u64>,
}

impl SearchLimits {
    pub fn should_terminate(&self, start_time: instant::Instant, positions_searched: u64) -> bool {
        if let Some(max_time_ms) = self.max_time_ms {
            if start_time.elapsed().as_millis() >= max_time_ms {
                return true;
            }
        }
        if let Some(max_positions) = self.max_positions {
            if positions_searched >= max_positions {
                return true;
            }
        }

        false
    }
}
