use connect_four_lab::rand::rngs::SmallRng;
use connect_four_lab::rand::seq::SliceRandom;
use connect_four_lab::rng::new_rng;
use instant::Instant;
use tracing::{debug, trace};

use crate::negamax::transposition_table::{Probe, TTKey, Value, DEFAULT_SIZE_MB, TT};
use crate::*;

pub const DEFAULT_DEPTH: u8 = 5;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NegamaxConfig {
    /// Depth searched below each root child.
    pub depth: u8,
    pub tt_size_mb: usize,
    pub seed: Option<u64>,
    pub limits: Option<SearchLimits>,
}

impl Default for NegamaxConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            tt_size_mb: DEFAULT_SIZE_MB,
            seed: None,
            limits: None,
        }
    }
}

struct SearchContext<'a> {
    tt: &'a mut TT,
    zobrist: &'a ZobristTables,
    rng: &'a mut SmallRng,
    counter: SearchCounter,
}

/// Value of `board` for `color` to move, from the point of view of `color`.
fn negamax(board: &Board, depth: u8, color: PlayerId, ctx: &mut SearchContext) -> Result<Value, SearchError> {
    let key = TTKey(ctx.zobrist.hash(board, color));
    if let Probe::Hit(value) = ctx.tt.lookup(key, board, depth)? {
        ctx.counter.add_in_place(&SearchCounter::HIT);
        return Ok(value);
    }

    // Only the previous mover can have completed a line
    if board.winner().is_some() {
        ctx.counter.add_in_place(&SearchCounter::EVAL);
        return Ok(-1);
    }
    if depth == 0 {
        ctx.counter.add_in_place(&SearchCounter::EVAL);
        return Ok(0);
    }

    let mut children = board.available_columns();
    if children.is_empty() {
        ctx.counter.add_in_place(&SearchCounter::EVAL);
        return Ok(0);
    }
    children.shuffle(&mut *ctx.rng);

    let mut best = Value::MIN;
    for column in children {
        let (child, _) = board.with_move(column, color)?;
        ctx.counter.states_visited += 1;
        let value = -negamax(&child, depth - 1, color.opposite(), ctx)?;
        best = best.max(value);
        if best > 0 {
            break;
        }
    }
    ctx.tt.store(key, board, best, depth)?;
    Ok(best)
}

/// Depth-limited negamax with a transposition table, always searching as `PlayerFirst` on the
/// canonical board.
pub struct NegamaxSearch {
    pub tt: TT,
    pub config: NegamaxConfig,
    zobrist: ZobristTables,
    rng: SmallRng,
    cancel: Option<CancellationToken>,
}

impl std::fmt::Debug for NegamaxSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NegamaxSearch")
            .field("config", &self.config)
            .field("tt", &self.tt)
            .finish()
    }
}

impl NegamaxSearch {
    pub fn new(config: NegamaxConfig) -> Self {
        let mut rng = new_rng(config.seed);
        let zobrist = ZobristTables::new(&mut rng);
        Self {
            tt: TT::new(config.tt_size_mb),
            config,
            zobrist,
            rng,
            cancel: None,
        }
    }

    /// Stops the search before the next root child once `token` is cancelled.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self
        }
    }
}

impl GameTreeSearch for NegamaxSearch {
    fn name(&self) -> &str {
        "negamax"
    }

    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError> {
        let start_time = Instant::now();
        let board = canonical_board(board, player);
        let mut children = board.available_columns();
        match children.len() {
            0 => return Err(SearchError::NoLegalMoves),
            1 => return Ok(SearchResult::new(children[0], None, SearchCounter::ZERO)),
            _ => {}
        }
        children.shuffle(&mut self.rng);

        let mut ctx = SearchContext {
            tt: &mut self.tt,
            zobrist: &self.zobrist,
            rng: &mut self.rng,
            counter: SearchCounter::ZERO,
        };
        let mut best: Option<(Column, Value)> = None;
        for column in children {
            if best.is_some() {
                let positions = ctx.counter.states_visited;
                if should_terminate(&self.cancel, &self.config, start_time, positions) {
                    debug!(positions, "negamax: stopping early");
                    break;
                }
            }
            let (child, _) = board.with_move(column, PlayerId::PlayerFirst)?;
            ctx.counter.states_visited += 1;
            let value = -negamax(&child, self.config.depth, PlayerId::PlayerSecond, &mut ctx)?;
            ctx.counter.iterations += 1;
            trace!(column, value, "negamax: root child");
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((column, value));
            }
            if value > 0 {
                break;
            }
        }

        let counter = ctx.counter;
        let Some((column, value)) = best else {
            return Err(SearchError::NoLegalMoves);
        };
        debug!(
            column,
            value,
            tt_len = self.tt.len(),
            "negamax: {}",
            counter.summary(start_time.elapsed().as_nanos())
        );
        Ok(SearchResult::new(column, Some(value as f32), counter))
    }
}

#[inline]
fn should_terminate(
    cancel: &Option<CancellationToken>,
    config: &NegamaxConfig,
    start_time: Instant,
    positions: u64,
) -> bool {
    if cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
        return true;
    }
    config
        .limits
        .is_some_and(|limits| limits.should_terminate(start_time, positions))
}
