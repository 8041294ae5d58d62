use std::ops::ControlFlow;

use connect_four_lab::rand::rngs::SmallRng;
use connect_four_lab::rng::new_rng;
use connect_four_lab::smallvec::SmallVec;
use instant::Instant;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::*;

pub mod policy;
use policy::*;

pub mod rollout;
use rollout::*;

pub mod score;
use score::*;

pub mod tree;
use tree::*;

pub mod value;

pub mod debug;
pub use debug::*;

/// Turns over which the game clock is spread by MCTS.
pub const MCTS_EXPECTED_TURNS: u32 = 42;

enum IterationEnd {
    NoChildren,
}

#[derive(Debug, Copy, Clone)]
pub struct MCTSConfig {
    /// `max_positions` counts iterations.
    pub limits: Option<SearchLimits>,
    pub seed: Option<u64>,
    pub perspective: ScorePerspective,
    pub budget: TimeBudget,
    /// Dump the top of the tree through `tracing` after each search.
    pub debug: bool,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            limits: None,
            seed: None,
            perspective: Default::default(),
            budget: TimeBudget::spread_over_turns(MCTS_EXPECTED_TURNS),
            debug: false,
        }
    }
}

/// Monte-Carlo Tree Search over the canonical board, maximizing for `PlayerFirst`.
///
/// The tree and its fingerprint map are rebuilt on every search.
pub struct MCTS<R: RolloutPolicy, S: SelectionPolicy = UCB1> {
    pub config: MCTSConfig,
    pub tree: Tree,
    pub rollout_policy: R,
    pub selection_policy: S,
    nodes_by_hash: FxHashMap<HashValue, NodeId>,
    zobrist: ZobristTables,
    rng: SmallRng,
    clock: Option<ClockSnapshot>,
    cancel: Option<CancellationToken>,
}

impl<R: RolloutPolicy, S: SelectionPolicy> std::fmt::Debug for MCTS<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MCTS")
            .field("config", &self.config)
            .field("rollout_policy", &self.rollout_policy.name())
            .field("nodes", &self.tree.len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<R: RolloutPolicy, S: SelectionPolicy + Default> MCTS<R, S> {
    pub fn new(config: MCTSConfig, rollout_policy: R) -> Result<Self, SearchError> {
        Self::with_selection_policy(config, rollout_policy, Default::default())
    }
}

impl<R: RolloutPolicy, S: SelectionPolicy> MCTS<R, S> {
    pub fn with_selection_policy(
        config: MCTSConfig,
        rollout_policy: R,
        selection_policy: S,
    ) -> Result<Self, SearchError> {
        rollout_policy.validate()?;
        let mut rng = new_rng(config.seed);
        let zobrist = ZobristTables::new(&mut rng);
        Ok(Self {
            config,
            tree: Tree::new(Board::new(), PlayerId::PlayerFirst),
            rollout_policy,
            selection_policy,
            nodes_by_hash: Default::default(),
            zobrist,
            rng,
            clock: None,
            cancel: None,
        })
    }

    /// Stops the search loop once `token` is cancelled.
    pub fn with_cancellation(self, token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..self
        }
    }

    fn init(&mut self, board: Board) -> NodeId {
        self.tree = Tree::new(board, PlayerId::PlayerFirst);
        self.nodes_by_hash.clear();
        let root = self.tree.root();
        self.nodes_by_hash
            .insert(self.zobrist.hash(&board, PlayerId::PlayerFirst), root);
        root
    }

    /// Creates the children of `id`, reusing nodes already in the tree. Returns the number of
    /// nodes allocated.
    fn expand(&mut self, id: NodeId) -> Result<u64, SearchError> {
        let node = self.tree.get(id);
        if node.is_expanded() {
            return Ok(0);
        }
        let (board, color) = (node.board, node.color);
        let next_color = color.opposite();
        let mut children = SmallVec::new();
        let mut created = 0;
        for column in board.available_columns() {
            let (child, _) = board.with_move(column, color)?;
            let hash = self.zobrist.hash(&child, next_color);
            let child_id = if let Some(&existing) = self.nodes_by_hash.get(&hash) {
                let stored = self.tree.get(existing).board;
                if stored != child {
                    return Err(SearchError::HashCollision {
                        hash,
                        stored: Box::new(stored),
                        current: Box::new(child),
                    });
                }
                existing
            } else {
                let child_id = self.tree.allocate(NodeData::new(child, next_color, Some(column), Some(id)));
                self.nodes_by_hash.insert(hash, child_id);
                created += 1;
                child_id
            };
            children.push((column, child_id));
        }
        self.tree.get_mut(id).children = Some(children);
        Ok(created)
    }

    /// Child with the highest selection score. The first one wins ties.
    fn select_child(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.tree.get(id);
        let ctx = SelectionPolicyContext {
            config: &self.config,
            parent,
        };
        let mut best: Option<(NodeId, f32)> = None;
        for &(_, child_id) in self.tree.children(id) {
            let score = self.selection_policy.score_child(&ctx, self.tree.get(child_id));
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((child_id, score));
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    #[inline]
    fn rollout(&mut self, id: NodeId) -> f32 {
        let node = self.tree.get(id);
        self.rollout_policy
            .rollout_score(&node.board, node.color, &mut self.rng)
    }

    /// Adds `score` and one visit to `leaf` and every node on its parent chain.
    fn backpropagate(&mut self, leaf: NodeId, score: f32) {
        let chain: SmallVec<[NodeId; 16]> = self.tree.ancestors(leaf).collect();
        for id in chain {
            self.tree.get_mut(id).score += Score::single(score);
        }
    }

    fn iteration(&mut self) -> Result<ControlFlow<IterationEnd, SearchCounter>, SearchError> {
        let root = self.tree.root();
        let mut counter = SearchCounter {
            iterations: 1,
            ..SearchCounter::ZERO
        };
        let mut current = root;
        let score = loop {
            let node = self.tree.get(current);
            if current != root {
                if node.score.visits == 0 {
                    counter.add_in_place(&SearchCounter::EVAL);
                    break self.rollout(current);
                }
                if let Some(score) = node.terminal_score() {
                    break score;
                }
            }
            counter.states_visited += self.expand(current)?;
            let Some(next) = self.select_child(current) else {
                return Ok(ControlFlow::Break(IterationEnd::NoChildren));
            };
            current = next;
        };
        self.backpropagate(current, score);
        Ok(ControlFlow::Continue(counter))
    }

    #[inline]
    fn should_terminate(&self, timer: &TurnTimer, start_time: Instant, iterations: u64) -> bool {
        if timer.timed_out() {
            return true;
        }
        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return true;
        }
        self.config
            .limits
            .is_some_and(|limits| limits.should_terminate(start_time, iterations))
    }

    /// Root children ranked by value, best first. Equal values keep column order.
    pub fn ranked_root_children(&self) -> Vec<(Column, Score)> {
        self.tree
            .children(self.tree.root())
            .iter()
            .map(|&(column, id)| (column, self.tree.get(id).score))
            .sorted_by(|(_, a), (_, b)| b.value().total_cmp(&a.value()))
            .collect()
    }
}

impl<R: RolloutPolicy, S: SelectionPolicy> GameTreeSearch for MCTS<R, S> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError> {
        let start_time = Instant::now();
        let board = canonical_board(board, player);
        if board.is_full() {
            return Err(SearchError::NoLegalMoves);
        }

        let root = self.init(board);
        let mut counter = SearchCounter::ZERO;
        counter.states_visited += self.expand(root)?;

        let limit = self.config.budget.per_move(self.clock);
        let timer = TurnTimer::start_with_watcher(limit, move || trace!(?limit, "mcts: turn budget elapsed"));
        'iter: loop {
            if self.should_terminate(&timer, start_time, counter.iterations) {
                break 'iter;
            }
            match self.iteration()? {
                ControlFlow::Continue(c) => counter.add_in_place(&c),
                ControlFlow::Break(IterationEnd::NoChildren) => {
                    debug!("mcts: selection reached a node without children");
                    break 'iter;
                }
            }
        }
        timer.stop();

        let Some(&(column, best)) = self.ranked_root_children().first() else {
            return Err(SearchError::NoLegalMoves);
        };
        if self.config.debug {
            self.print_tree(root, 0, 2, 1);
        }
        debug!(
            column,
            value = best.value(),
            visits = best.visits,
            nodes = self.tree.len(),
            iterations = counter.iterations,
            "mcts: {}",
            counter.summary(start_time.elapsed().as_nanos())
        );
        Ok(SearchResult::new(column, Some(best.value()), counter))
    }

    fn on_turn_begin(&mut self, _turn: u32, clock: Option<ClockSnapshot>) {
        self.clock = clock;
    }

    fn reset(&mut self) {
        self.clock = None;
        self.init(Board::new());
    }
}
