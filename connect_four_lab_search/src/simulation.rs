use connect_four_lab::rand::rngs::SmallRng;
use connect_four_lab::rng::new_rng;
use connect_four_lab::smallvec::{smallvec, SmallVec};
use instant::Instant;
use tracing::debug;

pub use crate::playout::DEFAULT_SIMULATIONS;
use crate::playout::{random_choice, simulate, simulate_many};
use crate::*;

/// Turns over which the game clock is spread by the time-limited simulation agent.
pub const SIMULATION_EXPECTED_TURNS: u32 = 25;
pub const DEFAULT_MAX_ROUNDS: u32 = 1000;

#[derive(Debug, Copy, Clone)]
pub struct SimulationConfig {
    /// Games per root child when not time limited.
    pub simulations: u32,
    /// Cycle one game per child per round until the turn budget elapses.
    pub time_limited: bool,
    pub budget: TimeBudget,
    pub max_rounds: u32,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            time_limited: false,
            budget: TimeBudget::spread_over_turns(SIMULATION_EXPECTED_TURNS),
            max_rounds: DEFAULT_MAX_ROUNDS,
            seed: None,
            parallel: false,
        }
    }
}

/// Flat Monte-Carlo: scores every root child by the outcomes of random games and plays the best.
#[derive(Debug)]
pub struct SimulationSearch {
    pub config: SimulationConfig,
    rng: SmallRng,
    clock: Option<ClockSnapshot>,
}

type Children = SmallVec<[(Column, Board); COLUMNS]>;

impl SimulationSearch {
    pub fn new(config: SimulationConfig) -> Result<Self, SearchError> {
        if !config.time_limited && config.simulations == 0 {
            return Err(SearchError::BadStrategyImplementation {
                strategy: "simulation",
                reason: "simulation count must be positive",
            });
        }
        if config.time_limited && config.max_rounds == 0 {
            return Err(SearchError::BadStrategyImplementation {
                strategy: "simulation_tl",
                reason: "round limit must be positive",
            });
        }
        Ok(Self {
            config,
            rng: new_rng(config.seed),
            clock: None,
        })
    }

    fn fixed_count(&mut self, children: &Children, counter: &mut SearchCounter) -> (Column, i64) {
        let n = self.config.simulations;
        let mut best: Option<(Column, i64)> = None;
        for &(column, child) in children {
            let total = simulate_many(&child, PlayerId::PlayerSecond, n, self.config.parallel, &mut self.rng);
            counter.evals += n as u64;
            counter.iterations += 1;
            if best.map_or(true, |(_, v)| total > v) {
                best = Some((column, total));
            }
        }
        best.unwrap_or((children[0].0, 0))
    }

    fn time_limited(&mut self, children: &Children, counter: &mut SearchCounter) -> Option<(Column, i64)> {
        if let Some(&(column, _)) = children.iter().find(|(_, child)| child.winner().is_some()) {
            return Some((column, i64::MAX));
        }

        let limit = self.config.budget.per_move(self.clock);
        let timer = TurnTimer::start(limit);
        let mut totals: SmallVec<[i64; COLUMNS]> = smallvec![0; children.len()];
        let mut rounds = 0;
        while !timer.timed_out() && rounds < self.config.max_rounds {
            rounds += 1;
            for (total, (_, child)) in totals.iter_mut().zip(children.iter()) {
                *total += simulate(child, PlayerId::PlayerSecond, &mut self.rng) as i64;
            }
        }
        counter.iterations += rounds as u64;
        counter.evals += (rounds as u64) * (children.len() as u64);
        debug!(rounds, ?limit, "simulation_tl: rounds completed");
        if rounds == 0 {
            return None;
        }

        let mut best: Option<(Column, i64)> = None;
        for (&total, &(column, _)) in totals.iter().zip(children.iter()) {
            if best.map_or(true, |(_, v)| total > v) {
                best = Some((column, total));
            }
        }
        best
    }
}

impl GameTreeSearch for SimulationSearch {
    fn name(&self) -> &str {
        if self.config.time_limited {
            "simulation_tl"
        } else {
            "simulation"
        }
    }

    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError> {
        let start_time = Instant::now();
        let board = canonical_board(board, player);
        let mut children = Children::new();
        for column in board.available_columns() {
            let (child, _) = board.with_move(column, PlayerId::PlayerFirst)?;
            children.push((column, child));
        }
        match children.len() {
            0 => return Err(SearchError::NoLegalMoves),
            1 => return Ok(SearchResult::new(children[0].0, None, SearchCounter::ZERO)),
            _ => {}
        }

        let mut counter = SearchCounter::ZERO;
        let (column, eval) = if self.config.time_limited {
            match self.time_limited(&children, &mut counter) {
                Some((column, i64::MAX)) => (column, Some(1.0)),
                Some((column, total)) => (column, Some(total as f32 / counter.iterations.max(1) as f32)),
                None => {
                    let column = random_choice(&board, &mut self.rng).ok_or(SearchError::NoLegalMoves)?;
                    (column, None)
                }
            }
        } else {
            let (column, total) = self.fixed_count(&children, &mut counter);
            (column, Some(total as f32 / self.config.simulations as f32))
        };
        counter.states_visited = counter.evals;
        debug!(
            column,
            ?eval,
            "{}: {}",
            self.name(),
            counter.summary(start_time.elapsed().as_nanos())
        );
        Ok(SearchResult::new(column, eval, counter))
    }

    fn on_turn_begin(&mut self, _turn: u32, clock: Option<ClockSnapshot>) {
        self.clock = clock;
    }

    fn reset(&mut self) {
        self.clock = None;
    }
}
