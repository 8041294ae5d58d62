use std::{str::FromStr, time::Duration};
use structopt::StructOpt;

use connect_four_lab::prelude::*;
use connect_four_lab_search::{
    mcts::{
        policy::ScorePerspective,
        rollout::{RandomPlayout, SimulationPlayout, ValueFunctionRollout},
        value::HeuristicValue,
        MCTSConfig, MCTS,
    },
    negamax::{search::DEFAULT_DEPTH, transposition_table::DEFAULT_SIZE_MB, NegamaxConfig, NegamaxSearch},
    playout::RandomSearch,
    simulation::{SimulationConfig, SimulationSearch, DEFAULT_MAX_ROUNDS, DEFAULT_SIMULATIONS},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchAlgorithm {
    Negamax,
    MCTS,
    MCTSValue,
    Simulation,
    SimulationTL,
    Random,
}

impl FromStr for SearchAlgorithm {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "negamax" => Ok(Self::Negamax),
            "mcts" => Ok(Self::MCTS),
            "mcts-value" => Ok(Self::MCTSValue),
            "simulation" => Ok(Self::Simulation),
            "simulation-tl" => Ok(Self::SimulationTL),
            "random" => Ok(Self::Random),
            _ => Err("expected negamax|mcts|mcts-value|simulation|simulation-tl|random"),
        }
    }
}

#[derive(Debug, StructOpt, Clone, Default)]
pub struct SearchConfig {
    #[structopt(
        short = "A",
        long = "--algorithm",
        help = "negamax|mcts|mcts-value|simulation|simulation-tl|random: strategy used to choose moves."
    )]
    pub algorithm: Option<SearchAlgorithm>,

    #[structopt(short = "d", long = "--depth", help = "Negamax: search depth")]
    pub search_depth: Option<u8>,

    #[structopt(long = "--tt-size-mb", help = "Negamax: transposition table size")]
    pub tt_size_mb: Option<usize>,

    #[structopt(
        short = "I",
        long = "--simulations",
        help = "MCTS/Simulation: random games per rollout or per root child. MCTS plays a single game when omitted."
    )]
    pub simulations: Option<u32>,

    #[structopt(long = "--max-rounds", help = "Time-limited simulation: max rounds per move")]
    pub max_rounds: Option<u32>,

    #[structopt(
        long = "--side-to-move",
        help = "MCTS: read child values from the point of view of the player choosing between them"
    )]
    pub side_to_move: bool,

    #[structopt(
        long = "--budget-cap-ms",
        help = "MCTS/Time-limited simulation: upper bound on the thinking time of a single move"
    )]
    pub budget_cap_ms: Option<u64>,

    #[structopt(long = "--parallel", help = "Simulation: run random games on the rayon pool")]
    pub parallel: bool,

    #[structopt(
        short = "T",
        long = "--time-limit-ms",
        help = "Set time limit per move in milliseconds"
    )]
    pub time_limit_ms: Option<u128>,

    #[structopt(short = "P", long = "--max-positions", help = "Max positions (MCTS: iterations) to search")]
    pub max_positions: Option<u64>,

    #[structopt(short = "D", long = "--debug", help = "Print debug info")]
    pub debug: bool,
}

#[derive(Debug, StructOpt, Clone)]
pub struct SearchOpts {
    #[structopt(short = "S", long = "--seed", help = "Random seed for the strategies")]
    pub seed: Option<u64>,

    #[structopt(
        short = "m",
        long = "--moves",
        help = "Opening moves as column digits, PlayerFirst moving first (e.g. 3324)"
    )]
    pub moves: Option<String>,

    #[structopt(flatten)]
    pub search: SearchConfig,
}

/// Every strategy selectable from the command line.
#[derive(Debug)]
pub enum GenericSearch {
    Negamax(NegamaxSearch),
    MCTS(MCTS<RandomPlayout>),
    MCTSSimulation(MCTS<SimulationPlayout>),
    MCTSValue(MCTS<ValueFunctionRollout<HeuristicValue>>),
    Simulation(SimulationSearch),
    Random(RandomSearch),
}

macro_rules! dispatch {
    ($self: expr, $s: ident => $e: expr) => {
        match $self {
            GenericSearch::Negamax($s) => $e,
            GenericSearch::MCTS($s) => $e,
            GenericSearch::MCTSSimulation($s) => $e,
            GenericSearch::MCTSValue($s) => $e,
            GenericSearch::Simulation($s) => $e,
            GenericSearch::Random($s) => $e,
        }
    };
}

impl GameTreeSearch for GenericSearch {
    fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    fn search(&mut self, board: &Board, player: PlayerId) -> Result<SearchResult, SearchError> {
        dispatch!(self, s => s.search(board, player))
    }

    fn on_turn_begin(&mut self, turn: u32, clock: Option<ClockSnapshot>) {
        dispatch!(self, s => s.on_turn_begin(turn, clock))
    }

    fn reset(&mut self) {
        dispatch!(self, s => s.reset())
    }
}

impl SearchConfig {
    pub fn make_search(
        &self,
        parallel: bool,
        limits: Option<SearchLimits>,
        seed: Option<u64>,
    ) -> Result<GenericSearch, SearchError> {
        let parallel = parallel || self.parallel;
        let search = match self.algorithm.unwrap_or(SearchAlgorithm::Negamax) {
            SearchAlgorithm::Negamax => {
                let config = NegamaxConfig {
                    depth: self.search_depth.unwrap_or(DEFAULT_DEPTH),
                    tt_size_mb: self.tt_size_mb.unwrap_or(DEFAULT_SIZE_MB),
                    seed,
                    limits,
                };
                GenericSearch::Negamax(NegamaxSearch::new(config))
            }
            SearchAlgorithm::MCTS => {
                let config = self.get_mcts_config(limits, seed);
                match self.simulations {
                    None | Some(1) => GenericSearch::MCTS(MCTS::new(config, RandomPlayout)?),
                    Some(n) => {
                        let rollout = SimulationPlayout { simulations: n, parallel };
                        GenericSearch::MCTSSimulation(MCTS::new(config, rollout)?)
                    }
                }
            }
            SearchAlgorithm::MCTSValue => {
                let config = self.get_mcts_config(limits, seed);
                let rollout = ValueFunctionRollout::new(Some(HeuristicValue))?;
                GenericSearch::MCTSValue(MCTS::new(config, rollout)?)
            }
            algorithm @ (SearchAlgorithm::Simulation | SearchAlgorithm::SimulationTL) => {
                let defaults = SimulationConfig::default();
                let config = SimulationConfig {
                    simulations: self.simulations.unwrap_or(DEFAULT_SIMULATIONS),
                    time_limited: algorithm == SearchAlgorithm::SimulationTL,
                    budget: self.get_budget(defaults.budget),
                    max_rounds: self.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS),
                    seed,
                    parallel,
                };
                GenericSearch::Simulation(SimulationSearch::new(config)?)
            }
            SearchAlgorithm::Random => GenericSearch::Random(RandomSearch::new(seed)),
        };
        Ok(search)
    }

    pub fn get_limits(&self) -> Option<SearchLimits> {
        if self.time_limit_ms.is_none() && self.max_positions.is_none() {
            return None;
        }
        Some(SearchLimits {
            max_time_ms: self.time_limit_ms,
            max_positions: self.max_positions,
        })
    }

    pub fn get_mcts_config(&self, limits: Option<SearchLimits>, seed: Option<u64>) -> MCTSConfig {
        let defaults = MCTSConfig::default();
        MCTSConfig {
            limits,
            seed,
            perspective: if self.side_to_move {
                ScorePerspective::SideToMove
            } else {
                ScorePerspective::Absolute
            },
            budget: self.get_budget(defaults.budget),
            debug: self.debug,
        }
    }

    fn get_budget(&self, budget: TimeBudget) -> TimeBudget {
        match self.budget_cap_ms {
            Some(ms) => budget.with_max_cap(Duration::from_millis(ms)),
            None => budget,
        }
    }
}

impl SearchOpts {
    pub fn make_search(&self, parallel: bool, limits: Option<SearchLimits>) -> Result<GenericSearch, SearchError> {
        self.search.make_search(parallel, limits, self.seed)
    }

    pub fn get_limits(&self) -> Option<SearchLimits> {
        self.search.get_limits()
    }

    /// The position after `--moves` and the player to move in it.
    pub fn get_position(&self) -> Result<(Board, PlayerId), BoardError> {
        let moves = parse_moves(self.moves.as_deref().unwrap_or_default())?;
        let board = Board::from_moves(&moves, PlayerId::PlayerFirst)?;
        Ok((board, board.to_move(PlayerId::PlayerFirst)))
    }
}

/// Parses a string of column digits, ignoring separators.
pub fn parse_moves(s: &str) -> Result<Vec<Column>, BoardError> {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| match c.to_digit(10) {
            Some(d) if (d as usize) < COLUMNS => Ok(d as usize),
            Some(d) => Err(BoardError::out_of_range(d as usize)),
            None => Err(BoardError::out_of_range(COLUMNS)),
        })
        .collect()
}
