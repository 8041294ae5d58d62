use instant::Instant;
use std::time::Duration;
use structopt::StructOpt;

use connect_four_lab::prelude::*;
use connect_four_lab_cli_utils::cli_args::{GenericSearch, SearchAlgorithm, SearchConfig, SearchOpts};

mod match_round;

use match_round::{iterate_match, trace_search, BenchmarkError, IterateMatchOpts};

#[derive(Debug, StructOpt, Clone)]
#[structopt(about = "Connect Four game-tree search benchmark")]
pub enum BenchmarkOpts {
    #[structopt(help = "Play out a game between two copies of a strategy, printing every move.")]
    Benchmark {
        #[structopt(long)]
        steps: Option<u32>,
        #[structopt(flatten)]
        search: SearchOpts,
    },
    #[structopt(help = "Evaluate the first move of a position.")]
    Evaluate {
        #[structopt(long)]
        json: bool,
        #[structopt(flatten)]
        search: SearchOpts,
    },
    #[structopt(help = "Measure win rate against a standarized opponent.")]
    Match {
        #[structopt(long)]
        rounds: Option<u32>,

        #[structopt(long, help = "Thinking time of each player for the whole game")]
        game_time_limit_ms: Option<u64>,

        #[structopt(long)]
        json: bool,

        #[structopt(flatten)]
        search: SearchOpts,

        #[structopt(long)]
        standard_algorithm: Option<SearchAlgorithm>,

        #[structopt(long)]
        standard_time_limit_ms: Option<u128>,
    },
}

impl BenchmarkOpts {
    fn search(&self) -> &SearchOpts {
        match self {
            BenchmarkOpts::Benchmark { search, .. } => search,
            BenchmarkOpts::Evaluate { search, .. } => search,
            BenchmarkOpts::Match { search, .. } => search,
        }
    }
}

fn standard_search_opts(algorithm: Option<SearchAlgorithm>, standard_time_limit_ms: Option<u128>) -> SearchConfig {
    SearchConfig {
        algorithm: algorithm.or(Some(SearchAlgorithm::Negamax)),
        search_depth: Some(4),
        tt_size_mb: Some(32),
        simulations: Some(20),
        time_limit_ms: standard_time_limit_ms.or(Some(300)),
        ..Default::default()
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<(), BenchmarkError> {
    init_tracing();
    let opts = BenchmarkOpts::from_args();
    let search_opts = opts.search();
    let (board, to_move) = search_opts.get_position()?;
    let limits = search_opts.get_limits();

    match &opts {
        BenchmarkOpts::Benchmark { steps, .. } => {
            let f = || search_opts.make_search(false, limits);
            let mut searches = ByPlayer::new(f()?, f()?);
            let steps = steps.unwrap_or(MAX_TURNS_POSSIBLE as u32);
            let (dt_ns, c) = trace_search(&board, to_move, &mut searches, steps)?;
            println!();
            println!("{}: {:?} {}", searches.0.name(), c, c.summary(dt_ns));
        }
        BenchmarkOpts::Evaluate { json, .. } => {
            let mut search = search_opts.make_search(false, limits)?;
            let t0 = Instant::now();
            let result = search.search(&board, to_move)?;
            let dt_ns = t0.elapsed().as_nanos();
            if *json {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                println!("{board}");
                println!(
                    "{} ({to_move}): column={} eval={:?} | {} | {:?}",
                    search.name(),
                    result.column,
                    result.eval,
                    result.counter.summary(dt_ns),
                    result.counter
                );
            }
        }
        BenchmarkOpts::Match {
            rounds,
            game_time_limit_ms,
            json,
            standard_algorithm,
            standard_time_limit_ms,
            ..
        } => {
            let standard_opts = standard_search_opts(*standard_algorithm, *standard_time_limit_ms);
            let base_seed = search_opts.seed.unwrap_or_default();
            let make_search = |seed: u64| -> Result<ByPlayer<GenericSearch>, SearchError> {
                Ok(ByPlayer::new(
                    search_opts.search.make_search(false, limits, Some(seed))?,
                    standard_opts.make_search(false, standard_opts.get_limits(), Some(seed.wrapping_add(1)))?,
                ))
            };
            let summary = iterate_match(
                &make_search,
                IterateMatchOpts {
                    rounds: rounds.unwrap_or(100),
                    random_seed: base_seed,
                    time_limit: game_time_limit_ms.map(Duration::from_millis),
                },
            )?;
            if *json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("{summary:?}");
                println!("{}, {}ms", summary.rate, summary.elapsed_ms);
            }
        }
    };

    Ok(())
}
