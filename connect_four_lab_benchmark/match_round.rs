use rayon::prelude::*;
use serde::Serialize;
use std::{
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};
use instant::Instant;
use tracing::info;

use connect_four_lab::{prelude::*, rng::new_rng};

#[derive(Debug, thiserror::Error)]
pub enum BenchmarkError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Plays out `board` with both agents, printing every move with its counters.
pub fn trace_search<T: GameTreeSearch>(
    board: &Board,
    to_move: PlayerId,
    searches: &mut ByPlayer<T>,
    steps: u32,
) -> Result<(u128, SearchCounter), MatchError> {
    let mut board = *board;
    let mut p = to_move;
    let mut total_counter = SearchCounter::default();
    let mut total_time: u128 = 0;
    for i in 0..steps {
        if let Some(winner) = board.winner() {
            println!("Winner: {winner}");
            break;
        }
        if board.is_full() {
            println!("Tie");
            break;
        }
        let t1 = Instant::now();
        let SearchResult {
            column,
            eval: v,
            counter: c,
        } = searches[p]
            .search(&board, p)
            .map_err(|source| MatchError::Search { player: p, source })?;
        let dt_ns = t1.elapsed().as_nanos();
        total_counter.add_in_place(&c);
        total_time += dt_ns;
        board
            .apply(column, p)
            .map_err(|BoardError::InvalidMove { column, reason }| MatchError::InvalidMove {
                player: p,
                column,
                reason,
            })?;
        println!("--> {i:2} {p} {column} | {v:?} | {} | {c:?}", c.summary(dt_ns));
        p = p.opposite();
    }
    println!("{board}");
    Ok((total_time, total_counter))
}

#[derive(Debug, Clone, Copy)]
pub struct IterateMatchOpts {
    pub rounds: u32,
    pub random_seed: u64,
    pub time_limit: Option<Duration>,
}

/// Results of the tested agent over all rounds. Wins count 2, draws 1.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub struct MatchSummary {
    pub rounds: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    /// Games decided on time, either way.
    pub timeouts: u32,
    pub score: i32,
    pub rate: f32,
    pub elapsed_ms: u128,
}

/// Plays `rounds` matches on the rayon pool. The tested agent (seat 0 of `make_search`) moves
/// second in odd rounds and first in even rounds.
pub fn iterate_match<T, M>(make_search: &M, opts: IterateMatchOpts) -> Result<MatchSummary, BenchmarkError>
where
    T: GameTreeSearch,
    M: Send + Sync + Fn(u64) -> Result<ByPlayer<T>, SearchError>,
{
    let IterateMatchOpts {
        rounds,
        random_seed,
        time_limit,
    } = opts;
    let config = MatchConfig {
        first_player_randomized: false,
        time_limit,
    };
    let t0 = Instant::now();
    let matches_started = AtomicU32::default();
    let results = (0..rounds)
        .into_par_iter()
        .map(|_| -> Result<(i32, GameStatus), BenchmarkError> {
            let i = matches_started.fetch_add(1, Ordering::SeqCst);
            let flip = i % 2 == 0;
            let seed = random_seed.wrapping_add(2).wrapping_mul(i as u64 + 1);
            let mut search = make_search(seed)?;
            if flip {
                search.swap();
            }

            println!("+ Round {:3}", i + 1);
            let outcome = run_match(
                ByPlayer::<&mut dyn GameTreeSearch>::new(&mut search.0, &mut search.1),
                &config,
                &mut new_rng(Some(seed)),
            )?;
            let (winner_str, d_score) = get_winner_value(outcome.winner(), flip);
            println!(
                "- Round {:3} ... {winner_str} turns={:2} status={:?}",
                i + 1,
                outcome.turns(),
                outcome.status
            );
            Ok((d_score, outcome.status))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = MatchSummary {
        rounds,
        ..Default::default()
    };
    for (d_score, status) in results {
        summary.score += d_score;
        match d_score {
            2 => summary.wins += 1,
            1 => summary.draws += 1,
            _ => summary.losses += 1,
        }
        if matches!(status, GameStatus::Timeout { .. }) {
            summary.timeouts += 1;
        }
    }
    summary.rate = (summary.score as f32) / ((2 * rounds.max(1)) as f32);
    summary.elapsed_ms = t0.elapsed().as_millis();
    info!(?summary, "match rounds done");
    Ok(summary)
}

pub fn get_winner_value(winner: Option<PlayerId>, flip: bool) -> (&'static str, i32) {
    match winner {
        Some(PlayerId::PlayerFirst) => {
            if flip {
                ("0-1", 0)
            } else {
                ("1-0", 2)
            }
        }
        Some(PlayerId::PlayerSecond) => {
            if flip {
                ("1-0", 2)
            } else {
                ("0-1", 0)
            }
        }
        None => ("1/2", 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_winner_value_follows_seat_flip() {
        assert_eq!(("1-0", 2), get_winner_value(Some(PlayerId::PlayerFirst), false));
        assert_eq!(("0-1", 0), get_winner_value(Some(PlayerId::PlayerFirst), true));
        assert_eq!(("0-1", 0), get_winner_value(Some(PlayerId::PlayerSecond), false));
        assert_eq!(("1-0", 2), get_winner_value(Some(PlayerId::PlayerSecond), true));
        assert_eq!(("1/2", 1), get_winner_value(None, false));
        assert_eq!(("1/2", 1), get_winner_value(None, true));
    }
}
