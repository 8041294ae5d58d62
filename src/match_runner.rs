use std::fmt::Display;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::error::{BoardError, MatchError};
use crate::game_tree_search::GameTreeSearch;
use crate::timer::{to_hms, GameClock};
use crate::types::board::{Board, Column, MAX_TURNS_POSSIBLE};
use crate::types::by_player::ByPlayer;
use crate::types::player_id::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchConfig {
    /// Pick the first mover at random instead of always `PlayerFirst`.
    pub first_player_randomized: bool,
    /// Total thinking time of each player. `None` for untimed matches.
    pub time_limit: Option<Duration>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            first_player_randomized: true,
            time_limit: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameStatus {
    Winner(PlayerId),
    Tie,
    Timeout { loser: PlayerId },
}

/// One played turn: who moved, the board before the move and the chosen column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    pub player: PlayerId,
    pub board: Board,
    pub column: Column,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub status: GameStatus,
    pub board: Board,
    pub history: Vec<TurnRecord>,
    pub first_player: PlayerId,
    /// Thinking time used by each player.
    pub elapsed: ByPlayer<Duration>,
    pub names: ByPlayer<String>,
}

impl MatchOutcome {
    /// The player who won on the board or on time.
    pub fn winner(&self) -> Option<PlayerId> {
        match self.status {
            GameStatus::Winner(p) => Some(p),
            GameStatus::Timeout { loser } => Some(loser.opposite()),
            GameStatus::Tie => None,
        }
    }

    #[inline]
    pub fn turns(&self) -> usize {
        self.history.len()
    }
}

impl Display for MatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "Turns: {}", self.turns())?;
        for p in PlayerId::VALUES {
            let (h, m, s) = to_hms(self.elapsed[p]);
            let first = if p == self.first_player { " (first)" } else { "" };
            writeln!(
                f,
                "{p} [{}] {}{first}: {h:02}:{m:02}:{s:02}",
                p.symbol(),
                self.names[p]
            )?;
        }
        match self.status {
            GameStatus::Winner(p) => write!(f, "Winner: {p} {}", self.names[p]),
            GameStatus::Tie => write!(f, "Tie"),
            GameStatus::Timeout { loser } => write!(
                f,
                "Timeout: {loser} {} ran out of time, {} wins",
                self.names[loser],
                loser.opposite()
            ),
        }
    }
}

/// Plays one match between two agents seated as `PlayerFirst` and `PlayerSecond`.
///
/// Both agents are reset before the first turn. An agent choosing an out-of-range or full
/// column ends the match with `MatchError::InvalidMove`.
pub fn run_match<R: Rng + ?Sized>(
    mut players: ByPlayer<&mut dyn GameTreeSearch>,
    config: &MatchConfig,
    rng: &mut R,
) -> Result<MatchOutcome, MatchError> {
    for p in PlayerId::VALUES {
        players[p].reset();
    }
    let names = ByPlayer::generate(|p| players[p].name().to_string());
    let mut clocks = ByPlayer::generate(|_| GameClock::new(config.time_limit));

    let first_player = if config.first_player_randomized && rng.gen_bool(0.5) {
        PlayerId::PlayerSecond
    } else {
        PlayerId::PlayerFirst
    };
    debug!(%first_player, p1 = %names.0, p2 = %names.1, "match start");

    let mut board = Board::new();
    let mut history = Vec::with_capacity(MAX_TURNS_POSSIBLE);
    let mut playing = first_player;
    let mut status = GameStatus::Tie;

    for i in 0..MAX_TURNS_POSSIBLE {
        let turn = (i + 1) as u32;
        let clock = &mut clocks[playing];
        let agent = &mut players[playing];

        clock.chrono.start();
        agent.on_turn_begin(turn, clock.snapshot(turn));
        let choice = agent.choose_move(&board, playing);
        clock.chrono.stop();

        if clock.expired() {
            debug!(turn, loser = %playing, "timeout");
            status = GameStatus::Timeout { loser: playing };
            break;
        }

        let column = choice.map_err(|source| MatchError::Search {
            player: playing,
            source,
        })?;
        let before = board;
        board
            .apply(column, playing)
            .map_err(|BoardError::InvalidMove { column, reason }| MatchError::InvalidMove {
                player: playing,
                column,
                reason,
            })?;
        history.push(TurnRecord {
            player: playing,
            board: before,
            column,
        });
        debug!(turn, player = %playing, column, "move");

        if let Some(winner) = board.winner() {
            status = GameStatus::Winner(winner);
            break;
        }
        playing = playing.opposite();
    }

    let outcome = MatchOutcome {
        status,
        board,
        history,
        first_player,
        elapsed: clocks.map(|c| c.elapsed()),
        names,
    };
    info!(status = ?outcome.status, turns = outcome.turns(), "match end");
    Ok(outcome)
}
