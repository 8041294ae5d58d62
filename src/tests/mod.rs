use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::prelude::*;

pub mod board;



#[cfg(feature = "serde")]
pub mod serialization;

pub mod prop_tests;

/// Panics: If any of the moves is invalid.
fn board_from_moves(moves: &[Column]) -> Board {
    Board::from_moves(moves, PlayerId::PlayerFirst).unwrap()
}

/// Plays a uniformly random legal column.
struct RandomAgent {
    rng: SmallRng,
}

impl RandomAgent {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl GameTreeSearch for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn search(&mut self, board: &Board, _: PlayerId) -> Result<SearchResult, SearchError> {
        let columns = board.available_columns();
        let column = *columns.choose(&mut self.rng).ok_or(SearchError::NoLegalMoves)?;
        Ok(SearchResult::new(column, None, SearchCounter::ZERO))
    }
}

/// Always plays the same column, legal or not.
struct StubbornAgent(Column);

impl GameTreeSearch for StubbornAgent {
    fn name(&self) -> &str {
        "stubborn"
    }

    fn search(&mut self, _: &Board, _: PlayerId) -> Result<SearchResult, SearchError> {
        Ok(SearchResult::new(self.0, None, SearchCounter::ZERO))
    }
}
