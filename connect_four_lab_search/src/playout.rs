use connect_four_lab::rand::prelude::*;
use connect_four_lab::rand::rngs::SmallRng;
use connect_four_lab::rng::new_rng;
#[cfg(not(feature = "no_parallel"))]
use {connect_four_lab::rng::split_seeds, rayon::prelude::*};

use crate::*;

/// Random games per root child or per rollout when not configured.
pub const DEFAULT_SIMULATIONS: u32 = 100;

/// A uniformly random non-full column, `None` when the board is full.
#[inline]
pub fn random_choice<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Column> {
    board.available_columns().choose(rng).copied()
}

/// Plays random moves from `board` with `color` to move until a win or a full board.
///
/// Returns the sign of the winner, or 0 for a draw.
pub fn simulate<R: Rng + ?Sized>(board: &Board, color: PlayerId, rng: &mut R) -> i8 {
    if let Some(winner) = board.winner() {
        return winner.sign();
    }
    let mut board = *board;
    let mut color = color;
    while let Some(column) = random_choice(&board, rng) {
        if board.apply(column, color).is_err() {
            break;
        }
        if let Some(winner) = board.winner() {
            return winner.sign();
        }
        color = color.opposite();
    }
    0
}

/// Sum of `n` simulation outcomes from `board` with `color` to move.
///
/// With `parallel`, every game gets its own generator seeded from `rng`, so the result only
/// depends on the state of `rng`.
pub fn simulate_many<R: Rng + ?Sized>(board: &Board, color: PlayerId, n: u32, parallel: bool, rng: &mut R) -> i64 {
    let no_parallel = cfg!(feature = "no_parallel");
    if !no_parallel && parallel {
        #[cfg(feature = "no_parallel")]
        {
            unreachable!("#[cfg(feature = \"no_parallel\")]")
        }

        #[cfg(not(feature = "no_parallel"))]
        {
            split_seeds(rng, n as usize)
                .into_par_iter()
                .map(|seed| simulate(board, color, &mut new_rng(Some(seed))) as i64)
                .sum()
        }
    } else {
        (0..n).map(|_| simulate(board, color, &mut *rng) as i64).sum()
    }
}

/// Picks a random legal column without searching.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    rng: SmallRng,
}

impl RandomSearch {
    pub fn new(seed: Option<u64>) -> Self {
        Self { rng: new_rng(seed) }
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new(None)
    }
}

impl GameTreeSearch for RandomSearch {
    fn name(&self) -> &str {
        "random"
    }

    fn search(&mut self, board: &Board, _: PlayerId) -> Result<SearchResult, SearchError> {
        let column = random_choice(board, &mut self.rng).ok_or(SearchError::NoLegalMoves)?;
        Ok(SearchResult::new(column, None, SearchCounter::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_choice_skips_full_columns() {
        let mut rng = new_rng(Some(1));
        let full = [PlayerId::PlayerFirst, PlayerId::PlayerSecond].repeat(4)[..ROWS].to_vec();
        let columns: Vec<_> = (0..COLUMNS).map(|c| if c == 3 { vec![] } else { full.clone() }).collect();
        let board = Board::from_columns(&columns).unwrap();
        for _ in 0..20 {
            assert_eq!(Some(3), random_choice(&board, &mut rng));
        }
        let (full_board, _) = board.with_move(3, PlayerId::PlayerFirst).unwrap();
        let mut full_board = full_board;
        while let Some(c) = random_choice(&full_board, &mut rng) {
            full_board.apply(c, PlayerId::PlayerFirst).unwrap();
        }
        assert_eq!(None, random_choice(&full_board, &mut rng));
    }

    #[test]
    fn test_simulate_returns_existing_winner() {
        let mut rng = new_rng(Some(2));
        let board = Board::from_moves(&[0, 1, 0, 1, 0, 1, 0], PlayerId::PlayerFirst).unwrap();
        assert_eq!(1, simulate(&board, PlayerId::PlayerSecond, &mut rng));
    }

    #[test]
    fn test_simulate_outcomes_are_signs() {
        let mut rng = new_rng(Some(3));
        for _ in 0..100 {
            let v = simulate(&Board::new(), PlayerId::PlayerFirst, &mut rng);
            assert!((-1..=1).contains(&v));
        }
    }

    #[test]
    fn test_simulate_many_is_reproducible() {
        let board = Board::from_moves(&[3, 3, 4], PlayerId::PlayerFirst).unwrap();
        for parallel in [false, true] {
            let a = simulate_many(&board, PlayerId::PlayerSecond, 40, parallel, &mut new_rng(Some(8)));
            let b = simulate_many(&board, PlayerId::PlayerSecond, 40, parallel, &mut new_rng(Some(8)));
            assert_eq!(a, b);
            assert!(a.abs() <= 40);
        }
    }

    #[test]
    fn test_random_search_fails_on_full_board() {
        let full = [PlayerId::PlayerFirst, PlayerId::PlayerSecond].repeat(4)[..ROWS].to_vec();
        let board = Board::from_columns(&vec![full; COLUMNS]).unwrap();
        let mut agent = RandomSearch::new(Some(4));
        assert_eq!(Err(SearchError::NoLegalMoves), agent.choose_move(&board, PlayerId::PlayerFirst));
    }
}
