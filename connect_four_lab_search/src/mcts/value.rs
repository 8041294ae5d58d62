use crate::*;

/// Learned or hand-written evaluation of a position, from the point of view of `PlayerFirst`.
///
/// Predictions are expected in `[-1, 1]` and must be finite.
pub trait ValueFunction: Send + Sync {
    fn predict(&self, board: &Board, side: PlayerId) -> f32;
}

impl<F: Fn(&Board, PlayerId) -> f32 + Send + Sync> ValueFunction for F {
    #[inline]
    fn predict(&self, board: &Board, side: PlayerId) -> f32 {
        self(board, side)
    }
}

const WINDOW_DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
/// Weight of a window holding 1, 2 or 3 pieces of a single player.
const WINDOW_WEIGHTS: [f32; 4] = [0.0, 1.0, 4.0, 16.0];
const TEMPO_BONUS: f32 = 2.0;
const SCALE: f32 = 64.0;

/// Hand-written evaluation counting open windows of four cells.
///
/// Each window containing pieces of only one player adds a weight growing with the number of
/// pieces, positive for `PlayerFirst`. The total is squashed with `tanh`.
#[derive(Debug, Default, Copy, Clone)]
pub struct HeuristicValue;

impl HeuristicValue {
    fn window(board: &Board, column: usize, row: usize, (dc, dr): (isize, isize)) -> Option<f32> {
        let mut counts = [0usize; 2];
        for k in 0..4isize {
            let c = column as isize + k * dc;
            let r = row as isize + k * dr;
            if !(0..COLUMNS as isize).contains(&c) || !(0..ROWS as isize).contains(&r) {
                return None;
            }
            if let Some(p) = board.cell(c as usize, r as usize) {
                counts[p.index()] += 1;
            }
        }
        match counts {
            [n, 0] => Some(WINDOW_WEIGHTS[n.min(3)]),
            [0, n] => Some(-WINDOW_WEIGHTS[n.min(3)]),
            _ => Some(0.0),
        }
    }

    pub fn raw_score(board: &Board, side: PlayerId) -> f32 {
        let mut score = 0.0;
        for column in 0..COLUMNS {
            for row in 0..ROWS {
                for d in WINDOW_DIRECTIONS {
                    score += Self::window(board, column, row, d).unwrap_or_default();
                }
            }
        }
        score + TEMPO_BONUS * (side.sign() as f32)
    }
}

impl ValueFunction for HeuristicValue {
    fn predict(&self, board: &Board, side: PlayerId) -> f32 {
        if let Some(winner) = board.winner() {
            return winner.sign() as f32;
        }
        (Self::raw_score(board, side) / SCALE).tanh()
    }
}
