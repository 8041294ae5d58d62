use connect_four_lab::rand::Rng;

use crate::mcts::value::ValueFunction;
use crate::playout::{simulate, simulate_many, DEFAULT_SIMULATIONS};
use crate::*;

/// Scores a node on its first visit, from the point of view of `PlayerFirst`.
pub trait RolloutPolicy {
    fn name(&self) -> &'static str;

    /// Called once when the owning search is constructed.
    fn validate(&self) -> Result<(), SearchError> {
        Ok(())
    }

    fn rollout_score<R: Rng + ?Sized>(&self, board: &Board, color: PlayerId, rng: &mut R) -> f32;
}

/// One random game to the end.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomPlayout;

impl RolloutPolicy for RandomPlayout {
    fn name(&self) -> &'static str {
        "random_playout"
    }

    #[inline]
    fn rollout_score<R: Rng + ?Sized>(&self, board: &Board, color: PlayerId, rng: &mut R) -> f32 {
        simulate(board, color, rng) as f32
    }
}

/// Mean outcome of `simulations` random games.
#[derive(Debug, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationPlayout {
    pub simulations: u32,
    /// Spread the games over the rayon pool.
    pub parallel: bool,
}

impl Default for SimulationPlayout {
    fn default() -> Self {
        Self {
            simulations: DEFAULT_SIMULATIONS,
            parallel: false,
        }
    }
}

impl SimulationPlayout {
    pub fn new(simulations: u32) -> Self {
        Self {
            simulations,
            ..Default::default()
        }
    }
}

impl RolloutPolicy for SimulationPlayout {
    fn name(&self) -> &'static str {
        "simulation_playout"
    }

    fn validate(&self) -> Result<(), SearchError> {
        if self.simulations == 0 {
            return Err(SearchError::BadStrategyImplementation {
                strategy: self.name(),
                reason: "simulation count must be positive",
            });
        }
        Ok(())
    }

    fn rollout_score<R: Rng + ?Sized>(&self, board: &Board, color: PlayerId, rng: &mut R) -> f32 {
        let n = self.simulations.max(1);
        let total = simulate_many(board, color, n, self.parallel, rng);
        (total as f32) / (n as f32)
    }
}

/// Winner sign on decided boards, otherwise the prediction of a value function.
#[derive(Debug, Clone)]
pub struct ValueFunctionRollout<V: ValueFunction> {
    pub model: V,
}

impl<V: ValueFunction> ValueFunctionRollout<V> {
    pub const NAME: &'static str = "value_function";

    pub fn new(model: Option<V>) -> Result<Self, SearchError> {
        let model = model.ok_or(SearchError::MissingEvaluationModel { strategy: Self::NAME })?;
        Ok(Self { model })
    }
}

impl<V: ValueFunction> RolloutPolicy for ValueFunctionRollout<V> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self) -> Result<(), SearchError> {
        let sample = self.model.predict(&Board::new(), PlayerId::PlayerFirst);
        if !sample.is_finite() {
            return Err(SearchError::BadStrategyImplementation {
                strategy: self.name(),
                reason: "value function returned a non-finite score",
            });
        }
        Ok(())
    }

    fn rollout_score<R: Rng + ?Sized>(&self, board: &Board, color: PlayerId, _: &mut R) -> f32 {
        if let Some(winner) = board.winner() {
            return winner.sign() as f32;
        }
        self.model.predict(board, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcts::value::HeuristicValue;
    use connect_four_lab::rng::new_rng;

    #[test]
    fn test_simulation_playout_validation() {
        assert!(SimulationPlayout::default().validate().is_ok());
        assert_eq!(
            Err(SearchError::BadStrategyImplementation {
                strategy: "simulation_playout",
                reason: "simulation count must be positive"
            }),
            SimulationPlayout::new(0).validate()
        );
    }

    #[test]
    fn test_simulation_playout_scores_decided_board() {
        let won = Board::from_moves(&[0, 1, 0, 1, 0, 1, 0], PlayerId::PlayerFirst).unwrap();
        let mut rng = new_rng(Some(5));
        for parallel in [false, true] {
            let p = SimulationPlayout {
                simulations: 10,
                parallel,
            };
            assert_eq!(1.0, p.rollout_score(&won, PlayerId::PlayerSecond, &mut rng));
        }
        let s = SimulationPlayout::new(20).rollout_score(&Board::new(), PlayerId::PlayerFirst, &mut rng);
        assert!((-1.0..=1.0).contains(&s));
    }

    #[test]
    fn test_parallel_playout_is_reproducible() {
        let p = SimulationPlayout {
            simulations: 32,
            parallel: true,
        };
        let board = Board::from_moves(&[3, 3], PlayerId::PlayerFirst).unwrap();
        let a = p.rollout_score(&board, PlayerId::PlayerFirst, &mut new_rng(Some(9)));
        let b = p.rollout_score(&board, PlayerId::PlayerFirst, &mut new_rng(Some(9)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_value_function_rollout() {
        assert_eq!(
            Err(SearchError::MissingEvaluationModel {
                strategy: "value_function"
            }),
            ValueFunctionRollout::<HeuristicValue>::new(None).map(|_| ())
        );

        let nan = ValueFunctionRollout::new(Some(|_: &Board, _: PlayerId| f32::NAN)).unwrap();
        assert!(matches!(
            nan.validate(),
            Err(SearchError::BadStrategyImplementation { .. })
        ));

        let constant = ValueFunctionRollout::new(Some(|_: &Board, _: PlayerId| 0.25)).unwrap();
        assert!(constant.validate().is_ok());
        let mut rng = new_rng(Some(1));
        assert_eq!(0.25, constant.rollout_score(&Board::new(), PlayerId::PlayerFirst, &mut rng));
        let lost = Board::from_moves(&[0, 1, 0, 1, 0, 1, 2, 1], PlayerId::PlayerFirst).unwrap();
        assert_eq!(-1.0, constant.rollout_score(&lost, PlayerId::PlayerFirst, &mut rng));
    }
}
