use std::{
    fmt::Display,
    ops::{Add, AddAssign},
};

/// Accumulated rollout scores and visit count of a node.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Score {
    pub total: f32,
    pub visits: u32,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:.2}/{}", self.total, self.visits))
    }
}

impl Score {
    #[inline]
    pub fn new(total: f32, visits: u32) -> Self {
        Self { total, visits }
    }

    /// A single visit scoring `score`.
    #[inline]
    pub fn single(score: f32) -> Self {
        Self::new(score, 1)
    }

    /// Mean score, 0 when unvisited.
    #[inline]
    pub fn value(self) -> f32 {
        if self.visits == 0 {
            return 0.0;
        }
        self.total / (self.visits as f32)
    }
}

impl Add for Score {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.total + rhs.total, self.visits + rhs.visits)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.visits += rhs.visits;
    }
}

impl From<(f32, u32)> for Score {
    #[inline]
    fn from(value: (f32, u32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_unvisited_value_is_zero() {
        assert_eq!(0.0, Score::default().value());
        assert_eq!(-0.5, Score::new(-1.0, 2).value());
    }

    prop_compose! {
        fn arb_scores()(scores in prop::collection::vec(-1.0f32..=1.0, 1..50)) -> Vec<f32> {
            scores
        }
    }

    proptest! {
        #[test]
        fn test_value_stays_within_score_range(scores in arb_scores()) {
            let mut s = Score::default();
            for &x in &scores {
                s += Score::single(x);
            }
            assert_eq!(scores.len() as u32, s.visits);
            let v = s.value();
            assert!((-1.0 - 1e-4..=1.0 + 1e-4).contains(&v));
        }
    }
}
