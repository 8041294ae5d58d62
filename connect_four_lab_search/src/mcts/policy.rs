use super::*;

/// Orientation of node values during selection.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScorePerspective {
    /// Values are always read from the point of view of `PlayerFirst`, at every depth.
    #[default]
    Absolute,
    /// Values are negated at parents where `PlayerSecond` is to move.
    SideToMove,
}

impl ScorePerspective {
    #[inline]
    pub fn orient(self, value: f32, parent_color: PlayerId) -> f32 {
        match self {
            ScorePerspective::Absolute => value,
            ScorePerspective::SideToMove => value * (parent_color.sign() as f32),
        }
    }
}

pub struct SelectionPolicyContext<'a> {
    pub config: &'a MCTSConfig,
    pub parent: &'a NodeData,
}

/// Trait for customizing the MCTS selection policy.
/// In the selection phase of MCTS, the child with the highest score is descended into.
///
/// See also: <https://en.wikipedia.org/wiki/Monte_Carlo_tree_search#Exploration_and_exploitation>
pub trait SelectionPolicy: Send + Sync {
    fn score_child(&self, ctx: &SelectionPolicyContext, child: &NodeData) -> f32;
}

/// `value + 2 * sqrt(ln(parent_visits + 1) / visits)`, infinite for unvisited children so that
/// every child is visited once before any is revisited.
#[derive(Debug, Default, Copy, Clone)]
pub struct UCB1;

pub const UCB1_EXPLORATION: f32 = 2.0;

impl SelectionPolicy for UCB1 {
    fn score_child(&self, ctx: &SelectionPolicyContext, child: &NodeData) -> f32 {
        let n = child.score.visits;
        if n == 0 {
            return f32::INFINITY;
        }
        let ln_parent = (ctx.parent.score.visits as f32).ln_1p();
        let value = ctx.config.perspective.orient(child.score.value(), ctx.parent.color);
        value + UCB1_EXPLORATION * (ln_parent / (n as f32)).sqrt()
    }
}
