//! Arena storage for the search tree.
//!
//! Nodes live in a contiguous Vec and are referenced by `NodeId` indices. A node reached
//! through different move orders is stored once, so a node may be the child of several
//! parents. `parent` is always the node that allocated it; backpropagation climbs these links.

use connect_four_lab::smallvec::SmallVec;

use crate::mcts::score::Score;
use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct NodeData {
    pub board: Board,
    /// Side to move on `board`.
    pub color: PlayerId,
    /// Column played by the parent to reach this node. `None` at the root.
    pub column: Option<Column>,
    /// Node that allocated this one. `None` at the root.
    pub parent: Option<NodeId>,
    pub score: Score,
    /// `None` until expanded.
    pub children: Option<SmallVec<[(Column, NodeId); COLUMNS]>>,
}

impl NodeData {
    #[inline]
    pub fn new(board: Board, color: PlayerId, column: Option<Column>, parent: Option<NodeId>) -> Self {
        Self {
            board,
            color,
            column,
            parent,
            score: Score::default(),
            children: None,
        }
    }

    /// Winner sign for won boards, 0 for full boards, `None` while the game goes on.
    pub fn terminal_score(&self) -> Option<f32> {
        if let Some(winner) = self.board.winner() {
            return Some(winner.sign() as f32);
        }
        self.board.is_full().then_some(0.0)
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.children.is_some()
    }
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Tree {
    pub fn new(board: Board, color: PlayerId) -> Self {
        Self {
            nodes: vec![NodeData::new(board, color, None, None)],
            root: NodeId(0),
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0 as usize]
    }

    pub fn allocate(&mut self, node: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` followed by its parent links up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |&id| self.get(id).parent)
    }

    /// Children of an expanded node, empty otherwise.
    pub fn children(&self, id: NodeId) -> &[(Column, NodeId)] {
        self.get(id).children.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_children() {
        let mut tree = Tree::new(Board::new(), PlayerId::PlayerFirst);
        let root = tree.root();
        assert_eq!(1, tree.len());
        assert!(tree.children(root).is_empty());

        let (board, _) = Board::new().with_move(3, PlayerId::PlayerFirst).unwrap();
        let child = tree.allocate(NodeData::new(board, PlayerId::PlayerSecond, Some(3), Some(root)));
        tree.get_mut(root).children = Some([(3, child)].into_iter().collect());
        assert_eq!(&[(3, child)], tree.children(root));
        assert!(tree.get(root).is_expanded());
        assert!(!tree.get(child).is_expanded());
        assert_eq!(Some(root), tree.get(child).parent);
        assert_eq!(None, tree.get(root).parent);
    }

    #[test]
    fn test_shared_child_under_two_parents() {
        let mut tree = Tree::new(Board::new(), PlayerId::PlayerFirst);
        let moves = |m: &[Column]| Board::from_moves(m, PlayerId::PlayerFirst).unwrap();
        let a = tree.allocate(NodeData::new(moves(&[0, 1]), PlayerId::PlayerFirst, Some(1), None));
        let b = tree.allocate(NodeData::new(moves(&[2, 1]), PlayerId::PlayerFirst, Some(1), None));
        let shared = tree.allocate(NodeData::new(moves(&[0, 1, 2]), PlayerId::PlayerSecond, Some(2), Some(a)));
        tree.get_mut(a).children = Some([(2, shared)].into_iter().collect());
        tree.get_mut(b).children = Some([(0, shared)].into_iter().collect());
        assert_eq!(shared, tree.children(a)[0].1);
        assert_eq!(shared, tree.children(b)[0].1);
        assert_eq!(4, tree.len());
        assert_eq!(Some(a), tree.get(shared).parent);
    }

    #[test]
    fn test_ancestors_climb_to_root() {
        let mut tree = Tree::new(Board::new(), PlayerId::PlayerFirst);
        let root = tree.root();
        let moves = |m: &[Column]| Board::from_moves(m, PlayerId::PlayerFirst).unwrap();
        let a = tree.allocate(NodeData::new(moves(&[3]), PlayerId::PlayerSecond, Some(3), Some(root)));
        let b = tree.allocate(NodeData::new(moves(&[3, 4]), PlayerId::PlayerFirst, Some(4), Some(a)));
        assert_eq!(vec![b, a, root], tree.ancestors(b).collect::<Vec<_>>());
        assert_eq!(vec![root], tree.ancestors(root).collect::<Vec<_>>());
    }

    #[test]
    fn test_terminal_score() {
        let won = Board::from_moves(&[0, 1, 0, 1, 0, 1, 0], PlayerId::PlayerSecond).unwrap();
        let node = NodeData::new(won, PlayerId::PlayerFirst, Some(0), None);
        assert_eq!(Some(-1.0), node.terminal_score());
        let node = NodeData::new(Board::new(), PlayerId::PlayerFirst, None, None);
        assert_eq!(None, node.terminal_score());
    }
}
