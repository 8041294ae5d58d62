use std::rc::Rc;

use tracing::debug;

use super::*;

#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeDump<T> {
    #[cfg_attr(feature = "serde", serde(rename = "_"))]
    pub value: T,
    #[cfg_attr(feature = "serde", serde(rename = "children"))]
    pub children: Vec<Rc<TreeDump<T>>>,
}

impl<T> TreeDump<T> {
    pub fn new(value: T, children: Vec<Rc<TreeDump<T>>>) -> Self {
        Self { value, children }
    }
}

impl NodeData {
    fn debug_description(&self, children_count: usize) -> String {
        let column_part = match self.column {
            Some(column) => format!("[{}] {column}", self.color.opposite()),
            None => "[Root]".to_string(),
        };
        format!(
            "{column_part} ({} = {:.3}), #children = {children_count}",
            self.score,
            self.score.value()
        )
    }
}

fn indent_prefix(indent_depth: u8) -> String {
    let mut s = String::new();
    for _ in 0..indent_depth {
        s += "  ";
    }
    s += "- ";
    s
}

impl<R: RolloutPolicy, S: SelectionPolicy> MCTS<R, S> {
    pub fn dump_tree(&self, id: NodeId, max_depth: u8) -> TreeDump<String> {
        if max_depth == 0 {
            return Default::default();
        }

        let children = self.tree.children(id);
        let desc = self.tree.get(id).debug_description(children.len());
        let children = children
            .iter()
            .filter(|(_, child)| self.tree.get(*child).score.visits > 0)
            .map(|&(_, child)| Rc::new(self.dump_tree(child, max_depth - 1)))
            .filter(|child| !(child.children.is_empty() && child.value.is_empty()))
            .collect();
        TreeDump::new(desc, children)
    }

    /// Logs the subtree at `id` down to `max_depth`, folding children with fewer than
    /// `min_visits` visits into a summary line.
    pub fn print_tree(&self, id: NodeId, depth: u8, max_depth: u8, min_visits: u32) {
        if depth > max_depth {
            return;
        }

        let children = self.tree.children(id);
        debug!(
            "{}{}",
            indent_prefix(depth),
            self.tree.get(id).debug_description(children.len())
        );
        let mut omitted_score = Score::default();
        let mut omitted = 0;
        let mut found = false;
        let sorted = children
            .iter()
            .sorted_by(|(_, a), (_, b)| {
                let (a, b) = (self.tree.get(*a).score, self.tree.get(*b).score);
                b.value().total_cmp(&a.value())
            })
            .collect::<SmallVec<[_; COLUMNS]>>();
        for (i, &&(_, child)) in sorted.iter().enumerate() {
            let score = self.tree.get(child).score;
            if score.visits != 0 && (depth == 0 || score.visits >= min_visits || i == 0) {
                found = depth < max_depth;
                self.print_tree(child, depth + 1, max_depth, min_visits);
            } else {
                omitted += 1;
                omitted_score += score;
            }
        }

        if found && omitted > 0 {
            debug!("{}...[{omitted} omitted] ({omitted_score})", indent_prefix(depth + 1));
        }
    }
}
