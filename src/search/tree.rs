//! Arena-allocated MCTS tree.
//!
//! Nodes live in a single `Vec` owned by the [`Tree`] and refer to each other
//! by index. The parent index is a plain back-reference and never keeps a node
//! alive: the whole tree is dropped at once when the search is over.

use std::fmt;

use crate::hex::core::Cell;
use crate::search::SearchError;

pub(super) type NodeIndex = usize;

/// Policy for picking the move to play among the root's children once the
/// search budget is exhausted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Highest win rate.
    Max,
    /// Most visits, ties broken by the higher win rate.
    #[default]
    Robust,
    /// Both the most visits and the most wins. Fails with
    /// [`SearchError::NoMaximalChild`] when no child satisfies both.
    MaxRobust,
    /// Highest lower confidence bound on the win rate.
    Secure,
}

impl TryFrom<&str> for SelectionPolicy {
    type Error = anyhow::Error;

    fn try_from(policy: &str) -> anyhow::Result<Self> {
        match policy.to_ascii_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "robust" => Ok(Self::Robust),
            "max-robust" | "maxrobust" => Ok(Self::MaxRobust),
            "secure" => Ok(Self::Secure),
            _ => anyhow::bail!(
                "selection policy should be max, robust, max-robust or secure, got '{policy}'"
            ),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Max => "max",
            Self::Robust => "robust",
            Self::MaxRobust => "max-robust",
            Self::Secure => "secure",
        })
    }
}

/// Weight of the uncertainty term in [`SelectionPolicy::Secure`].
const SECURE_CONFIDENCE: f64 = 1.0;

pub(super) struct Node {
    /// Move leading to this node, `None` for the root.
    cell: Option<Cell>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    /// Number of iterations that went through this node.
    visits: u32,
    /// Number of those iterations won by the agent the tree is built for,
    /// regardless of which colour moves at this node.
    wins: u32,
    /// Moves not expanded yet, in random order.
    untried: Vec<Cell>,
}

impl Node {
    fn new(cell: Option<Cell>, parent: Option<NodeIndex>, untried: Vec<Cell>) -> Self {
        Self {
            cell,
            parent,
            children: Vec::new(),
            visits: 0,
            wins: 0,
            untried,
        }
    }

    pub(super) const fn cell(&self) -> Option<Cell> {
        self.cell
    }

    pub(super) const fn visits(&self) -> u32 {
        self.visits
    }

    pub(super) fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.visits)
        }
    }

    /// UCT score of the node as seen from its parent.
    fn uct(&self, parent_visits_ln: f64, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = f64::from(self.visits);
        exploration.mul_add((2.0 * parent_visits_ln / visits).sqrt(), self.win_rate())
    }

    fn lower_bound(&self) -> f64 {
        if self.visits == 0 {
            return f64::NEG_INFINITY;
        }
        self.win_rate() - SECURE_CONFIDENCE / f64::from(self.visits).sqrt()
    }
}

pub(super) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(super) const ROOT: NodeIndex = 0;

    /// Creates a tree with an unexpanded root.
    pub(super) fn new(untried: Vec<Cell>) -> Self {
        Self {
            nodes: vec![Node::new(None, None, untried)],
        }
    }

    pub(super) fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(super) fn is_fully_expanded(&self, index: NodeIndex) -> bool {
        self.nodes[index].untried.is_empty()
    }

    /// Takes the next move to expand out of the node's untried moves.
    pub(super) fn pop_untried(&mut self, index: NodeIndex) -> Option<Cell> {
        self.nodes[index].untried.pop()
    }

    /// Adds a child reached by playing `cell` from `parent`.
    pub(super) fn expand(
        &mut self,
        parent: NodeIndex,
        cell: Cell,
        untried: Vec<Cell>,
    ) -> NodeIndex {
        let child = self.nodes.len();
        self.nodes.push(Node::new(Some(cell), Some(parent), untried));
        self.nodes[parent].children.push(child);
        child
    }

    /// Child maximizing the UCT score. Ties go to the child expanded first.
    pub(super) fn select_child(&self, index: NodeIndex, exploration: f64) -> Option<NodeIndex> {
        let node = &self.nodes[index];
        let parent_visits_ln = f64::from(node.visits.max(1)).ln();
        let mut best: Option<(NodeIndex, f64)> = None;
        for &child in &node.children {
            let score = self.nodes[child].uct(parent_visits_ln, exploration);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child, score));
            }
        }
        best.map(|(child, _)| child)
    }

    /// Records the playout result on every node from `leaf` up to the root.
    pub(super) fn backpropagate(&mut self, leaf: NodeIndex, won: bool) {
        let mut current = Some(leaf);
        while let Some(index) = current {
            let node = &mut self.nodes[index];
            node.visits += 1;
            if won {
                node.wins += 1;
            }
            current = node.parent;
        }
    }

    /// Picks the root child to play according to the policy.
    pub(super) fn best_child(&self, policy: SelectionPolicy) -> Result<NodeIndex, SearchError> {
        let children = &self.nodes[Self::ROOT].children;
        if children.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        let node = |index: NodeIndex| &self.nodes[index];
        let best_by = |better: &dyn Fn(&Node, &Node) -> bool| {
            let mut best = children[0];
            for &child in &children[1..] {
                if better(node(child), node(best)) {
                    best = child;
                }
            }
            best
        };
        match policy {
            SelectionPolicy::Max => Ok(best_by(&|lhs, rhs| lhs.win_rate() > rhs.win_rate())),
            SelectionPolicy::Robust => Ok(best_by(&|lhs, rhs| {
                lhs.visits > rhs.visits
                    || (lhs.visits == rhs.visits && lhs.win_rate() > rhs.win_rate())
            })),
            SelectionPolicy::MaxRobust => {
                let most_visits = children.iter().map(|&child| node(child).visits).max();
                let most_wins = children.iter().map(|&child| node(child).wins).max();
                children
                    .iter()
                    .copied()
                    .find(|&child| {
                        Some(node(child).visits) == most_visits && Some(node(child).wins) == most_wins
                    })
                    .ok_or(SearchError::NoMaximalChild)
            },
            SelectionPolicy::Secure => {
                Ok(best_by(&|lhs, rhs| lhs.lower_bound() > rhs.lower_bound()))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Root with three children with given (visits, wins) statistics.
    fn tree(stats: &[(u32, u32)]) -> Tree {
        let mut tree = Tree::new(Vec::new());
        for (column, &(visits, wins)) in stats.iter().enumerate() {
            let child = tree.expand(Tree::ROOT, Cell::new(0, column as u8), Vec::new());
            tree.nodes[child].visits = visits;
            tree.nodes[child].wins = wins;
            tree.nodes[Tree::ROOT].visits += visits;
            tree.nodes[Tree::ROOT].wins += wins;
        }
        tree
    }

    #[test]
    fn backpropagation() {
        let mut tree = Tree::new(vec![Cell::new(0, 0), Cell::new(0, 1)]);
        let cell = tree.pop_untried(Tree::ROOT).unwrap();
        assert_eq!(cell, Cell::new(0, 1));
        let child = tree.expand(Tree::ROOT, cell, vec![Cell::new(0, 0)]);
        let grandchild = tree.expand(child, Cell::new(0, 0), Vec::new());
        tree.backpropagate(grandchild, true);
        tree.backpropagate(child, false);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(Tree::ROOT).visits(), 2);
        assert_eq!(tree.node(Tree::ROOT).wins, 1);
        assert_eq!(tree.node(child).visits(), 2);
        assert_eq!(tree.node(child).wins, 1);
        assert_eq!(tree.node(grandchild).visits(), 1);
        assert_eq!(tree.node(grandchild).wins, 1);
        assert_eq!(tree.node(grandchild).cell(), Some(Cell::new(0, 0)));
        assert!(!tree.is_fully_expanded(Tree::ROOT));
    }

    #[test]
    fn unvisited_child_first() {
        let mut tree = tree(&[(10, 9), (5, 5)]);
        let fresh = tree.expand(Tree::ROOT, Cell::new(1, 1), Vec::new());
        assert_eq!(tree.select_child(Tree::ROOT, 1.4), Some(fresh));
    }

    #[test]
    fn uct_prefers_uncertain_children() {
        // Equal win rates: the less visited child has the larger bonus.
        let tree = tree(&[(40, 20), (10, 5)]);
        assert_eq!(tree.select_child(Tree::ROOT, 1.4), Some(2));
        // Without exploration the win rate alone decides.
        let tree = self::tree(&[(40, 30), (10, 5)]);
        assert_eq!(tree.select_child(Tree::ROOT, 0.0), Some(1));
    }

    #[test]
    fn uct_ties_go_to_first_child() {
        let tree = tree(&[(10, 5), (10, 5), (10, 5)]);
        assert_eq!(tree.select_child(Tree::ROOT, 1.4), Some(1));
    }

    #[test]
    fn final_selection() {
        let tree = tree(&[(30, 10), (20, 15), (30, 12)]);
        assert_eq!(tree.best_child(SelectionPolicy::Max), Ok(2));
        assert_eq!(tree.best_child(SelectionPolicy::Robust), Ok(3));
        assert_eq!(
            tree.best_child(SelectionPolicy::MaxRobust),
            Err(SearchError::NoMaximalChild)
        );
        assert_eq!(tree.best_child(SelectionPolicy::Secure), Ok(2));

        let tree = self::tree(&[(30, 10), (50, 30), (20, 15)]);
        assert_eq!(tree.best_child(SelectionPolicy::MaxRobust), Ok(2));
    }

    #[test]
    fn no_children() {
        let tree = Tree::new(Vec::new());
        assert_eq!(
            tree.best_child(SelectionPolicy::Robust),
            Err(SearchError::NoLegalMoves)
        );
    }

    #[test]
    fn parse_policy() {
        assert_eq!(
            SelectionPolicy::try_from("max-robust").unwrap(),
            SelectionPolicy::MaxRobust
        );
        assert_eq!(SelectionPolicy::Secure.to_string(), "secure");
        assert!(SelectionPolicy::try_from("best").is_err());
    }
}
