//! Huffman tree arena and greedy tree construction.
//!
//! Nodes live in one `Vec` allocated per build and are addressed by index;
//! children are `Option<NodeId>` so the structure is a strict tree with no
//! parent links.  Leaves occupy the first `n` slots in symbol order, internal
//! nodes are appended behind them as merges happen.

use core::fmt::Write as _;

use super::histogram::Histogram;
use super::BuildError;
use crate::config::MAX_TREE_NODES;

/// Index of a node in its tree's arena.
pub type NodeId = usize;

/// One arena slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Node {
    pub child_a: Option<NodeId>,
    pub child_b: Option<NodeId>,
    pub count: u64,
    /// `None` for internal nodes.
    pub symbol: Option<u8>,
    /// Distance from the root (root = 0).  Valid after `annotate_levels`.
    pub level: u32,
}

impl Node {
    fn leaf(symbol: u8, count: u64) -> Self {
        Node {
            symbol: Some(symbol),
            count,
            ..Node::default()
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.symbol.is_some()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.child_a.is_some() || self.child_b.is_some()
    }
}

/// A binary prefix tree over byte symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Greedy Huffman construction over every symbol with a non-zero count.
    ///
    /// Each of the `n - 1` merges scans the arena for the two lightest active
    /// nodes (earliest slot wins a tie), joins them under a new internal node
    /// whose count is their sum, and deactivates them.  Quadratic in `n`,
    /// which is at most 256.
    ///
    /// A single-symbol alphabet gets an internal root with the leaf as its
    /// only child (`child_a`), so the symbol's code is the one bit `0`.
    ///
    /// Levels are annotated on return; depth is not limited here.
    pub fn build(hist: &Histogram) -> Result<Self, BuildError> {
        let mut nodes: Vec<Node> = hist
            .entries()
            .iter()
            .filter(|e| e.count > 0)
            .map(|e| Node::leaf(e.symbol, e.count))
            .collect();

        let n = nodes.len();
        if n == 0 {
            return Err(BuildError::EmptyAlphabet);
        }
        if n == 1 {
            nodes.push(Node {
                child_a: Some(0),
                count: nodes[0].count,
                ..Node::default()
            });
            let mut tree = HuffmanTree { nodes, root: 1 };
            tree.annotate_levels();
            return Ok(tree);
        }
        if 2 * n - 1 > MAX_TREE_NODES {
            return Err(BuildError::TooManyNodes { nodes: 2 * n - 1 });
        }
        nodes.reserve_exact(n - 1);

        // Working weights: a slot is active while its weight is non-zero.
        let mut weight: Vec<u64> = nodes.iter().map(|nd| nd.count).collect();
        weight.reserve_exact(n - 1);

        for _ in 1..n {
            let mut first: Option<NodeId> = None;
            let mut second: Option<NodeId> = None;
            for (k, &w) in weight.iter().enumerate() {
                if w == 0 {
                    continue;
                }
                match first {
                    Some(f) if w >= weight[f] => {
                        if second.map_or(true, |s| w < weight[s]) {
                            second = Some(k);
                        }
                    }
                    _ => {
                        second = first;
                        first = Some(k);
                    }
                }
            }
            // n - 1 merges over n active slots always leave two candidates.
            let (a, b) = match (first, second) {
                (Some(a), Some(b)) => (a, b),
                _ => return Err(BuildError::EmptyAlphabet),
            };

            let sum = weight[a].saturating_add(weight[b]);
            nodes.push(Node {
                child_a: Some(a),
                child_b: Some(b),
                count: sum,
                symbol: None,
                level: 0,
            });
            weight.push(sum);
            weight[a] = 0;
            weight[b] = 0;
        }

        let root = nodes.len() - 1;
        let mut tree = HuffmanTree { nodes, root };
        tree.annotate_levels();
        Ok(tree)
    }

    /// Assemble a tree from an arena the caller has already linked.
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self {
        let mut tree = HuffmanTree { nodes, root };
        tree.annotate_levels();
        tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Every arena slot, including ones no longer reachable from the root.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves reachable from the root.
    pub fn leaf_count(&self) -> usize {
        self.preorder().filter(|&id| self.nodes[id].is_leaf()).count()
    }

    /// Set every reachable node's level: root 0, children parent + 1.
    pub fn annotate_levels(&mut self) {
        self.nodes[self.root].level = 0;
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let child_level = self.nodes[id].level + 1;
            for child in [self.nodes[id].child_a, self.nodes[id].child_b]
                .into_iter()
                .flatten()
            {
                self.nodes[child].level = child_level;
                stack.push(child);
            }
        }
    }

    /// Deepest annotated level among reachable nodes.
    pub fn depth(&self) -> u32 {
        self.preorder()
            .map(|id| self.nodes[id].level)
            .max()
            .unwrap_or(0)
    }

    /// Depth-first walk from the root.  Children are pushed `a` then `b`, so
    /// `b`'s subtree is visited first.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// One line per reachable node in depth-first order:
    /// `Symbol: <c>, Level: <n>` for leaves, `Level: <n>` for internal nodes.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for id in self.preorder() {
            let node = &self.nodes[id];
            if let Some(sym) = node.symbol {
                let _ = write!(out, "Symbol: {}, ", (sym as char).escape_default());
            }
            let _ = writeln!(out, "Level: {}", node.level);
        }
        out
    }
}

/// Iterator returned by [`HuffmanTree::preorder`].
pub struct Preorder<'t> {
    tree: &'t HuffmanTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        if let Some(a) = node.child_a {
            self.stack.push(a);
        }
        if let Some(b) = node.child_b {
            self.stack.push(b);
        }
        Some(id)
    }
}
