//! Code-length limiting by tree surgery.
//!
//! While the tree is deeper than the limit, take the first internal node on
//! the limit level (the deep node) and the first leaf on the deepest level
//! above it (the surrogate), hand the deep node's two subtrees to the
//! surrogate, and turn the deep node into a leaf carrying the surrogate's
//! symbol.  The over-deep subtree rises by at least one level and the
//! surrogate's symbol sinks to the limit level, so the total number of levels
//! by which leaves exceed the limit drops every round.  The result is still a
//! full binary prefix tree; only code lengths change.

use super::tree::{HuffmanTree, NodeId};
use super::BuildError;
use crate::config::ALPHABET_SIZE;

/// Upper bound on surgery rounds.  The excess depth summed over at most 256
/// leaves is below 256 * 256 and falls by at least one per round.
const MAX_ROUNDS: usize = ALPHABET_SIZE * ALPHABET_SIZE;

/// Reshape `tree` so no node sits below level `max_level`.
///
/// Returns the number of surgery rounds performed (0 when the tree already
/// fits).  Levels are re-annotated on return.
pub fn limit_depth(tree: &mut HuffmanTree, max_level: u32) -> Result<usize, BuildError> {
    tree.annotate_levels();
    let mut depth = tree.depth();
    let mut rounds = 0;

    while depth > max_level {
        if rounds == MAX_ROUNDS {
            return Err(BuildError::DepthLimitDiverged { depth });
        }
        crate::displaylevel!(3, "Depth before limiting: {}\n", depth);

        let deep = find_deep_node(tree, max_level).ok_or(BuildError::DeepNodeMissing {
            level: max_level,
        })?;
        let surrogate = find_surrogate(tree, max_level).ok_or(BuildError::SurrogateMissing {
            below: max_level,
        })?;
        graft(tree, deep, surrogate);

        tree.annotate_levels();
        depth = tree.depth();
        rounds += 1;
        crate::displaylevel!(3, "Depth after limiting: {}\n", depth);
    }

    Ok(rounds)
}

/// First internal node on exactly `level`, in depth-first order.
pub fn find_deep_node(tree: &HuffmanTree, level: u32) -> Option<NodeId> {
    tree.preorder().find(|&id| {
        let node = tree.node(id);
        node.level == level && node.has_children()
    })
}

/// First leaf found scanning levels `max_level - 1`, `max_level - 2`, … 1,
/// each level searched depth-first before moving one level up.
pub fn find_surrogate(tree: &HuffmanTree, max_level: u32) -> Option<NodeId> {
    (1..max_level).rev().find_map(|level| {
        tree.preorder().find(|&id| {
            let node = tree.node(id);
            node.level == level && node.is_leaf()
        })
    })
}

/// Move `deep`'s children under `surrogate` and swap roles: the surrogate
/// becomes internal, the deep node becomes a leaf with the surrogate's symbol.
fn graft(tree: &mut HuffmanTree, deep: NodeId, surrogate: NodeId) {
    let (child_a, child_b) = {
        let d = tree.node(deep);
        (d.child_a, d.child_b)
    };
    let symbol = tree.node(surrogate).symbol;

    let s = tree.node_mut(surrogate);
    s.child_a = child_a;
    s.child_b = child_b;
    s.symbol = None;

    let d = tree.node_mut(deep);
    d.symbol = symbol;
    d.child_a = None;
    d.child_b = None;
}
