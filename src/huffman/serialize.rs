//! Compact tree description over the bitstream.
//!
//! Pre-order: an internal node is a `0` bit followed by its `child_a` and
//! `child_b` descriptions; a leaf is a `1` bit followed by its symbol as
//! eight raw bits.  A tree of `n` leaves costs `10n - 1` bits.

use core::fmt;

use super::tree::{HuffmanTree, Node, NodeId};
use crate::bitstream::{BitReader, BitWriter};
use crate::config::MAX_TREE_NODES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeFormatError {
    /// An internal node has only one child and cannot be described.
    MissingChild { node: NodeId },
    /// The description ended inside a node.
    Truncated,
    /// The description names more than `MAX_TREE_NODES` nodes.
    TooManyNodes,
    /// The description is a lone leaf, which assigns no code.
    RootIsLeaf,
}

impl fmt::Display for TreeFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeFormatError::MissingChild { node } => {
                write!(f, "tree node {node} has a single child")
            }
            TreeFormatError::Truncated => f.write_str("tree description truncated"),
            TreeFormatError::TooManyNodes => {
                write!(f, "tree description exceeds {MAX_TREE_NODES} nodes")
            }
            TreeFormatError::RootIsLeaf => f.write_str("tree description has no internal node"),
        }
    }
}

impl std::error::Error for TreeFormatError {}

/// Serialize the reachable part of `tree`.  The last byte is zero-padded.
pub fn store_tree(tree: &HuffmanTree) -> Result<Vec<u8>, TreeFormatError> {
    let mut buf = Vec::new();
    let mut writer = BitWriter::new(&mut buf);
    store_node(tree, tree.root(), &mut writer)?;
    Ok(buf)
}

fn store_node(tree: &HuffmanTree, id: NodeId, w: &mut BitWriter<'_>) -> Result<(), TreeFormatError> {
    let node = tree.node(id);
    if let Some(symbol) = node.symbol {
        w.write_bits(1, 1);
        w.write_bits(symbol as u32, 8);
        return Ok(());
    }
    match (node.child_a, node.child_b) {
        (Some(a), Some(b)) => {
            w.write_bits(0, 1);
            store_node(tree, a, w)?;
            store_node(tree, b, w)
        }
        _ => Err(TreeFormatError::MissingChild { node: id }),
    }
}

/// Rebuild a tree from a description written by [`store_tree`].
///
/// Node counts are zero in the recovered tree; levels are annotated.
pub fn recover_tree(data: &[u8]) -> Result<HuffmanTree, TreeFormatError> {
    let mut reader = BitReader::new(data);
    let mut nodes = Vec::new();
    let root = recover_node(&mut reader, &mut nodes)?;
    if nodes[root].is_leaf() {
        return Err(TreeFormatError::RootIsLeaf);
    }
    Ok(HuffmanTree::from_parts(nodes, root))
}

fn recover_node(r: &mut BitReader<'_>, nodes: &mut Vec<Node>) -> Result<NodeId, TreeFormatError> {
    if nodes.len() == MAX_TREE_NODES {
        return Err(TreeFormatError::TooManyNodes);
    }
    let id = nodes.len();
    nodes.push(Node::default());

    if r.read_bit().map_err(|_| TreeFormatError::Truncated)? == 1 {
        let symbol = r.read_u8().map_err(|_| TreeFormatError::Truncated)?;
        nodes[id].symbol = Some(symbol);
        return Ok(id);
    }

    let a = recover_node(r, nodes)?;
    let b = recover_node(r, nodes)?;
    nodes[id].child_a = Some(a);
    nodes[id].child_b = Some(b);
    Ok(id)
}
