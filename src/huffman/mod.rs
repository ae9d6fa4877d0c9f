//! Huffman layer: histogram, tree construction, length limiting, code table
//! generation and the escape-aware decoder.

pub mod decode;
pub mod histogram;
pub mod limit;
pub mod serialize;
pub mod table;
pub mod tree;

use core::fmt;

pub use decode::{DecodeError, HuffmanDecoder};
pub use histogram::{select_marker, Histogram, HistogramEntry};
pub use limit::limit_depth;
pub use serialize::{recover_tree, store_tree, TreeFormatError};
pub use table::{Code, CodeTable};
pub use tree::{HuffmanTree, Node, NodeId};

/// Structural failures while building a code table.  None of these depend
/// on the input data being malformed; each one means the table cannot be
/// handed to the accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// No symbol has a non-zero count.
    EmptyAlphabet,
    /// The arena would exceed `MAX_TREE_NODES`.
    TooManyNodes { nodes: usize },
    /// The tree is too deep but has no internal node on the limit level.
    DeepNodeMissing { level: u32 },
    /// No leaf exists above the limit level to take the deep subtree.
    SurrogateMissing { below: u32 },
    /// Depth limiting ran out of rounds with the tree still `depth` deep.
    DepthLimitDiverged { depth: u32 },
    /// A code longer than `MAX_HUFFCODE_BITS` was produced.
    CodeTooLong { symbol: u8, bits: u32 },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::EmptyAlphabet => f.write_str("cannot build a huffman tree with no symbols"),
            BuildError::TooManyNodes { nodes } => write!(f, "huffman tree needs {nodes} nodes"),
            BuildError::DeepNodeMissing { level } => {
                write!(f, "no internal node on level {level} of an over-deep tree")
            }
            BuildError::SurrogateMissing { below } => {
                write!(f, "no leaf above level {below} to take a deep subtree")
            }
            BuildError::DepthLimitDiverged { depth } => {
                write!(f, "depth limiting did not converge (depth {depth})")
            }
            BuildError::CodeTooLong { symbol, bits } => {
                write!(f, "code for symbol {symbol} is {bits} bits long")
            }
        }
    }
}

impl std::error::Error for BuildError {}
