//! Huffman-layer decoder.
//!
//! Every byte of the LZ-layer stream is tree-coded except the fields that
//! follow a marker: after a decoded marker (other than the stream header at
//! position 0) come one raw length byte and, unless the length byte is zero,
//! one or two raw offset bytes.  Those are read byte-wise from whatever bit
//! position the cursor is on and copied through unchanged.
//!
//! ```text
//!            leaf != marker, or first byte
//!   ┌───────────────────────────────────────┐
//!   ▼                                       │
//! Traversing ──leaf == marker──► MatchLength ──0──► Traversing
//!                                    │
//!                                   ≠0
//!                                    ▼
//!                               FirstOffset ──bit 7 clear──► Traversing
//!                                    │
//!                                bit 7 set
//!                                    ▼
//!                               SecondOffset ──► Traversing
//! ```

use core::fmt;

use super::tree::HuffmanTree;
use crate::bitstream::BitReader;
use crate::config::OFFSET_CONTINUATION;

/// Data errors in a Huffman-coded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input ran out after `produced` of `expected` output bytes.
    Truncated { produced: usize, expected: usize },
    /// The bits at output position `produced` lead to a missing branch.
    InvalidCode { produced: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Truncated { produced, expected } => write!(
                f,
                "huffman stream truncated: produced {produced} of {expected} bytes"
            ),
            DecodeError::InvalidCode { produced } => {
                write!(f, "invalid huffman code at output byte {produced}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Traversing,
    MatchLength,
    FirstOffset,
    SecondOffset,
}

/// Decoder bound to one tree and marker.  Holds no per-stream state, so one
/// instance can serve any number of streams, from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct HuffmanDecoder<'t> {
    tree: &'t HuffmanTree,
    marker: u8,
}

impl<'t> HuffmanDecoder<'t> {
    pub fn new(tree: &'t HuffmanTree, marker: u8) -> Self {
        HuffmanDecoder { tree, marker }
    }

    /// Decode exactly `outsize` LZ-layer bytes from `input`.
    pub fn decode(&self, input: &[u8], outsize: usize) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::with_capacity(outsize);
        self.decode_into(input, outsize, &mut out)?;
        Ok(out)
    }

    /// Decode `outsize` bytes, appending them to `out`.
    ///
    /// On error, `out` keeps every byte decoded before the failure.
    pub fn decode_into(&self, input: &[u8], outsize: usize, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        let base = out.len();
        let mut reader = BitReader::new(input);
        let mut state = State::Traversing;

        while out.len() - base < outsize {
            let produced = out.len() - base;
            let truncated = |_| DecodeError::Truncated {
                produced,
                expected: outsize,
            };
            state = match state {
                State::Traversing => {
                    let symbol = self.walk(&mut reader, produced, outsize)?;
                    out.push(symbol);
                    if symbol == self.marker && produced > 0 {
                        State::MatchLength
                    } else {
                        State::Traversing
                    }
                }
                State::MatchLength => {
                    let length = reader.read_u8().map_err(truncated)?;
                    out.push(length);
                    if length == 0 {
                        // literal occurrence of the marker byte
                        State::Traversing
                    } else {
                        State::FirstOffset
                    }
                }
                State::FirstOffset => {
                    let offset = reader.read_u8().map_err(truncated)?;
                    out.push(offset);
                    if offset & OFFSET_CONTINUATION != 0 {
                        State::SecondOffset
                    } else {
                        State::Traversing
                    }
                }
                State::SecondOffset => {
                    let offset = reader.read_u8().map_err(truncated)?;
                    out.push(offset);
                    State::Traversing
                }
            };
        }
        Ok(())
    }

    /// Follow bits from the root to a leaf.
    fn walk(&self, reader: &mut BitReader<'_>, produced: usize, expected: usize) -> Result<u8, DecodeError> {
        let mut id = self.tree.root();
        loop {
            let node = self.tree.node(id);
            if let Some(symbol) = node.symbol {
                return Ok(symbol);
            }
            let bit = reader
                .read_bit()
                .map_err(|_| DecodeError::Truncated { produced, expected })?;
            let next = if bit == 1 { node.child_b } else { node.child_a };
            id = next.ok_or(DecodeError::InvalidCode { produced })?;
        }
    }
}
