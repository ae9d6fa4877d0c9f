//! Code assignment and the packed table handed to the accelerator.
//!
//! Codes are read straight off the tree: descending to `child_a` appends a
//! `0`, descending to `child_b` appends a `1`, and the depth of a leaf is its
//! code length.  The accelerator's encoder must use exactly these codes, or
//! the host decoder will misread its output.
//!
//! Interchange format: 256 32-bit words, one per byte value, each
//! `(bits << 16) | code`.  Values without a code are all-zero words.

use super::histogram::Histogram;
use super::tree::{HuffmanTree, NodeId};
use super::BuildError;
use crate::config::{ALPHABET_SIZE, MAX_HUFFCODE_BITS};

/// A single codeword: the low `bits` bits of `code`, MSB first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Code {
    pub code: u16,
    pub bits: u16,
}

impl Code {
    /// Packed interchange word.
    #[inline]
    pub fn to_word(self) -> u32 {
        ((self.bits as u32) << 16) | self.code as u32
    }

    #[inline]
    pub fn from_word(word: u32) -> Self {
        Code {
            code: (word & 0xFFFF) as u16,
            bits: (word >> 16) as u16,
        }
    }

    /// `true` when `self` is a proper or equal prefix of `other`.
    pub fn is_prefix_of(self, other: Code) -> bool {
        if self.bits == 0 || self.bits > other.bits {
            return false;
        }
        (other.code >> (other.bits - self.bits)) == self.code
    }
}

/// Symbol → code mapping for all 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: [Code; ALPHABET_SIZE],
}

impl CodeTable {
    /// Walk `tree` and assign every leaf its code, recording `(code, bits)`
    /// in the symbol's histogram entry as well as in the returned table.
    ///
    /// Fails if any code would be longer than [`MAX_HUFFCODE_BITS`]; that
    /// can only happen when depth limiting was skipped or did not converge.
    pub fn generate(tree: &HuffmanTree, hist: &mut Histogram) -> Result<Self, BuildError> {
        let mut table = CodeTable {
            codes: [Code::default(); ALPHABET_SIZE],
        };
        table.store(tree, tree.root(), 0, 0)?;
        for (entry, code) in hist.entries_mut().iter_mut().zip(table.codes.iter()) {
            entry.code = code.code as u32;
            entry.bits = code.bits as u32;
        }
        Ok(table)
    }

    fn store(&mut self, tree: &HuffmanTree, id: NodeId, code: u32, bits: u32) -> Result<(), BuildError> {
        let node = tree.node(id);
        if let Some(symbol) = node.symbol {
            if bits > MAX_HUFFCODE_BITS {
                return Err(BuildError::CodeTooLong { symbol, bits });
            }
            self.codes[symbol as usize] = Code {
                code: code as u16,
                bits: bits as u16,
            };
            return Ok(());
        }
        if bits >= MAX_HUFFCODE_BITS {
            // Any leaf below here would be too long; find one to report.
            let symbol = first_leaf(tree, id).unwrap_or(0);
            return Err(BuildError::CodeTooLong { symbol, bits: bits + 1 });
        }
        if let Some(a) = node.child_a {
            self.store(tree, a, code << 1, bits + 1)?;
        }
        if let Some(b) = node.child_b {
            self.store(tree, b, (code << 1) | 1, bits + 1)?;
        }
        Ok(())
    }

    /// Rebuild a table from its 256 interchange words.
    pub fn from_words(words: &[u32; ALPHABET_SIZE]) -> Self {
        let mut codes = [Code::default(); ALPHABET_SIZE];
        for (c, &w) in codes.iter_mut().zip(words.iter()) {
            *c = Code::from_word(w);
        }
        CodeTable { codes }
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Code {
        self.codes[symbol as usize]
    }

    #[inline]
    pub fn codes(&self) -> &[Code; ALPHABET_SIZE] {
        &self.codes
    }

    /// The 256 packed interchange words.
    pub fn to_words(&self) -> [u32; ALPHABET_SIZE] {
        let mut words = [0u32; ALPHABET_SIZE];
        for (w, c) in words.iter_mut().zip(self.codes.iter()) {
            *w = c.to_word();
        }
        words
    }

    /// Interchange words serialized little-endian (1024 bytes).
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.to_words().iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Longest assigned code length.
    pub fn max_bits(&self) -> u16 {
        self.codes.iter().map(|c| c.bits).max().unwrap_or(0)
    }

    /// `true` when no assigned code is a prefix of another assigned code.
    pub fn is_prefix_free(&self) -> bool {
        let assigned: Vec<Code> = self.codes.iter().copied().filter(|c| c.bits > 0).collect();
        assigned.iter().enumerate().all(|(i, &a)| {
            assigned
                .iter()
                .enumerate()
                .all(|(j, &b)| i == j || !a.is_prefix_of(b))
        })
    }
}

fn first_leaf(tree: &HuffmanTree, id: NodeId) -> Option<u8> {
    let mut stack = vec![id];
    while let Some(n) = stack.pop() {
        let node = tree.node(n);
        if node.symbol.is_some() {
            return node.symbol;
        }
        stack.extend(node.child_b);
        stack.extend(node.child_a);
    }
    None
}
