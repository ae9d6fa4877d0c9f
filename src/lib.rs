// hufflz: host half of an LZ77 + Huffman compression accelerator
//
// The accelerator encodes; this crate builds the code table it encodes with
// and decodes its output to check it.

pub mod config;
pub mod display;
pub mod bitstream;
pub mod huffman;
pub mod lz77;
pub mod codec;
pub mod verify;
pub mod cli;

// ── Interchange constants ─────────────────────────────────────────────────────
pub use config::{MAX_HUFFCODE_BITS, MAX_OFFSET, MAX_TREE_NODES, MAX_MATCH, MIN_MATCH};

/// Size in bytes of the serialized code table (256 little-endian u32 words).
pub const CODE_TABLE_BYTES: usize = config::ALPHABET_SIZE * 4;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use codec::{build_table, build_table_with, decode, CodeBook, Decoded};
pub use config::TableConfig;
pub use huffman::{recover_tree, store_tree, BuildError, CodeTable, DecodeError, HuffmanTree};
pub use verify::{Accelerator, AcceleratorOutput, Verifier, VerifyError, VerifyReport};
