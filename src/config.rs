// config.rs: Compile-time constants and runtime table configuration.
//
// The hardware Huffman decoder on the accelerator fixes most of these: code
// lengths cannot exceed 16 bits, and the LZ77 token layout caps match length
// and offset.  Only the marker boost is a tuning knob, so it is the only
// value carried at runtime (see `TableConfig`).

// Upper bound on arena size: 256 leaves imply at most 511 tree nodes.
pub const MAX_TREE_NODES: usize = 511;

// Longest code the accelerator's Huffman stage can represent.
// The root sits on level 0, so no leaf may sit below level 16.
pub const MAX_HUFFCODE_BITS: u32 = 16;

// Number of distinct byte values; one histogram entry per value.
pub const ALPHABET_SIZE: usize = 256;

// LZ77 match length range.  The token stores `length - MIN_MATCH` in 4 bits.
pub const MIN_MATCH: usize = 3;
pub const MAX_MATCH: usize = MIN_MATCH + 0xF; // 18

// LZ77 offsets are 4 + 7 + 7 bits wide.
pub const MAX_OFFSET: usize = (1 << 18) - 1;

// Bit 7 of the first offset byte flags a second (continuation) offset byte.
pub const OFFSET_CONTINUATION: u8 = 0x80;

// Byte written in place of an LZ77 back-reference that points before the
// start of the output.  Keeps positions aligned so later mismatches are still
// attributed to the right offset.
pub const PLACEHOLDER_BYTE: u8 = b'x';

// Vector width of the accelerator's LZ77 stage.  The accelerator consumes
// input in multiples of `2 * ACCELERATOR_VEC` bytes and leaves the bytes of
// its last vector from the first-valid-position onward unencoded.
pub const ACCELERATOR_VEC: usize = 16;

// Default divisor for the marker count boost: the marker's histogram count is
// replaced by `insize / 3` before the tree is built, which keeps its code short.
pub const DEFAULT_MARKER_BOOST_DIVISOR: u32 = 3;

// Number of mismatching positions kept in a verification report.
pub const MAX_REPORTED_MISMATCHES: usize = 10;

/// Runtime parameters for code-table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// The marker's count is raised to `max(insize / divisor, 1)` before the
    /// tree is built.  `0` disables the boost (the marker then keeps a count
    /// of at least 1 so it still receives a code).
    pub marker_boost_divisor: u32,
}

impl TableConfig {
    /// Count the marker is given before tree construction for an input of
    /// `insize` bytes.  Never below 1: every LZ-layer stream starts with the
    /// marker, so the marker must always have a code.
    pub fn marker_count(&self, insize: usize, observed: u64) -> u64 {
        if self.marker_boost_divisor == 0 {
            return observed.max(1);
        }
        (insize as u64 / self.marker_boost_divisor as u64).max(1)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            marker_boost_divisor: DEFAULT_MARKER_BOOST_DIVISOR,
        }
    }
}
