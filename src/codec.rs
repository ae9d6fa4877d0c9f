//! Public entry points: build the code book for an input, and decode an
//! accelerator stream back to the original bytes.
//!
//! A [`CodeBook`] is everything the accelerator is given (table and marker)
//! plus what the host needs to check its work (the tree).  It is never
//! modified after [`build_table`] returns, so a single instance can be shared
//! by reference across threads that decode independent streams.

use crate::config::{TableConfig, MAX_HUFFCODE_BITS};
use crate::huffman::{limit_depth, BuildError, CodeTable, DecodeError, Histogram, HuffmanDecoder, HuffmanTree};
use crate::lz77;

/// Tree, code table and marker for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBook {
    tree: HuffmanTree,
    table: CodeTable,
    marker: u8,
    histogram: Histogram,
}

impl CodeBook {
    #[inline]
    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    #[inline]
    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    #[inline]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    /// Histogram after marker boosting, with each symbol's code recorded.
    #[inline]
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Decoder for streams produced with this code book.
    #[inline]
    pub fn decoder(&self) -> HuffmanDecoder<'_> {
        HuffmanDecoder::new(&self.tree, self.marker)
    }
}

/// [`build_table_with`] using the default [`TableConfig`].
pub fn build_table(input: &[u8]) -> Result<CodeBook, BuildError> {
    build_table_with(input, &TableConfig::default())
}

/// Histogram `input`, pick the marker, boost its count, build the tree,
/// limit it to 16-bit codes and generate the code table.
pub fn build_table_with(input: &[u8], config: &TableConfig) -> Result<CodeBook, BuildError> {
    let mut histogram = Histogram::from_bytes(input);
    let marker = histogram.marker();
    let boosted = config.marker_count(input.len(), histogram.count(marker));
    histogram.set_count(marker, boosted);
    crate::displaylevel!(4, "Marker {} boosted to count {}\n", marker, boosted);

    let mut tree = HuffmanTree::build(&histogram)?;
    let rounds = limit_depth(&mut tree, MAX_HUFFCODE_BITS)?;
    if rounds > 0 {
        crate::displaylevel!(3, "Depth limited to {} after {} rounds\n", tree.depth(), rounds);
    }
    if crate::display::display_level() >= 4 {
        crate::display!("{}", tree.dump());
    }

    let table = CodeTable::generate(&tree, &mut histogram)?;
    if crate::display::display_level() >= 4 {
        crate::display!("HUFFTABLE:\n");
        for (k, code) in table.codes().iter().enumerate() {
            crate::display!(
                "{} - {}: {:x} ({})\n",
                k,
                (k as u8 as char).escape_default(),
                code.code,
                code.bits
            );
        }
    }

    Ok(CodeBook {
        tree,
        table,
        marker,
        histogram,
    })
}

/// Result of a full two-layer decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The reconstructed original bytes (best effort when `errors > 0`).
    pub bytes: Vec<u8>,
    /// LZ77 errors plus one if the Huffman layer failed.
    pub errors: usize,
    /// The Huffman-layer failure, if any.
    pub huffman_error: Option<DecodeError>,
}

/// Decode `compressed` through both layers.
///
/// `outsize` is the size of the LZ-layer intermediate, not of the original.
/// A Huffman-layer failure is counted as one error; whatever was decoded
/// before it still goes through the LZ77 layer.
pub fn decode(compressed: &[u8], tree: &HuffmanTree, marker: u8, outsize: usize) -> Decoded {
    let mut intermediate = Vec::with_capacity(outsize);
    let huffman_error = HuffmanDecoder::new(tree, marker)
        .decode_into(compressed, outsize, &mut intermediate)
        .err();
    if let Some(e) = huffman_error {
        crate::displaylevel!(2, "{}\n", e);
    }

    let (bytes, lz_errors) = lz77::decode(&intermediate);
    Decoded {
        bytes,
        errors: lz_errors + usize::from(huffman_error.is_some()),
        huffman_error,
    }
}
