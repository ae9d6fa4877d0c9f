//! Host-side verification of accelerator output.
//!
//! The accelerator is an opaque collaborator: it takes the input, the code
//! table and the marker, and hands back a buffer of 16-bit words plus three
//! pieces of metadata.  Verification decodes that buffer through both layers,
//! re-attaches the bytes the accelerator never encoded, and compares the
//! result with the input.
//!
//! # What the accelerator leaves out
//!
//! * It consumes input in whole blocks of `2 * ACCELERATOR_VEC` bytes; the
//!   trailing `len % (2 * ACCELERATOR_VEC)` bytes are never sent.
//! * Of the last `ACCELERATOR_VEC` bytes it was sent, those from the
//!   first-valid-position onward are not encoded either.
//!
//! Both runs of bytes are appended to the LZ-layer stream as literals before
//! the LZ77 pass.

use core::fmt;
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::codec::{build_table_with, CodeBook};
use crate::config::{TableConfig, ACCELERATOR_VEC, MAX_REPORTED_MISMATCHES};
use crate::huffman::{BuildError, CodeTable, DecodeError};
use crate::lz77;

/// Compressed buffer and metadata returned by the accelerator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceleratorOutput {
    /// Huffman-layer stream packed two bytes per word, first byte high.
    pub words: Vec<u16>,
    /// Index, within the last vector, of the first byte left unencoded.
    pub first_valid_position: usize,
    /// Size of the LZ-layer stream the Huffman layer encodes.
    pub lz_size: usize,
    /// Size in bytes of the Huffman-layer stream.
    pub huffman_size: usize,
}

/// The compression engine being verified.
pub trait Accelerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Compress `input` with the given table and marker.
    fn compress(&mut self, input: &[u8], table: &CodeTable, marker: u8) -> Result<AcceleratorOutput, Self::Error>;
}

/// Failures that prevent verification from running at all.
#[derive(Debug)]
pub enum VerifyError {
    /// The code table could not be built.
    Build(BuildError),
    /// The accelerator reported an error.
    Accelerator(Box<dyn std::error::Error + Send + Sync>),
    /// The first-valid-position lies outside the last vector.
    FirstValidPosition { fvp: usize },
    /// The reported Huffman size exceeds the returned buffer.
    HuffmanSize { huffman_size: usize, available: usize },
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Build(e) => write!(f, "cannot build code table: {e}"),
            VerifyError::Accelerator(e) => write!(f, "accelerator failed: {e}"),
            VerifyError::FirstValidPosition { fvp } => write!(
                f,
                "first valid position {fvp} exceeds vector width {ACCELERATOR_VEC}"
            ),
            VerifyError::HuffmanSize {
                huffman_size,
                available,
            } => write!(
                f,
                "huffman size {huffman_size} exceeds the {available}-byte output buffer"
            ),
        }
    }
}

impl std::error::Error for VerifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VerifyError::Build(e) => Some(e),
            VerifyError::Accelerator(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<BuildError> for VerifyError {
    fn from(e: BuildError) -> Self {
        VerifyError::Build(e)
    }
}

/// One differing output position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub position: usize,
    pub expected: u8,
    /// `None` when the decoded output is too short to reach `position`.
    pub actual: Option<u8>,
}

/// Outcome of verifying one accelerator output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub marker: u8,
    pub input_len: usize,
    /// Bytes sent to the accelerator.
    pub processed: usize,
    /// Trailing bytes never sent.
    pub remaining: usize,
    pub lz_size: usize,
    pub huffman_size: usize,
    pub huffman_error: Option<DecodeError>,
    pub lz_errors: usize,
    pub mismatch_count: usize,
    /// The first few mismatches, in position order.
    pub mismatches: Vec<Mismatch>,
    /// LZ77 errors + mismatches + one for a Huffman-layer failure.
    pub errors: usize,
    pub decode_time: Duration,
}

impl VerifyReport {
    #[inline]
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    /// Huffman-layer size as a fraction of the bytes sent.
    pub fn compression_ratio(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        self.huffman_size as f64 / self.processed as f64
    }

    /// Decode throughput in bytes per second.
    pub fn decode_throughput(&self) -> f64 {
        let secs = self.decode_time.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.input_len as f64 / secs
    }
}

/// Split the accelerator's word buffer into bytes, high byte first, and
/// keep the first `len` of them.
pub fn unpack_words(words: &[u16], len: usize) -> Vec<u8> {
    let mut bytes: Vec<u8> = words.iter().flat_map(|w| w.to_be_bytes()).collect();
    bytes.truncate(len);
    bytes
}

/// Number of leading input bytes the accelerator is given.
#[inline]
pub fn processed_len(input_len: usize) -> usize {
    input_len - input_len % (2 * ACCELERATOR_VEC)
}

/// Verification context for one input: the code book is built once from the
/// processed prefix and shared by every verification of that input.
#[derive(Debug, Clone)]
pub struct Verifier<'a> {
    input: &'a [u8],
    processed: usize,
    book: CodeBook,
}

impl<'a> Verifier<'a> {
    pub fn new(input: &'a [u8], config: &TableConfig) -> Result<Self, BuildError> {
        let processed = processed_len(input.len());
        let book = build_table_with(&input[..processed], config)?;
        Ok(Verifier {
            input,
            processed,
            book,
        })
    }

    #[inline]
    pub fn book(&self) -> &CodeBook {
        &self.book
    }

    /// The prefix handed to the accelerator.
    #[inline]
    pub fn processed_input(&self) -> &'a [u8] {
        &self.input[..self.processed]
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.processed
    }

    /// Compress on `accelerator`, then verify its output.
    pub fn run<A: Accelerator>(&self, accelerator: &mut A) -> Result<VerifyReport, VerifyError> {
        let output = accelerator
            .compress(self.processed_input(), self.book.table(), self.book.marker())
            .map_err(|e| VerifyError::Accelerator(Box::new(e)))?;
        crate::displaylevel!(3, "FVP          : {}\n", output.first_valid_position);
        crate::displaylevel!(3, "COM size lz  : {}\n", output.lz_size);
        crate::displaylevel!(3, "COM size huff: {}\n", output.huffman_size);
        self.verify(&output)
    }

    /// Verify the outputs of several engines that compressed the same input
    /// with the same code book, in parallel.
    pub fn verify_engines(&self, outputs: &[AcceleratorOutput]) -> Vec<Result<VerifyReport, VerifyError>> {
        outputs.par_iter().map(|o| self.verify(o)).collect()
    }

    /// Decode one accelerator output and compare it with the input.
    pub fn verify(&self, output: &AcceleratorOutput) -> Result<VerifyReport, VerifyError> {
        let fvp = output.first_valid_position;
        if fvp > ACCELERATOR_VEC {
            return Err(VerifyError::FirstValidPosition { fvp });
        }
        let available = output.words.len() * 2;
        if output.huffman_size > available {
            return Err(VerifyError::HuffmanSize {
                huffman_size: output.huffman_size,
                available,
            });
        }

        let marker = self.book.marker();
        let start = Instant::now();

        let compressed = unpack_words(&output.words, output.huffman_size);
        let mut lz_stream = Vec::with_capacity(output.lz_size + 2 * (ACCELERATOR_VEC + self.remaining()) + 1);
        let huffman_error = self
            .book
            .decoder()
            .decode_into(&compressed, output.lz_size, &mut lz_stream)
            .err();
        if let Some(e) = huffman_error {
            crate::displaylevel!(1, "{}\n", e);
        }
        if lz_stream.is_empty() {
            // nothing was encoded: the header still has to name the marker
            lz_stream.push(marker);
        }

        let tail_start = (self.processed.saturating_sub(ACCELERATOR_VEC) + fvp).min(self.processed);
        for &b in &self.input[tail_start..] {
            lz77::push_literal(&mut lz_stream, b, marker);
        }

        let (decoded, lz_errors) = lz77::decode(&lz_stream);
        let decode_time = start.elapsed();

        let mut mismatch_count = 0;
        let mut mismatches = Vec::new();
        for (position, &expected) in self.input.iter().enumerate() {
            let actual = decoded.get(position).copied();
            if actual == Some(expected) {
                continue;
            }
            mismatch_count += 1;
            if mismatches.len() < MAX_REPORTED_MISMATCHES {
                crate::displaylevel!(
                    2,
                    "{}: {:?} != {} '{}'\n",
                    position,
                    actual,
                    expected,
                    (expected as char).escape_default()
                );
                mismatches.push(Mismatch {
                    position,
                    expected,
                    actual,
                });
            }
        }

        let errors = lz_errors + mismatch_count + usize::from(huffman_error.is_some());
        Ok(VerifyReport {
            marker,
            input_len: self.input.len(),
            processed: self.processed,
            remaining: self.remaining(),
            lz_size: output.lz_size,
            huffman_size: output.huffman_size,
            huffman_error,
            lz_errors,
            mismatch_count,
            mismatches,
            errors,
            decode_time,
        })
    }
}
