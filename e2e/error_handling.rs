//! E2E Test Suite: Error Handling & Edge Cases
//!
//! Checks that damaged or inconsistent accelerator output is reported
//! through error counts and typed errors, never through a panic.
//!
//! Coverage:
//! - Build errors (empty alphabet, conversion into VerifyError)
//! - Huffman-layer damage (truncation, random bytes, missing branches)
//! - LZ77-layer damage (bad offsets, truncated tokens)
//! - Inconsistent metadata (fvp, huffman size, lz size)
//! - Error Display implementations

#[path = "../tests/common/mod.rs"]
mod common;

use common::{lorem, noise, SoftwareAccelerator};
use hufflz::bitstream::BitstreamError;
use hufflz::huffman::{Histogram, HuffmanDecoder, HuffmanTree, TreeFormatError};
use hufflz::verify::{Accelerator, AcceleratorOutput};
use hufflz::{build_table, decode, lz77, BuildError, DecodeError, TableConfig, Verifier, VerifyError};

fn output_for(verifier: &Verifier<'_>, fvp: usize) -> AcceleratorOutput {
    let book = verifier.book();
    match (SoftwareAccelerator { fvp }).compress(verifier.processed_input(), book.table(), book.marker()) {
        Ok(o) => o,
        Err(never) => match never {},
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 1: build errors
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_histogram_cannot_build() {
    assert_eq!(
        HuffmanTree::build(&Histogram::from_bytes(&[])),
        Err(BuildError::EmptyAlphabet)
    );
    // the public entry point always has the marker to code
    assert!(build_table(&[]).is_ok());
}

#[test]
fn test_build_error_converts_to_verify_error() {
    let e: VerifyError = BuildError::DepthLimitDiverged { depth: 40 }.into();
    assert!(matches!(e, VerifyError::Build(_)));
    assert!(e.to_string().contains("40"));
    assert!(std::error::Error::source(&e).is_some());
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 2: Huffman-layer damage
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_random_bytes_never_panic() {
    let book = build_table(&lorem(3000)).unwrap();
    for seed in 1..50u64 {
        let junk = noise(256, seed);
        let out = decode(&junk, book.tree(), book.marker(), 1024);
        assert!(out.errors <= 1024 * hufflz::MAX_MATCH + 1);
    }
}

#[test]
fn test_zero_length_input_with_nonzero_outsize() {
    let book = build_table(b"abc").unwrap();
    let out = decode(&[], book.tree(), book.marker(), 10);
    assert_eq!(
        out.huffman_error,
        Some(DecodeError::Truncated {
            produced: 0,
            expected: 10
        })
    );
    assert_eq!(out.errors, 1);
    assert!(out.bytes.is_empty());
}

#[test]
fn test_invalid_code_from_partial_tree() {
    // only a one-symbol tree has a missing branch
    let mut counts = [0u64; 256];
    counts[9] = 1;
    let lonely = HuffmanTree::build(&Histogram::from_counts(&counts)).unwrap();
    let err = HuffmanDecoder::new(&lonely, 0).decode(&[0xFF], 1).unwrap_err();
    assert_eq!(err, DecodeError::InvalidCode { produced: 0 });
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 3: LZ77-layer damage
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_lz_errors_counted_per_position() {
    // 0x00 marker; length 18 offset 0x7F0 before any output
    let (out, errors) = lz77::decode(&[0x00, 0x00, 0xF0, 0x7F]);
    assert_eq!(out.len(), 18);
    assert_eq!(errors, 18);
}

#[test]
fn test_lz_truncated_token_stops() {
    let (out, errors) = lz77::decode(&[0x00, b'x', b'y', 0x00, 0x41, 0x85]);
    assert_eq!(out, b"xy");
    assert_eq!(errors, 1);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 4: inconsistent metadata
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_metadata_errors() {
    let data = lorem(1000);
    let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();

    let mut bad_fvp = output_for(&verifier, 0);
    bad_fvp.first_valid_position = 1000;
    assert!(matches!(
        verifier.verify(&bad_fvp),
        Err(VerifyError::FirstValidPosition { fvp: 1000 })
    ));

    let mut bad_size = output_for(&verifier, 0);
    bad_size.huffman_size = usize::MAX;
    assert!(matches!(
        verifier.verify(&bad_size),
        Err(VerifyError::HuffmanSize { .. })
    ));
}

#[test]
fn test_oversized_lz_size_is_a_huffman_error() {
    let data = lorem(2000);
    let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
    let mut out = output_for(&verifier, 0);
    out.lz_size += 10_000;
    let report = verifier.verify(&out).unwrap();
    assert!(report.huffman_error.is_some());
    assert!(!report.passed());
}

#[test]
fn test_empty_word_buffer() {
    let data = lorem(640);
    let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
    let out = AcceleratorOutput {
        words: Vec::new(),
        first_valid_position: 0,
        lz_size: 100,
        huffman_size: 0,
    };
    let report = verifier.verify(&out).unwrap();
    assert!(!report.passed());
    assert!(report.huffman_error.is_some());
    // the unencoded tail is all literals, so only the gap is wrong
    assert_eq!(report.lz_errors, 0);
    assert!(report.mismatch_count >= data.len() - 16);
}

// ═════════════════════════════════════════════════════════════════════════════
// Test 5: Display
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn test_error_messages() {
    let messages = [
        BuildError::EmptyAlphabet.to_string(),
        BuildError::TooManyNodes { nodes: 600 }.to_string(),
        BuildError::DeepNodeMissing { level: 16 }.to_string(),
        BuildError::SurrogateMissing { below: 16 }.to_string(),
        BuildError::CodeTooLong { symbol: 7, bits: 17 }.to_string(),
        DecodeError::InvalidCode { produced: 3 }.to_string(),
        TreeFormatError::Truncated.to_string(),
        BitstreamError::Exhausted { byte_pos: 2 }.to_string(),
        VerifyError::HuffmanSize {
            huffman_size: 9,
            available: 8,
        }
        .to_string(),
    ];
    for m in &messages {
        assert!(!m.is_empty());
    }
    assert!(messages[1].contains("600"));
    assert!(messages[4].contains("17"));
}
