//! E2E Test Suite: Table → Accelerator → Verify
//!
//! Runs the whole host flow over a spread of inputs:
//! - build the code book from the processed prefix
//! - compress on the software accelerator model
//! - unpack its word buffer, decode both layers, re-attach the tail
//! - compare with the original
//!
//! Also checks that the tables handed to the accelerator stay within the
//! 16-bit code bound whatever the input.

#[path = "../tests/common/mod.rs"]
mod common;

use common::{encode, lorem, noise, skewed, SoftwareAccelerator};
use hufflz::config::ACCELERATOR_VEC;
use hufflz::{build_table, decode, TableConfig, Verifier, MAX_HUFFCODE_BITS};

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: typical text at many sizes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_text_at_many_sizes() {
    for size in [0, 1, 31, 32, 33, 100, 4095, 4096, 4097, 100_000] {
        let data = lorem(size);
        let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
        let report = verifier.run(&mut SoftwareAccelerator { fvp: 7 }).unwrap();
        assert!(report.passed(), "size {size}: {report:?}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: incompressible and skewed data
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_noise_and_skewed() {
    for data in [noise(65_536 + 3, 5), skewed(65_536 + 21)] {
        let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
        for fvp in [0, ACCELERATOR_VEC / 2, ACCELERATOR_VEC] {
            let report = verifier.run(&mut SoftwareAccelerator { fvp }).unwrap();
            assert!(report.passed(), "fvp {fvp}: {report:?}");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: long runs and long-range repeats
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_runs_and_far_repeats() {
    let block = noise(3000, 77);
    let mut data = vec![0u8; 5000];
    data.extend_from_slice(&block);
    data.extend(std::iter::repeat(0xEE).take(700));
    data.extend_from_slice(&block);
    data.extend_from_slice(&lorem(2000));
    data.extend_from_slice(&block);

    let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
    let report = verifier.run(&mut SoftwareAccelerator { fvp: 0 }).unwrap();
    assert!(report.passed(), "{report:?}");
    // the repeats compress well even with the simple host model
    assert!(report.compression_ratio() < 0.9);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: every byte value, marker present
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..64).flat_map(|k| (0..=255u8).map(move |b| b.wrapping_mul(k | 1))).collect();
    let verifier = Verifier::new(&data, &TableConfig::default()).unwrap();
    assert!(data.contains(&verifier.book().marker()));
    let report = verifier.run(&mut SoftwareAccelerator { fvp: 12 }).unwrap();
    assert!(report.passed(), "{report:?}");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: direct decode of a full-input encoding
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decode_full_input() {
    let data = lorem(50_000);
    let book = build_table(&data).unwrap();
    let (compressed, lz_len) = encode(&data, &book);
    assert!(compressed.len() < data.len() / 2);
    let out = decode(&compressed, book.tree(), book.marker(), lz_len);
    assert_eq!(out.errors, 0);
    assert_eq!(out.bytes, data);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: code bound on adversarial histograms
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_code_bound_on_fibonacci_input() {
    // symbol k repeated Fib(k) times; 25 symbols keep the input small
    let mut data = Vec::new();
    let (mut a, mut b) = (1usize, 1usize);
    for sym in 0..25u8 {
        data.extend(std::iter::repeat(b'A' + sym).take(a));
        let next = a + b;
        a = b;
        b = next;
    }
    let book = build_table(&data).unwrap();
    assert!(book.table().max_bits() as u32 <= MAX_HUFFCODE_BITS);
    assert!(book.table().is_prefix_free());

    let (compressed, lz_len) = encode(&data, &book);
    let out = decode(&compressed, book.tree(), book.marker(), lz_len);
    assert_eq!(out.errors, 0);
    assert_eq!(out.bytes, data);
}
