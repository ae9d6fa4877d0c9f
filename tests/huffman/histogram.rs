// Histogram counting and marker selection.

use hufflz::config::ALPHABET_SIZE;
use hufflz::huffman::{select_marker, Histogram};

#[test]
fn marker_is_leftmost_strict_minimum() {
    assert_eq!(select_marker(&[5, 5, 3, 5]), 2);
}

#[test]
fn ties_keep_the_lower_value() {
    assert_eq!(select_marker(&[2, 1, 3, 1, 1]), 1);
    assert_eq!(select_marker(&[7, 7, 7]), 0);
}

#[test]
fn empty_input_yields_zero_counts_and_marker_zero() {
    let h = Histogram::from_bytes(&[]);
    assert_eq!(h.marker(), 0);
    assert!(h.entries().iter().all(|e| e.count == 0));
    assert_eq!(h.active_symbols(), 0);
}

#[test]
fn always_256_entries_in_symbol_order() {
    let h = Histogram::from_bytes(b"hello");
    assert_eq!(h.entries().len(), ALPHABET_SIZE);
    for (k, e) in h.entries().iter().enumerate() {
        assert_eq!(e.symbol as usize, k);
        assert_eq!((e.code, e.bits), (0, 0));
    }
    assert_eq!(h.count(b'l'), 2);
    assert_eq!(h.count(b'h'), 1);
    assert_eq!(h.count(b'z'), 0);
}

#[test]
fn unused_zero_byte_is_the_marker() {
    // Text never contains 0x00, so the first absent value wins.
    let h = Histogram::from_bytes(b"plain ascii text");
    assert_eq!(h.marker(), 0);
}

#[test]
fn all_values_present_picks_rarest() {
    let mut data: Vec<u8> = (0..=255u8).flat_map(|b| [b, b, b]).collect();
    data.retain(|&b| b != 0x99);
    data.extend_from_slice(&[0x99, 0x99]);
    let h = Histogram::from_bytes(&data);
    assert_eq!(h.marker(), 0x99);

    let mut counts = [3u64; ALPHABET_SIZE];
    counts[0x99] = 2;
    assert_eq!(Histogram::from_counts(&counts).marker(), 0x99);
}

#[test]
fn boosting_overwrites_one_count() {
    let mut h = Histogram::from_bytes(b"aaaa");
    let m = h.marker();
    h.set_count(m, 10);
    assert_eq!(h.count(m), 10);
    assert_eq!(h.count(b'a'), 4);
    assert_eq!(h.active_symbols(), 2);
    // the marker itself is fixed at construction
    assert_eq!(h.marker(), m);
}
