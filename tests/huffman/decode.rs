// Huffman-layer decoder and the marker escape protocol.
//
// Coverage:
//   - header marker at position 0 is not an escape
//   - literal marker: marker then a raw 0x00 length byte
//   - match tokens with one and two raw offset bytes, at unaligned bit positions
//   - output stops at exactly `outsize`
//   - truncation and invalid codes, with partial output kept

use crate::common::{huffman_encode, lorem, lz_encode, noise, push_match};

use hufflz::bitstream::BitWriter;
use hufflz::config::ALPHABET_SIZE;
use hufflz::huffman::{DecodeError, Histogram, HuffmanDecoder, HuffmanTree};
use hufflz::lz77::push_literal;
use hufflz::{build_table, CodeBook};

/// Code book for streams built from the bytes of `text`.
fn book_for(text: &[u8]) -> CodeBook {
    build_table(text).unwrap()
}

fn roundtrip(book: &CodeBook, lz: &[u8]) -> Vec<u8> {
    let bits = huffman_encode(lz, book.table(), book.marker());
    book.decoder().decode(&bits, lz.len()).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Escapes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn header_marker_is_not_an_escape() {
    let book = book_for(b"abc");
    let m = book.marker();
    // if the header were an escape, 'a' would be read as a raw length byte
    let lz = vec![m, b'a', b'b', b'c'];
    assert_eq!(roundtrip(&book, &lz), lz);
}

#[test]
fn literal_marker_passes_zero_length_raw() {
    let book = book_for(b"xyz");
    let m = book.marker();
    let mut lz = vec![m];
    for &b in &[b'x', m, b'y', m, m, b'z'] {
        push_literal(&mut lz, b, m);
    }
    assert_eq!(roundtrip(&book, &lz), lz);
}

#[test]
fn two_and_three_byte_tokens_pass_raw() {
    let text = lorem(64);
    let book = book_for(&text);
    let m = book.marker();
    let mut lz = vec![m];
    lz.extend_from_slice(&text[..40]);
    push_match(&mut lz, m, 5, 33); // one offset byte
    lz.push(text[0]);
    push_match(&mut lz, m, 18, 4000); // continuation byte
    lz.push(text[1]);
    assert_eq!(roundtrip(&book, &lz), lz);
}

#[test]
fn raw_fields_may_hold_any_byte() {
    // raw bytes equal to the marker or to unused symbols must not be
    // tree-decoded
    let book = book_for(b"ab");
    let m = book.marker();
    let mut lz = vec![m, b'a'];
    lz.extend_from_slice(&[m, 0xF0 | (m & 0x0F), m | 0x80, m & 0x7F]);
    lz.push(b'b');
    let bits = huffman_encode(&lz, book.table(), m);
    let out = book.decoder().decode(&bits, lz.len()).unwrap();
    assert_eq!(out, lz);
}

#[test]
fn escape_fields_are_unaligned() {
    // three symbols give 1- and 2-bit codes, so raw bytes start mid-byte
    let book = book_for(b"aab");
    let m = book.marker();
    let lz = vec![m, b'a', m, 0x13, 0x05, b'b', m, 0x00, b'a'];
    let bits = huffman_encode(&lz, book.table(), m);
    let total: u32 = [m, b'a', m, b'b', m, b'a']
        .iter()
        .map(|&s| book.table().get(s).bits as u32)
        .sum::<u32>()
        + 3 * 8;
    assert_eq!(bits.len(), total.div_ceil(8) as usize);
    assert_eq!(book.decoder().decode(&bits, lz.len()).unwrap(), lz);
}

#[test]
fn full_lz_stream_of_noise() {
    let data = noise(4096, 99);
    let book = book_for(&data);
    let lz = lz_encode(&data, book.marker());
    assert_eq!(roundtrip(&book, &lz), lz);
}

// ─────────────────────────────────────────────────────────────────────────────
// Output size
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stops_at_outsize() {
    let book = book_for(b"abcd");
    let m = book.marker();
    let lz = vec![m, b'a', b'b', b'c', b'd'];
    let bits = huffman_encode(&lz, book.table(), m);
    assert_eq!(book.decoder().decode(&bits, 3).unwrap(), &lz[..3]);
    assert_eq!(book.decoder().decode(&bits, 0).unwrap(), b"");
}

#[test]
fn decode_into_appends() {
    let book = book_for(b"ab");
    let m = book.marker();
    let lz = vec![m, b'a', b'b'];
    let bits = huffman_encode(&lz, book.table(), m);
    let mut out = b"prefix".to_vec();
    book.decoder().decode_into(&bits, lz.len(), &mut out).unwrap();
    assert_eq!(&out[..6], b"prefix");
    assert_eq!(&out[6..], &lz[..]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_input_is_truncated() {
    let book = book_for(b"ab");
    assert_eq!(
        book.decoder().decode(&[], 1),
        Err(DecodeError::Truncated {
            produced: 0,
            expected: 1
        })
    );
}

#[test]
fn truncation_keeps_partial_output() {
    let text = lorem(200);
    let book = book_for(&text);
    let mut lz = vec![book.marker()];
    lz.extend_from_slice(&text);
    let bits = huffman_encode(&lz, book.table(), book.marker());

    let mut out = Vec::new();
    let err = book
        .decoder()
        .decode_into(&bits[..bits.len() / 2], lz.len(), &mut out)
        .unwrap_err();
    match err {
        DecodeError::Truncated { produced, expected } => {
            assert_eq!(expected, lz.len());
            assert_eq!(produced, out.len());
            assert!(produced > 0 && produced < lz.len());
        }
        other => panic!("expected truncation, got {other:?}"),
    }
    assert_eq!(out, &lz[..out.len()]);
}

#[test]
fn truncated_raw_field_is_reported() {
    let book = book_for(b"ab");
    let m = book.marker();
    // header, 'a', then a match whose offset bytes never arrive
    let mut bits = Vec::new();
    let mut w = BitWriter::new(&mut bits);
    for s in [m, b'a', m] {
        let c = book.table().get(s);
        w.write_bits(c.code as u32, c.bits as u32);
    }
    w.write_bits(0x20, 8);
    let err = book.decoder().decode(&bits, 5).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Truncated {
            produced: 4,
            expected: 5
        }
    );
}

#[test]
fn missing_branch_is_an_invalid_code() {
    // one-symbol tree: only the 0 branch exists
    let mut counts = [0u64; ALPHABET_SIZE];
    counts[b'k' as usize] = 10;
    let tree = HuffmanTree::build(&Histogram::from_counts(&counts)).unwrap();
    let decoder = HuffmanDecoder::new(&tree, 0);
    assert_eq!(decoder.decode(&[0x00], 8).unwrap(), [b'k'; 8]);
    let err = decoder.decode(&[0x40], 8).unwrap_err();
    assert_eq!(err, DecodeError::InvalidCode { produced: 1 });
    assert!(err.to_string().contains('1'));
}
