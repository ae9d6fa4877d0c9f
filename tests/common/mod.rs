// Shared test support: a software stand-in for the accelerator and input
// generators.
//
// The encoder is deliberately simple (greedy matching over a short hash
// chain); it only has to produce streams in the accelerator's format using
// the host's code table, not match its compression ratio.

#![allow(dead_code)]

use std::collections::HashMap;
use std::convert::Infallible;

use hufflz::bitstream::BitWriter;
use hufflz::config::{ACCELERATOR_VEC, MAX_MATCH, MAX_OFFSET, MIN_MATCH};
use hufflz::lz77::push_literal;
use hufflz::verify::{Accelerator, AcceleratorOutput};
use hufflz::{CodeBook, CodeTable};

const CHAIN_DEPTH: usize = 32;

/// LZ77-layer encoding of `input` with `marker` as the escape byte.
pub fn lz_encode(input: &[u8], marker: u8) -> Vec<u8> {
    let mut out = vec![marker];
    let mut chains: HashMap<[u8; 3], Vec<usize>> = HashMap::new();
    let mut pos = 0;

    while pos < input.len() {
        let found = if pos + MIN_MATCH <= input.len() {
            best_match(input, pos, &chains)
        } else {
            None
        };

        let step = match found {
            Some((length, offset)) => {
                push_match(&mut out, marker, length, offset);
                length
            }
            None => {
                push_literal(&mut out, input[pos], marker);
                1
            }
        };

        for p in pos..pos + step {
            if p + MIN_MATCH <= input.len() {
                let key = [input[p], input[p + 1], input[p + 2]];
                let chain = chains.entry(key).or_default();
                chain.push(p);
                if chain.len() > CHAIN_DEPTH {
                    chain.remove(0);
                }
            }
        }
        pos += step;
    }
    out
}

fn best_match(input: &[u8], pos: usize, chains: &HashMap<[u8; 3], Vec<usize>>) -> Option<(usize, usize)> {
    let key = [input[pos], input[pos + 1], input[pos + 2]];
    let chain = chains.get(&key)?;
    let limit = MAX_MATCH.min(input.len() - pos);
    let mut best: Option<(usize, usize)> = None;

    for &cand in chain.iter().rev() {
        let offset = pos - cand;
        if offset > MAX_OFFSET {
            continue;
        }
        let mut length = 0;
        while length < limit && input[cand + length] == input[pos + length] {
            length += 1;
        }
        // A 3-byte match whose low offset nibble is zero would encode as a
        // zero token byte, which reads back as a literal marker.
        if length == MIN_MATCH && offset & 0xF == 0 {
            continue;
        }
        if length >= MIN_MATCH && best.map_or(true, |(l, _)| length > l) {
            best = Some((length, offset));
        }
    }
    best
}

/// Append a back-reference token.
pub fn push_match(out: &mut Vec<u8>, marker: u8, length: usize, offset: usize) {
    assert!((MIN_MATCH..=MAX_MATCH).contains(&length));
    assert!(offset >= 1 && offset <= MAX_OFFSET);
    let token = (((length - MIN_MATCH) << 4) | (offset & 0xF)) as u8;
    assert_ne!(token, 0);
    out.push(marker);
    out.push(token);
    let hi = (offset >> 11) as u8;
    let mid = ((offset >> 4) & 0x7F) as u8;
    if hi != 0 {
        out.push(mid | 0x80);
        out.push(hi);
    } else {
        out.push(mid);
    }
}

/// Huffman-layer encoding of an LZ77-layer stream.
pub fn huffman_encode(lz: &[u8], table: &CodeTable, marker: u8) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut w = BitWriter::new(&mut buf);
    let mut k = 0;

    while k < lz.len() {
        let byte = lz[k];
        let code = table.get(byte);
        assert!(code.bits > 0, "symbol {byte} has no code");
        w.write_bits(code.code as u32, code.bits as u32);
        k += 1;

        if byte == marker && k > 1 {
            let length = lz[k];
            w.write_bits(length as u32, 8);
            k += 1;
            if length != 0 {
                let first = lz[k];
                w.write_bits(first as u32, 8);
                k += 1;
                if first & 0x80 != 0 {
                    w.write_bits(lz[k] as u32, 8);
                    k += 1;
                }
            }
        }
    }
    buf
}

/// Both layers: returns the Huffman stream and the LZ-layer size.
pub fn encode(input: &[u8], book: &CodeBook) -> (Vec<u8>, usize) {
    let lz = lz_encode(input, book.marker());
    let compressed = huffman_encode(&lz, book.table(), book.marker());
    (compressed, lz.len())
}

/// Two bytes per word, first byte high.
pub fn pack_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|c| u16::from_be_bytes([c[0], c.get(1).copied().unwrap_or(0)]))
        .collect()
}

/// Accelerator model: encodes everything except the last vector's bytes from
/// `fvp` onward.
pub struct SoftwareAccelerator {
    pub fvp: usize,
}

impl Accelerator for SoftwareAccelerator {
    type Error = Infallible;

    fn compress(&mut self, input: &[u8], table: &CodeTable, marker: u8) -> Result<AcceleratorOutput, Infallible> {
        let encoded = (input.len().saturating_sub(ACCELERATOR_VEC) + self.fvp).min(input.len());
        let lz = lz_encode(&input[..encoded], marker);
        let bytes = huffman_encode(&lz, table, marker);
        Ok(AcceleratorOutput {
            words: pack_words(&bytes),
            first_valid_position: self.fvp,
            lz_size: lz.len(),
            huffman_size: bytes.len(),
        })
    }
}

// ── Input generators ──────────────────────────────────────────────────────────

/// Repetitive English-like text of exactly `size` bytes.
pub fn lorem(size: usize) -> Vec<u8> {
    const LOREM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
        sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
        Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi \
        ut aliquip ex ea commodo consequat. ";
    LOREM.iter().copied().cycle().take(size).collect()
}

/// Deterministic xorshift bytes.
pub fn noise(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed | 1;
    (0..size)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 7;
            s ^= s << 17;
            (s >> 24) as u8
        })
        .collect()
}

/// Mostly one byte, with a geometric tail of rarer ones.
pub fn skewed(size: usize) -> Vec<u8> {
    noise(size, 0x5EED)
        .into_iter()
        .map(|b| b'a' + b.leading_zeros() as u8) // P(k) ~ 2^-(k+1)
        .collect()
}
