//! LZ77-layer decoder.
//!
//! Stream layout: one header byte naming the marker, then a sequence of
//! literals and escapes.  A marker followed by `0x00` is a literal marker
//! byte.  A marker followed by anything else starts a back-reference:
//!
//! ```text
//!  marker | LLLL oooo | c ooooooo | [ - ooooooo ]
//!           length-3    bits 4-10    bits 11-17, present when c = 1
//!           bits 0-3
//! ```
//!
//! Corrupt back-references never read outside the output: each position
//! they cannot fill gets [`PLACEHOLDER_BYTE`] and counts one error, and
//! decoding carries on.

use crate::config::{MIN_MATCH, OFFSET_CONTINUATION, PLACEHOLDER_BYTE};

/// A decoded back-reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub length: usize,
    pub offset: usize,
}

/// Parse the length/offset fields that follow a marker, starting at
/// `src[pos]` (the non-zero length byte).  Returns the match and the number
/// of bytes consumed, or `None` if `src` ends inside the token.
pub fn parse_match(src: &[u8], pos: usize) -> Option<(Match, usize)> {
    let token = *src.get(pos)?;
    let length = (token >> 4) as usize + MIN_MATCH;
    let mut offset = (token & 0x0F) as usize;

    let mid = *src.get(pos + 1)?;
    offset |= ((mid & 0x7F) as usize) << 4;
    let mut consumed = 2;

    if mid & OFFSET_CONTINUATION != 0 {
        let hi = *src.get(pos + 2)?;
        offset |= ((hi & 0x7F) as usize) << 11;
        consumed = 3;
    }

    Some((Match { length, offset }, consumed))
}

/// Decode `src` and return the output together with the error count.
pub fn decode(src: &[u8]) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let errors = decode_into(src, &mut out);
    (out, errors)
}

/// Decode `src`, appending to `out`.  Returns the number of errors; 0 means
/// a clean decode.
///
/// Positions and offsets are counted from where `out` ended on entry.  An
/// empty `src` is a no-op.  A stream that ends inside an escape counts one
/// error and stops.
pub fn decode_into(src: &[u8], out: &mut Vec<u8>) -> usize {
    let Some((&marker, body)) = src.split_first() else {
        return 0;
    };
    let base = out.len();
    let mut errors = 0;
    let mut ip = 0;

    while ip < body.len() {
        let symbol = body[ip];
        ip += 1;

        if symbol != marker {
            out.push(symbol);
            continue;
        }

        match body.get(ip) {
            None => {
                crate::displaylevel!(2, "Stream ends after marker at byte {}\n", ip);
                errors += 1;
                break;
            }
            Some(0) => {
                out.push(marker);
                ip += 1;
            }
            Some(_) => {
                let Some((m, consumed)) = parse_match(body, ip) else {
                    crate::displaylevel!(2, "Stream ends inside match token at byte {}\n", ip);
                    errors += 1;
                    break;
                };
                ip += consumed;
                errors += copy_match(out, base, m);
            }
        }
    }

    errors
}

/// Copy `m.length` bytes from `m.offset` bytes back, one byte at a time so
/// that overlapping references repeat the bytes they have just written.
fn copy_match(out: &mut Vec<u8>, base: usize, m: Match) -> usize {
    let mut errors = 0;
    for _ in 0..m.length {
        let pos = out.len() - base;
        if m.offset == 0 || m.offset > pos {
            crate::displaylevel!(2, "Offset {} is greater than file position {}\n", m.offset, pos);
            out.push(PLACEHOLDER_BYTE);
            errors += 1;
        } else {
            let b = out[out.len() - m.offset];
            out.push(b);
        }
    }
    errors
}

/// Append `byte` as an LZ-layer literal: a byte equal to the marker is
/// followed by the `0x00` escape.
#[inline]
pub fn push_literal(out: &mut Vec<u8>, byte: u8, marker: u8) {
    out.push(byte);
    if byte == marker {
        out.push(0);
    }
}
