//! Sequential MSB-first bit cursors over byte buffers.
//!
//! The Huffman layer walks its tree one bit at a time ([`BitReader::read_bit`])
//! but reads escape fields as whole bytes starting at whatever bit position the
//! cursor happens to be on ([`BitReader::read_u8`]).  Bit 0 of the stream is
//! bit 7 of the first byte.
//!
//! Neither cursor owns its buffer: the reader borrows a slice, the writer
//! borrows the `Vec` it appends to.

use core::fmt;

/// Error returned when a read runs past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitstreamError {
    /// The cursor needed bits from byte `byte_pos`, which is past the end.
    Exhausted { byte_pos: usize },
}

impl fmt::Display for BitstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitstreamError::Exhausted { byte_pos } => {
                write!(f, "bitstream exhausted at byte {byte_pos}")
            }
        }
    }
}

impl std::error::Error for BitstreamError {}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

/// Read cursor: a borrowed buffer plus a byte index and a bit offset (0–7).
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u32,
}

impl<'a> BitReader<'a> {
    /// Bind a cursor to `data` at bit offset 0.
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Index of the byte the cursor is in.
    #[inline]
    pub fn byte_position(&self) -> usize {
        self.byte_pos
    }

    /// Bit offset within the current byte (0 = MSB).
    #[inline]
    pub fn bit_offset(&self) -> u32 {
        self.bit_pos
    }

    /// Total bits consumed so far.
    #[inline]
    pub fn bits_consumed(&self) -> usize {
        self.byte_pos * 8 + self.bit_pos as usize
    }

    /// Read one bit and advance by one bit, rolling over to the next byte
    /// after bit 7.
    #[inline]
    pub fn read_bit(&mut self) -> Result<u8, BitstreamError> {
        let byte = *self.data.get(self.byte_pos).ok_or(BitstreamError::Exhausted {
            byte_pos: self.byte_pos,
        })?;
        let bit = (byte >> (7 - self.bit_pos)) & 1;
        self.bit_pos = (self.bit_pos + 1) & 7;
        if self.bit_pos == 0 {
            self.byte_pos += 1;
        }
        Ok(bit)
    }

    /// Read eight bits starting at the current (possibly unaligned) position.
    ///
    /// Combines the low `8 - offset` bits of the current byte with the high
    /// `offset` bits of the next one, then advances by exactly one byte: the
    /// bit offset is unchanged.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, BitstreamError> {
        let hi = *self.data.get(self.byte_pos).ok_or(BitstreamError::Exhausted {
            byte_pos: self.byte_pos,
        })?;
        let value = if self.bit_pos == 0 {
            hi
        } else {
            let lo = *self
                .data
                .get(self.byte_pos + 1)
                .ok_or(BitstreamError::Exhausted {
                    byte_pos: self.byte_pos + 1,
                })?;
            (hi << self.bit_pos) | (lo >> (8 - self.bit_pos))
        };
        self.byte_pos += 1;
        Ok(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Writer
// ─────────────────────────────────────────────────────────────────────────────

/// Append cursor over a borrowed `Vec<u8>`.
///
/// Bits are written MSB-first.  A byte is zeroed when the cursor first enters
/// it, so callers never see stale contents past the last written bit.
#[derive(Debug)]
pub struct BitWriter<'a> {
    buf: &'a mut Vec<u8>,
    bit_pos: u32,
}

impl<'a> BitWriter<'a> {
    /// Start writing at the end of `buf`, on a fresh byte.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        BitWriter { buf, bit_pos: 0 }
    }

    /// Append the low `n` bits of `x`, most significant first.  `n` ≤ 32.
    pub fn write_bits(&mut self, x: u32, n: u32) {
        debug_assert!(n <= 32);
        for i in (0..n).rev() {
            if self.bit_pos == 0 {
                self.buf.push(0);
            }
            let bit = ((x >> i) & 1) as u8;
            let last = self.buf.len() - 1;
            let shift = 7 - self.bit_pos;
            self.buf[last] = (self.buf[last] & !(1 << shift)) | (bit << shift);
            self.bit_pos = (self.bit_pos + 1) & 7;
        }
    }

    /// Bit offset within the last byte (0 when the stream is byte-aligned).
    #[inline]
    pub fn bit_offset(&self) -> u32 {
        self.bit_pos
    }
}
