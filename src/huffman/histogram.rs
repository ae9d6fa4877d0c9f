//! Byte-frequency histogram and marker selection.
//!
//! The histogram always holds [`ALPHABET_SIZE`] entries, one per byte value,
//! indexed by the value itself.  Code assignment later writes each symbol's
//! `(code, bits)` back into its entry.

use crate::config::ALPHABET_SIZE;

/// One histogram bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistogramEntry {
    pub symbol: u8,
    pub count: u64,
    /// Code bits, right-justified.  Valid once codes have been assigned.
    pub code: u32,
    /// Code length in bits; 0 for symbols that received no code.
    pub bits: u32,
}

/// Per-byte frequency table plus the marker chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    entries: [HistogramEntry; ALPHABET_SIZE],
    marker: u8,
}

impl Histogram {
    /// Count every byte of `data` and select the marker.
    ///
    /// An empty buffer yields all-zero counts and marker 0.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &b in data {
            counts[b as usize] += 1;
        }
        Self::from_counts(&counts)
    }

    /// Build a histogram from explicit counts.
    pub fn from_counts(counts: &[u64; ALPHABET_SIZE]) -> Self {
        let mut entries = [HistogramEntry::default(); ALPHABET_SIZE];
        for (k, e) in entries.iter_mut().enumerate() {
            e.symbol = k as u8;
            e.count = counts[k];
        }
        Histogram {
            entries,
            marker: select_marker(counts),
        }
    }

    /// The byte value reserved as the marker for this input.
    #[inline]
    pub fn marker(&self) -> u8 {
        self.marker
    }

    #[inline]
    pub fn entries(&self) -> &[HistogramEntry; ALPHABET_SIZE] {
        &self.entries
    }

    #[inline]
    pub fn entries_mut(&mut self) -> &mut [HistogramEntry; ALPHABET_SIZE] {
        &mut self.entries
    }

    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.entries[symbol as usize].count
    }

    /// Overwrite one symbol's count.  Used to boost the marker before the
    /// tree is built.
    #[inline]
    pub fn set_count(&mut self, symbol: u8, count: u64) {
        self.entries[symbol as usize].count = count;
    }

    /// Number of symbols with a non-zero count.
    pub fn active_symbols(&self) -> usize {
        self.entries.iter().filter(|e| e.count > 0).count()
    }
}

/// Pick the leftmost value attaining the minimum count.
///
/// Scans `counts` in index order and moves the marker only on a strictly
/// smaller count, so ties keep the lower value.  An empty slice yields 0.
pub fn select_marker(counts: &[u64]) -> u8 {
    let mut marker = 0usize;
    for (k, &c) in counts.iter().enumerate().take(ALPHABET_SIZE) {
        if c < counts[marker] {
            marker = k;
        }
    }
    marker as u8
}
