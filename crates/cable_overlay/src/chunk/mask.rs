//! Per-layer tile bitmask.

use crate::core::{words_per_layer, WORD_BITS};
use crate::error::CableError;

/// One bit per tile of a chunk, packed into `u64` words.
///
/// Bit `i` lives in word `i / 64` at position `i % 64`. Bits at or beyond
/// `chunk_size²` are always zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask {
    words: Vec<u64>,
    tiles: usize,
}

impl LayerMask {
    /// Create an empty mask for a chunk of the given edge length.
    pub fn new(chunk_size: u32) -> Self {
        Self {
            words: vec![0u64; words_per_layer(chunk_size)],
            tiles: chunk_size as usize * chunk_size as usize,
        }
    }

    /// Build a mask from raw words, rejecting wrong widths and stray bits.
    pub fn from_words(words: Vec<u64>, chunk_size: u32) -> Result<Self, CableError> {
        let expected = words_per_layer(chunk_size);
        if words.len() != expected {
            return Err(CableError::MaskWidth {
                got: words.len(),
                expected,
                chunk_size,
            });
        }

        let tiles = chunk_size as usize * chunk_size as usize;
        let tail_bits = tiles % WORD_BITS;
        if tail_bits != 0 {
            let valid = (1u64 << tail_bits) - 1;
            if words[expected - 1] & !valid != 0 {
                return Err(CableError::StrayBits { tiles, chunk_size });
            }
        }

        Ok(Self { words, tiles })
    }

    /// Number of addressable tiles (`chunk_size²`).
    #[inline]
    pub fn tiles(&self) -> usize {
        self.tiles
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    #[inline]
    pub fn get(&self, index: usize) -> bool {
        debug_assert!(index < self.tiles, "bit {index} out of range ({} tiles)", self.tiles);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.tiles, "bit {index} out of range ({} tiles)", self.tiles);
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        debug_assert!(index < self.tiles, "bit {index} out of range ({} tiles)", self.tiles);
        self.words[index / WORD_BITS] &= !(1u64 << (index % WORD_BITS));
    }

    /// Count set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Iterate set bit indices in ascending order.
    ///
    /// Skips empty words entirely and walks set bits with `trailing_zeros`,
    /// so the cost is proportional to the number of set bits.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            let base = word_idx * WORD_BITS;
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(base + bit)
            })
        })
    }
}
