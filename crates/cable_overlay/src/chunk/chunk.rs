//! Chunk data structure holding one cable bitmask per layer.

use glam::UVec2;

use crate::core::{words_per_layer, CableLayer, LAYER_COUNT, MAX_CHUNK_SIZE};
use crate::error::CableError;
use crate::index::{index_from_local, local_from_index};
use super::coord::ChunkCoord;
use super::mask::LayerMask;

/// A square block of `chunk_size × chunk_size` tiles.
///
/// Each layer's mask has one bit per tile; a set bit means a cable of that
/// layer occupies the tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    origin: ChunkCoord,

    /// Monotonically increasing version, incremented on any edit.
    pub data_version: u64,

    chunk_size: u32,
    layers: [LayerMask; LAYER_COUNT],
}

impl Chunk {
    /// Create a new empty chunk at the given coordinate.
    ///
    /// # Panics
    /// Panics if `chunk_size` is 0 or above [`MAX_CHUNK_SIZE`], or if the
    /// chunk lies entirely outside `i32` tile space.
    pub fn new(origin: ChunkCoord, chunk_size: u32) -> Self {
        match Self::try_new(origin, chunk_size) {
            Ok(chunk) => chunk,
            Err(err) => panic!("{err}"),
        }
    }

    /// Create a new empty chunk, rejecting bad sizes and unaddressable coordinates.
    pub fn try_new(origin: ChunkCoord, chunk_size: u32) -> Result<Self, CableError> {
        if !(1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
            return Err(CableError::InvalidChunkSize { got: chunk_size, max: MAX_CHUNK_SIZE });
        }
        if !origin.is_addressable(chunk_size) {
            return Err(CableError::CoordOutOfRange { coord: origin, chunk_size });
        }
        Ok(Self {
            origin,
            data_version: 0,
            chunk_size,
            layers: std::array::from_fn(|_| LayerMask::new(chunk_size)),
        })
    }

    /// Build a chunk from raw per-layer words, as replicated by the producer.
    ///
    /// `words` holds `LAYER_COUNT` consecutive layer masks in layer order.
    pub fn from_words(origin: ChunkCoord, chunk_size: u32, words: &[u64]) -> Result<Self, CableError> {
        let mut chunk = Self::try_new(origin, chunk_size)?;

        let stride = words_per_layer(chunk_size);
        if words.len() != stride * LAYER_COUNT {
            return Err(CableError::MaskWidth {
                got: words.len(),
                expected: stride * LAYER_COUNT,
                chunk_size,
            });
        }

        for (layer, layer_words) in CableLayer::ALL.iter().zip(words.chunks_exact(stride)) {
            chunk.layers[layer.index()] = LayerMask::from_words(layer_words.to_vec(), chunk_size)?;
        }
        Ok(chunk)
    }

    /// Chunk coordinate in chunk-space. Fixed for the chunk's lifetime.
    #[inline]
    pub fn origin(&self) -> ChunkCoord {
        self.origin
    }

    /// Tiles per chunk edge.
    #[inline]
    pub fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    /// Mask for a layer.
    #[inline]
    pub fn layer(&self, layer: CableLayer) -> &LayerMask {
        &self.layers[layer.index()]
    }

    /// Check if a cable of `layer` occupies the local tile.
    #[inline]
    pub fn has_cable(&self, layer: CableLayer, local: UVec2) -> bool {
        self.layers[layer.index()].get(index_from_local(local, self.chunk_size))
    }

    /// Place a cable at local coordinates.
    ///
    /// Automatically increments data_version.
    pub fn set_cable(&mut self, layer: CableLayer, local: UVec2) {
        let index = index_from_local(local, self.chunk_size);
        self.layers[layer.index()].set(index);
        self.data_version += 1;
    }

    /// Remove a cable at local coordinates.
    pub fn clear_cable(&mut self, layer: CableLayer, local: UVec2) {
        let index = index_from_local(local, self.chunk_size);
        self.layers[layer.index()].clear(index);
        self.data_version += 1;
    }

    /// Replace a whole layer mask.
    ///
    /// # Panics
    /// Panics if the mask was built for a different chunk size.
    pub fn set_layer(&mut self, layer: CableLayer, mask: LayerMask) {
        assert_eq!(
            mask.tiles(),
            (self.chunk_size * self.chunk_size) as usize,
            "mask width does not match chunk size {}",
            self.chunk_size
        );
        self.layers[layer.index()] = mask;
        self.data_version += 1;
    }

    /// Local offsets of every cable tile on a layer, in index order.
    pub fn cable_tiles(&self, layer: CableLayer) -> impl Iterator<Item = UVec2> + '_ {
        let size = self.chunk_size;
        self.layers[layer.index()].iter_ones().map(move |i| local_from_index(i, size))
    }

    /// Count cable tiles across all layers.
    pub fn cable_count(&self) -> usize {
        self.layers.iter().map(LayerMask::count).sum()
    }

    /// Check if no layer carries any cable.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(LayerMask::is_empty)
    }
}
