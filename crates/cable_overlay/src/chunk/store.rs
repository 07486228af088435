//! Chunk store: sparse map from chunk coordinate to cable chunk.

use std::collections::HashMap;

use glam::IVec2;

use crate::core::{CableLayer, DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE};
use crate::error::CableError;
use super::chunk::Chunk;
use super::coord::ChunkCoord;

/// Read-only view of a chunked cable grid.
///
/// This is the only thing the decoder needs from the cable-network owner.
/// Absence of a chunk means no cable anywhere in it.
pub trait ChunkSource {
    /// Tiles per chunk edge; every chunk yielded by the source has this size.
    fn chunk_size(&self) -> u32;

    /// Look up a chunk by coordinate.
    fn get(&self, coord: ChunkCoord) -> Option<&Chunk>;

    /// Iterate all chunks. Order is unspecified.
    fn chunks(&self) -> impl Iterator<Item = &Chunk>;
}

/// Owned chunk storage with edit helpers at world tile coordinates.
///
/// Every mutation bumps [`ChunkStore::version`], which lets cached
/// consumers tell whether a decode is stale.
#[derive(Clone, Debug)]
pub struct ChunkStore {
    chunk_size: u32,
    chunks: HashMap<ChunkCoord, Chunk>,
    version: u64,
}

impl ChunkStore {
    /// Create an empty store.
    ///
    /// # Panics
    /// Panics if `chunk_size` is 0 or above [`MAX_CHUNK_SIZE`].
    pub fn new(chunk_size: u32) -> Self {
        assert!(
            (1..=MAX_CHUNK_SIZE).contains(&chunk_size),
            "chunk size {chunk_size} out of range"
        );
        Self {
            chunk_size,
            chunks: HashMap::new(),
            version: 0,
        }
    }

    /// Store change counter.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ========================================================================
    // Chunk Access
    // ========================================================================

    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access counts as an edit and bumps the store version.
    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        let chunk = self.chunks.get_mut(&coord)?;
        self.version += 1;
        Some(chunk)
    }

    /// Get or create a chunk at the given coordinate.
    pub fn get_or_create_chunk(&mut self, coord: ChunkCoord) -> &mut Chunk {
        self.version += 1;
        let size = self.chunk_size;
        self.chunks.entry(coord).or_insert_with(|| Chunk::new(coord, size))
    }

    /// Insert a chunk, replacing any chunk at the same coordinate.
    ///
    /// Rejects chunks built for a different chunk size so malformed data
    /// never reaches the decoder.
    pub fn insert(&mut self, chunk: Chunk) -> Result<Option<Chunk>, CableError> {
        if chunk.chunk_size() != self.chunk_size {
            return Err(CableError::ChunkSizeMismatch {
                coord: chunk.origin(),
                got: chunk.chunk_size(),
                expected: self.chunk_size,
            });
        }
        self.version += 1;
        Ok(self.chunks.insert(chunk.origin(), chunk))
    }

    pub fn has_chunk(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn remove_chunk(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let removed = self.chunks.remove(&coord);
        if removed.is_some() {
            self.version += 1;
        }
        removed
    }

    /// Number of chunks in the store.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over all chunks.
    pub fn iter_chunks(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    /// Drop chunks with no cable on any layer. Returns how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_empty());
        let removed = before - self.chunks.len();
        if removed > 0 {
            self.version += 1;
        }
        removed
    }

    /// Clear all chunks.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.version += 1;
    }

    // ========================================================================
    // Tile Access
    // ========================================================================

    /// Check if a cable of `layer` occupies the world tile.
    pub fn has_cable(&self, tile: IVec2, layer: CableLayer) -> bool {
        let coord = ChunkCoord::from_tile(tile, self.chunk_size);
        let local = ChunkCoord::tile_to_local(tile, self.chunk_size);
        self.chunks
            .get(&coord)
            .map(|c| c.has_cable(layer, local))
            .unwrap_or(false)
    }

    /// Place a cable at a world tile, creating the chunk if needed.
    pub fn set_cable(&mut self, tile: IVec2, layer: CableLayer) {
        let coord = ChunkCoord::from_tile(tile, self.chunk_size);
        let local = ChunkCoord::tile_to_local(tile, self.chunk_size);
        self.get_or_create_chunk(coord).set_cable(layer, local);
    }

    /// Remove a cable at a world tile. Missing chunks are left absent.
    pub fn clear_cable(&mut self, tile: IVec2, layer: CableLayer) {
        let coord = ChunkCoord::from_tile(tile, self.chunk_size);
        let local = ChunkCoord::tile_to_local(tile, self.chunk_size);
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.clear_cable(layer, local);
            self.version += 1;
        }
    }

    /// Place cables along a straight or arbitrary list of tiles.
    pub fn set_cables(&mut self, tiles: impl IntoIterator<Item = IVec2>, layer: CableLayer) {
        for tile in tiles {
            self.set_cable(tile, layer);
        }
    }
}

impl Default for ChunkStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkSource for ChunkStore {
    fn chunk_size(&self) -> u32 {
        self.chunk_size
    }

    fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }
}
