//! Errors raised at ingestion boundaries.
//!
//! Decoding itself cannot fail on well-formed chunks; these errors reject
//! malformed input before it reaches the decoder.

use thiserror::Error;

use crate::chunk::ChunkCoord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CableError {
    #[error("chunk size must be in 1..={max} (got {got})")]
    InvalidChunkSize { got: u32, max: u32 },

    #[error("layer mask has {got} words, expected {expected} for chunk size {chunk_size}")]
    MaskWidth {
        got: usize,
        expected: usize,
        chunk_size: u32,
    },

    #[error("layer mask sets bits beyond tile {tiles} for chunk size {chunk_size}")]
    StrayBits { tiles: usize, chunk_size: u32 },

    #[error("chunk {coord:?} has chunk size {got}, store expects {expected}")]
    ChunkSizeMismatch {
        coord: ChunkCoord,
        got: u32,
        expected: u32,
    },

    #[error("chunk {coord:?} lies outside i32 tile space for chunk size {chunk_size}")]
    CoordOutOfRange { coord: ChunkCoord, chunk_size: u32 },

    #[error("raw chunk data has {got} words, expected a multiple of {stride}")]
    RawLength { got: usize, stride: usize },

    #[error("chunk coordinate list has {coords} pairs but mask data covers {chunks} chunks")]
    ChunkCountMismatch { coords: usize, chunks: usize },

    #[error("unknown cable layer index {0}")]
    UnknownLayer(u8),

    #[error("unknown cable layer name {0:?}")]
    UnknownLayerName(String),

    #[error("tile size must be finite and > 0 (got {0})")]
    InvalidTileSize(f32),
}
