//! Cable overlay decoding for chunked tile grids.
//!
//! Power cables are stored as per-chunk bitmasks, one mask per cable layer.
//! This crate turns those masks into the minimal set of axis-aligned line
//! segments that reproduces every tile-to-tile connection, so an overlay can
//! draw a whole network in a handful of lines per layer.
//!
//! # Example
//!
//! ```
//! use cable_overlay::{decode, CableLayer, ChunkStore, OverlayConfig};
//! use glam::{IVec2, Vec2};
//!
//! let mut store = ChunkStore::new(8);
//! // An L-shaped run crossing a chunk border.
//! for x in 5..12 {
//!     store.set_cable(IVec2::new(x, 0), CableLayer::Medium);
//! }
//! store.set_cable(IVec2::new(11, 1), CableLayer::Medium);
//!
//! let segments = decode(&store, &OverlayConfig::world_aligned(1.0));
//! assert_eq!(segments.len(), 2);
//! assert_eq!(segments[0].origin, Vec2::new(5.0, 0.0));
//! assert_eq!(segments[0].terminus, Vec2::new(11.0, 0.0));
//! ```

pub mod core;
pub mod error;
pub mod config;
pub mod index;
pub mod chunk;
pub mod adjacency;
pub mod stitch;
pub mod decode;
pub mod render;
pub mod overlay;

// Re-export primary types
pub use crate::core::{
    Axis,
    CableLayer,
    Segment,
    TileSegment,
    // Constants
    DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE, LAYER_COUNT,
    words_per_layer,
};
pub use crate::error::CableError;
pub use crate::config::{OverlayConfig, YAxis};
pub use crate::chunk::{Chunk, ChunkCoord, ChunkSource, ChunkStore, LayerMask};
pub use crate::adjacency::{Direction, NeighborResolver};

// Re-export main entry points
pub use crate::decode::{decode, decode_tiles, decode_tiles_with, decode_with_stats, DecodeStats};
pub use crate::render::{LayerBatches, LayerVisibility, LineVertex, ViewRect};
pub use crate::overlay::CableOverlay;
