//! Chunked cable storage.
//!
//! - [`ChunkCoord`]: chunk-space coordinates with tile conversion
//! - [`LayerMask`]: one bit per tile, packed into `u64` words
//! - [`Chunk`]: one mask per [`CableLayer`](crate::CableLayer)
//! - [`ChunkStore`]: sparse coordinate → chunk map with tile-level editing
//! - [`ChunkSource`]: the read-only view the decoder consumes
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ ChunkStore                               │
//! │  HashMap<ChunkCoord, Chunk>              │
//! └──────────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Chunk    │   layers[High]   ─ LayerMask (size² bits)
//!   │ origin   │   layers[Medium] ─ LayerMask
//!   │ version  │   layers[Apc]    ─ LayerMask
//!   └──────────┘
//! ```

pub mod coord;
pub mod mask;
pub mod chunk;
pub mod store;

pub use coord::ChunkCoord;
pub use mask::LayerMask;
pub use chunk::Chunk;
pub use store::{ChunkSource, ChunkStore};
