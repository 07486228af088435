//! Neighbour resolution across chunk borders.
//!
//! Only east and north neighbours are ever tested. Every unit edge is the
//! boundary between exactly two tiles, so visiting every set bit of every
//! chunk and looking east and north finds each connection exactly once with
//! no visited set.
//!
//! ```text
//!            north
//!              ▲
//!              │
//!   ┌───┬───┬──┴┬───┐ ┆ ┌───┬───
//!   │   │   │ t ├───────▶ … east (next chunk, x = 0)
//!   └───┴───┴───┴───┘ ┆ └───┴───
//! ```

use glam::UVec2;

use crate::chunk::{Chunk, ChunkSource};
use crate::core::CableLayer;
use crate::index::{index_from_local, is_east_edge, is_north_edge};

/// Direction of an adjacency check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    North,
}

/// Answers "does the tile next to this one carry the same layer?"
///
/// Implemented for every [`ChunkSource`]; tests can plug in their own to
/// exercise the decoder without a real store.
pub trait NeighborResolver {
    fn neighbor_has_cable(
        &self,
        chunk: &Chunk,
        layer: CableLayer,
        local: UVec2,
        direction: Direction,
    ) -> bool;
}

impl<S: ChunkSource> NeighborResolver for S {
    fn neighbor_has_cable(
        &self,
        chunk: &Chunk,
        layer: CableLayer,
        local: UVec2,
        direction: Direction,
    ) -> bool {
        let size = chunk.chunk_size();
        let mask = chunk.layer(layer);
        let index = index_from_local(local, size);

        match direction {
            Direction::East if !is_east_edge(local, size) => mask.get(index + 1),
            Direction::East => chunk
                .origin()
                .east()
                .and_then(|coord| self.get(coord))
                .map(|east| east.has_cable(layer, UVec2::new(0, local.y)))
                .unwrap_or(false),
            Direction::North if !is_north_edge(local, size) => mask.get(index + size as usize),
            Direction::North => chunk
                .origin()
                .north()
                .and_then(|coord| self.get(coord))
                .map(|north| north.has_cable(layer, UVec2::new(local.x, 0)))
                .unwrap_or(false),
        }
    }
}
