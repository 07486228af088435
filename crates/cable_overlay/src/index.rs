//! Tile index mapping.
//!
//! Chunk masks are row-major: bit `i` addresses the tile at
//! `x = i % chunk_size`, `y = i / chunk_size`, so a run of consecutive bits
//! within one row is a horizontal run of tiles.
//!
//! ```text
//!  y
//!  3 │ 12 13 14 15
//!  2 │  8  9 10 11
//!  1 │  4  5  6  7
//!  0 │  0  1  2  3
//!    └────────────── x
//! ```

use glam::UVec2;

/// Convert a linear bit index to a chunk-local tile offset.
///
/// # Panics
/// Debug panics if `index >= chunk_size²`.
#[inline]
pub fn local_from_index(index: usize, chunk_size: u32) -> UVec2 {
    let n = chunk_size as usize;
    debug_assert!(index < n * n, "tile index {index} out of range for chunk size {chunk_size}");
    UVec2::new((index % n) as u32, (index / n) as u32)
}

/// Convert a chunk-local tile offset to its linear bit index.
///
/// # Panics
/// Debug panics if either component is `>= chunk_size`.
#[inline]
pub fn index_from_local(local: UVec2, chunk_size: u32) -> usize {
    debug_assert!(
        local.x < chunk_size && local.y < chunk_size,
        "local tile {local} out of range for chunk size {chunk_size}"
    );
    local.y as usize * chunk_size as usize + local.x as usize
}

/// Whether the tile sits on the chunk's east edge.
#[inline]
pub fn is_east_edge(local: UVec2, chunk_size: u32) -> bool {
    local.x + 1 == chunk_size
}

/// Whether the tile sits on the chunk's north edge.
#[inline]
pub fn is_north_edge(local: UVec2, chunk_size: u32) -> bool {
    local.y + 1 == chunk_size
}
