//! Chunk coordinate type for chunk-space addressing.

use glam::{IVec2, UVec2};

/// Chunk coordinate in chunk-space (not tile-space).
///
/// Chunk `(cx, cy)` covers world tiles
/// `[cx * size, (cx + 1) * size) × [cy * size, (cy + 1) * size)`.
/// Coordinates can be negative to support grids extending in any direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    /// Origin chunk at (0, 0).
    pub const ZERO: ChunkCoord = ChunkCoord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk offset by `(dx, dy)` chunks, or `None` if that leaves `i32`.
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// Eastern neighbour (+X).
    #[inline]
    pub fn east(&self) -> Option<Self> {
        self.offset(1, 0)
    }

    /// Northern neighbour (+Y).
    #[inline]
    pub fn north(&self) -> Option<Self> {
        self.offset(0, 1)
    }

    /// Edge-adjacent neighbours in order +X, -X, +Y, -Y.
    ///
    /// Neighbours past the `i32` range are skipped.
    pub fn neighbors(&self) -> impl Iterator<Item = ChunkCoord> {
        let coord = *self;
        [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .into_iter()
            .filter_map(move |(dx, dy)| coord.offset(dx, dy))
    }

    /// Chunk containing a world tile.
    ///
    /// Uses Euclidean division for correct negative coordinate handling.
    ///
    /// # Example
    /// ```
    /// use cable_overlay::chunk::ChunkCoord;
    /// use glam::IVec2;
    ///
    /// assert_eq!(ChunkCoord::from_tile(IVec2::new(9, 3), 8), ChunkCoord::new(1, 0));
    /// assert_eq!(ChunkCoord::from_tile(IVec2::new(-1, 0), 8), ChunkCoord::new(-1, 0));
    /// ```
    pub fn from_tile(tile: IVec2, chunk_size: u32) -> Self {
        let n = chunk_size as i32;
        Self {
            x: tile.x.div_euclid(n),
            y: tile.y.div_euclid(n),
        }
    }

    /// Chunk-local offset of a world tile.
    ///
    /// Uses Euclidean remainder, so the result is always in `[0, chunk_size)`.
    pub fn tile_to_local(tile: IVec2, chunk_size: u32) -> UVec2 {
        let n = chunk_size as i32;
        UVec2::new(tile.x.rem_euclid(n) as u32, tile.y.rem_euclid(n) as u32)
    }

    /// World tile of this chunk's local (0, 0) corner.
    ///
    /// `None` when the corner lies outside `i32` tile space.
    pub fn origin_tile(&self, chunk_size: u32) -> Option<IVec2> {
        self.tile_at(UVec2::ZERO, chunk_size)
    }

    /// World tile of a local offset within this chunk.
    ///
    /// `None` when the tile lies outside `i32` tile space.
    pub fn tile_at(&self, local: UVec2, chunk_size: u32) -> Option<IVec2> {
        let n = i64::from(chunk_size);
        let x = i64::from(self.x) * n + i64::from(local.x);
        let y = i64::from(self.y) * n + i64::from(local.y);
        Some(IVec2::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
    }

    /// Whether at least one of the chunk's tiles lies in `i32` tile space.
    ///
    /// Every chunk produced by [`ChunkCoord::from_tile`] is addressable. Bits
    /// of an addressable chunk that fall outside `i32` are never decoded.
    pub fn is_addressable(&self, chunk_size: u32) -> bool {
        let n = i64::from(chunk_size);
        let overlaps = |c: i32| {
            let first = i64::from(c) * n;
            first <= i64::from(i32::MAX) && first + n - 1 >= i64::from(i32::MIN)
        };
        overlaps(self.x) && overlaps(self.y)
    }
}
