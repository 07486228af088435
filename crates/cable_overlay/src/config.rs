//! Projection settings for decoded segments.

use glam::{IVec2, Vec2};

use crate::error::CableError;

/// Direction the renderer's Y axis grows in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum YAxis {
    /// World convention: north is +Y.
    Up,
    /// Screen convention: north is -Y. Tile rows are negated on output.
    #[default]
    Down,
}

impl YAxis {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            YAxis::Up => 1.0,
            YAxis::Down => -1.0,
        }
    }
}

/// Configuration for turning stitched tile runs into world-space segments.
///
/// Only the final projection depends on these values; stitching always runs
/// on exact integer tile coordinates, so no setting can change topology.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayConfig {
    /// World units per tile edge.
    pub tile_size: f32,

    /// Vertical axis convention of the consumer.
    pub y_axis: YAxis,

    /// Shift endpoints by half a tile so lines run through tile centres
    /// instead of tile corners.
    pub center_on_tiles: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            y_axis: YAxis::Down,
            center_on_tiles: true,
        }
    }
}

impl OverlayConfig {
    /// Config with a custom tile size and default conventions.
    pub fn with_tile_size(tile_size: f32) -> Self {
        Self {
            tile_size,
            ..Self::default()
        }
    }

    /// Raw tile-corner coordinates in world orientation (no flip, no centering).
    pub fn world_aligned(tile_size: f32) -> Self {
        Self {
            tile_size,
            y_axis: YAxis::Up,
            center_on_tiles: false,
        }
    }

    pub fn validate(&self) -> Result<(), CableError> {
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(CableError::InvalidTileSize(self.tile_size));
        }
        Ok(())
    }

    /// Project an integer world tile coordinate to a segment endpoint.
    #[inline]
    pub fn project(&self, tile: IVec2) -> Vec2 {
        let center = if self.center_on_tiles { 0.5 } else { 0.0 };
        let x = (tile.x as f32 + center) * self.tile_size;
        let y = (tile.y as f32 + center) * self.tile_size * self.y_axis.sign();
        Vec2::new(x, y)
    }
}
