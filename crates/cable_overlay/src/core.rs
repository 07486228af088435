//! Core type definitions for the cable overlay decoder.

use std::fmt;
use std::str::FromStr;

use glam::{IVec2, Vec2};

use crate::error::CableError;

/// Default tiles per chunk edge (8 × 8 = 64 bits per layer, one `u64` word).
pub const DEFAULT_CHUNK_SIZE: u32 = 8;

/// Largest supported chunk edge.
pub const MAX_CHUNK_SIZE: u32 = 256;

/// Number of independent cable layers stored per chunk.
pub const LAYER_COUNT: usize = 3;

/// Number of stitching axes (horizontal, vertical).
pub const AXIS_COUNT: usize = 2;

/// Bits per mask word.
pub const WORD_BITS: usize = 64;

/// Number of `u64` words needed to hold one layer of a chunk.
#[inline]
pub const fn words_per_layer(chunk_size: u32) -> usize {
    let bits = chunk_size as usize * chunk_size as usize;
    (bits + WORD_BITS - 1) / WORD_BITS
}

/// Independent cable class. Cables of different layers never connect.
///
/// The discriminant is the stable layer index shared with the chunk producer
/// and the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CableLayer {
    High = 0,
    Medium = 1,
    Apc = 2,
}

impl CableLayer {
    /// All layers in index order.
    pub const ALL: [CableLayer; LAYER_COUNT] = [CableLayer::High, CableLayer::Medium, CableLayer::Apc];

    /// Stable layer index in `0..LAYER_COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Layer for a raw index, if it names one.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(CableLayer::High),
            1 => Some(CableLayer::Medium),
            2 => Some(CableLayer::Apc),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CableLayer::High => "high",
            CableLayer::Medium => "medium",
            CableLayer::Apc => "apc",
        }
    }
}

impl TryFrom<u8> for CableLayer {
    type Error = CableError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or(CableError::UnknownLayer(value))
    }
}

impl FromStr for CableLayer {
    type Err = CableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" | "hv" | "high_voltage" => Ok(CableLayer::High),
            "medium" | "mv" | "medium_voltage" => Ok(CableLayer::Medium),
            "apc" | "lv" => Ok(CableLayer::Apc),
            _ => Err(CableError::UnknownLayerName(s.to_string())),
        }
    }
}

impl fmt::Display for CableLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Segment orientation. Each axis is stitched independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal = 0,
    Vertical = 1,
}

impl Axis {
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::Horizontal, Axis::Vertical];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A stitched run in integer world-tile space.
///
/// Horizontal runs go west to east (`start.x < end.x`), vertical runs go
/// north to south (`start.y > end.y`). Exact and hashable, so tests and
/// callers can compare decode results as sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileSegment {
    pub layer: CableLayer,
    pub axis: Axis,
    pub start: IVec2,
    pub end: IVec2,
}

impl TileSegment {
    /// Ordering key used for deterministic output: layer, axis, then start.
    pub fn sort_key(&self) -> (CableLayer, Axis, i32, i32) {
        (self.layer, self.axis, self.start.y, self.start.x)
    }

    /// Length in tiles (number of unit edges in the run).
    pub fn len_tiles(&self) -> u32 {
        let d = self.end - self.start;
        (d.x.abs() + d.y.abs()) as u32
    }

    /// Expand the run back into its unit edges, in run order.
    pub fn unit_edges(&self) -> impl Iterator<Item = (IVec2, IVec2)> + '_ {
        let step = (self.end - self.start).signum();
        (0..self.len_tiles() as i32).map(move |i| {
            let a = self.start + step * i;
            (a, a + step)
        })
    }
}

/// Output line segment in world space, ready for the renderer.
///
/// Always axis-aligned: `origin.y == terminus.y` or `origin.x == terminus.x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub origin: Vec2,
    pub terminus: Vec2,
    pub layer: CableLayer,
}

impl Segment {
    /// Euclidean length in world units.
    pub fn length(&self) -> f32 {
        self.origin.distance(self.terminus)
    }

    pub fn is_horizontal(&self) -> bool {
        self.origin.y == self.terminus.y
    }

    pub fn is_vertical(&self) -> bool {
        self.origin.x == self.terminus.x
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.origin.min(self.terminus), self.origin.max(self.terminus))
    }
}
