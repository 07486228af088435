//! Render preparation: per-layer batches, view culling and GPU-ready buffers.
//!
//! Decoding never filters. Everything here runs on the finished segment list,
//! so hiding a layer or panning the view never forces a re-decode.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::core::{CableLayer, Segment, LAYER_COUNT};

/// One endpoint of a line-list primitive.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 2],
}

impl From<Vec2> for LineVertex {
    fn from(v: Vec2) -> Self {
        Self { position: v.to_array() }
    }
}

/// Axis-aligned visible area in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ViewRect {
    /// Rectangle spanning two corners in any order.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Grow the rectangle by `pad` on every side.
    pub fn padded(&self, pad: f32) -> Self {
        Self::new(self.min - Vec2::splat(pad), self.max + Vec2::splat(pad))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Whether the segment's bounding box touches the rectangle.
    pub fn intersects(&self, segment: &Segment) -> bool {
        let (lo, hi) = segment.bounds();
        lo.cmple(self.max).all() && hi.cmpge(self.min).all()
    }
}

/// Per-layer show flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerVisibility([bool; LAYER_COUNT]);

impl LayerVisibility {
    pub const ALL: LayerVisibility = LayerVisibility([true; LAYER_COUNT]);
    pub const NONE: LayerVisibility = LayerVisibility([false; LAYER_COUNT]);

    /// Only `layer` visible.
    pub fn only(layer: CableLayer) -> Self {
        let mut visibility = Self::NONE;
        visibility.set(layer, true);
        visibility
    }

    #[inline]
    pub fn is_visible(&self, layer: CableLayer) -> bool {
        self.0[layer.index()]
    }

    pub fn set(&mut self, layer: CableLayer, visible: bool) {
        self.0[layer.index()] = visible;
    }

    /// Visible layers in index order.
    pub fn layers(&self) -> impl Iterator<Item = CableLayer> + '_ {
        CableLayer::ALL.into_iter().filter(|l| self.is_visible(*l))
    }
}

impl Default for LayerVisibility {
    fn default() -> Self {
        Self::ALL
    }
}

/// Segments grouped by layer, ready for one draw call per layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayerBatches {
    batches: [Vec<Segment>; LAYER_COUNT],
}

impl LayerBatches {
    /// Group segments by layer, keeping their relative order.
    pub fn from_segments(segments: &[Segment]) -> Self {
        let mut batches: [Vec<Segment>; LAYER_COUNT] = Default::default();
        for segment in segments {
            batches[segment.layer.index()].push(*segment);
        }
        Self { batches }
    }

    /// Group only the segments that are visible inside `view`.
    pub fn visible(segments: &[Segment], view: &ViewRect, visibility: &LayerVisibility) -> Self {
        let mut batches: [Vec<Segment>; LAYER_COUNT] = Default::default();
        for segment in segments {
            if visibility.is_visible(segment.layer) && view.intersects(segment) {
                batches[segment.layer.index()].push(*segment);
            }
        }
        Self { batches }
    }

    pub fn segments(&self, layer: CableLayer) -> &[Segment] {
        &self.batches[layer.index()]
    }

    /// Total segments across all layers.
    pub fn segment_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(Vec::is_empty)
    }

    /// Flat `[x0, y0, x1, y1, ...]` positions for one layer.
    pub fn line_positions(&self, layer: CableLayer) -> Vec<f32> {
        let batch = self.segments(layer);
        let mut positions = Vec::with_capacity(batch.len() * 4);
        for segment in batch {
            positions.extend_from_slice(&[
                segment.origin.x,
                segment.origin.y,
                segment.terminus.x,
                segment.terminus.y,
            ]);
        }
        positions
    }

    /// Line-list vertices for one layer, two per segment.
    pub fn vertices(&self, layer: CableLayer) -> Vec<LineVertex> {
        self.segments(layer)
            .iter()
            .flat_map(|s| [LineVertex::from(s.origin), LineVertex::from(s.terminus)])
            .collect()
    }

    /// Vertex buffer contents for one layer.
    pub fn vertex_bytes(&self, layer: CableLayer) -> Vec<u8> {
        bytemuck::cast_slice(&self.vertices(layer)).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(layer: CableLayer, x0: f32, y0: f32, x1: f32, y1: f32) -> Segment {
        Segment {
            origin: Vec2::new(x0, y0),
            terminus: Vec2::new(x1, y1),
            layer,
        }
    }

    fn sample() -> Vec<Segment> {
        vec![
            seg(CableLayer::High, 0.0, 0.0, 4.0, 0.0),
            seg(CableLayer::Apc, 10.0, 10.0, 10.0, 12.0),
            seg(CableLayer::High, 1.0, 5.0, 1.0, 2.0),
            seg(CableLayer::Medium, -8.0, -8.0, -6.0, -8.0),
        ]
    }

    #[test]
    fn groups_by_layer_in_order() {
        let batches = LayerBatches::from_segments(&sample());
        assert_eq!(batches.segment_count(), 4);
        assert_eq!(batches.segments(CableLayer::High).len(), 2);
        assert_eq!(batches.segments(CableLayer::High)[1].origin, Vec2::new(1.0, 5.0));
        assert_eq!(batches.segments(CableLayer::Medium).len(), 1);
        assert_eq!(batches.segments(CableLayer::Apc).len(), 1);
    }

    #[test]
    fn line_positions_are_flat_pairs() {
        let batches = LayerBatches::from_segments(&sample());
        assert_eq!(
            batches.line_positions(CableLayer::High),
            vec![0.0, 0.0, 4.0, 0.0, 1.0, 5.0, 1.0, 2.0]
        );
        assert!(LayerBatches::default().line_positions(CableLayer::Apc).is_empty());
    }

    #[test]
    fn vertices_match_positions() {
        let batches = LayerBatches::from_segments(&sample());
        let vertices = batches.vertices(CableLayer::High);
        let flat: Vec<f32> = vertices.iter().flat_map(|v| v.position).collect();
        assert_eq!(flat, batches.line_positions(CableLayer::High));

        let bytes = batches.vertex_bytes(CableLayer::High);
        assert_eq!(bytes.len(), vertices.len() * std::mem::size_of::<LineVertex>());
    }

    #[test]
    fn view_rect_intersection() {
        let view = ViewRect::new(Vec2::new(5.0, 5.0), Vec2::new(-1.0, -1.0));
        assert_eq!(view.min, Vec2::new(-1.0, -1.0));

        let segments = sample();
        assert!(view.intersects(&segments[0]));
        assert!(!view.intersects(&segments[1]));
        assert!(view.intersects(&segments[2]));
        assert!(!view.intersects(&segments[3]));

        // Padding pulls the APC segment in.
        assert!(view.padded(5.0).intersects(&segments[1]));
    }

    #[test]
    fn segment_crossing_view_is_kept() {
        let view = ViewRect::from_center(Vec2::ZERO, Vec2::splat(1.0));
        let crossing = seg(CableLayer::Medium, -10.0, 0.0, 10.0, 0.0);
        assert!(view.intersects(&crossing));
        assert!(!view.contains(crossing.origin));
    }

    #[test]
    fn visible_applies_view_and_layer_flags() {
        let view = ViewRect::from_center(Vec2::ZERO, Vec2::splat(20.0));
        let mut visibility = LayerVisibility::default();
        visibility.set(CableLayer::Apc, false);

        let batches = LayerBatches::visible(&sample(), &view, &visibility);
        assert_eq!(batches.segments(CableLayer::High).len(), 2);
        assert_eq!(batches.segments(CableLayer::Medium).len(), 1);
        assert!(batches.segments(CableLayer::Apc).is_empty());
    }

    #[test]
    fn visibility_helpers() {
        let only = LayerVisibility::only(CableLayer::Medium);
        assert_eq!(only.layers().collect::<Vec<_>>(), vec![CableLayer::Medium]);
        assert_eq!(LayerVisibility::NONE.layers().count(), 0);
        assert_eq!(LayerVisibility::default(), LayerVisibility::ALL);
    }
}
