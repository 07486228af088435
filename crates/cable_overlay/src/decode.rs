//! Main decode pipeline.
//!
//! Orchestrates the complete decode:
//! 1. Walk every set bit of every layer of every chunk
//! 2. Resolve east/north adjacency, emitting unit edges
//! 3. Stitch unit edges into maximal runs per layer and axis
//! 4. Project runs into world-space segments
//!
//! Each call is a full recomputation; nothing is carried between calls.

use glam::IVec2;
use log::debug;

use crate::adjacency::{Direction, NeighborResolver};
use crate::chunk::ChunkSource;
use crate::config::OverlayConfig;
use crate::core::{Axis, CableLayer, Segment, TileSegment, LAYER_COUNT};
use crate::index::local_from_index;
use crate::stitch::EdgeStitcher;

/// Decode a chunk store into merged world-space segments.
///
/// This is the main entry point. Segments come out grouped by layer
/// (High, Medium, Apc), horizontal before vertical, then by start tile.
///
/// # Example
/// ```
/// use cable_overlay::{decode, CableLayer, ChunkStore, OverlayConfig};
/// use glam::IVec2;
///
/// let mut store = ChunkStore::new(4);
/// for x in 0..4 {
///     store.set_cable(IVec2::new(x, 0), CableLayer::High);
/// }
///
/// let segments = decode(&store, &OverlayConfig::default());
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].length(), 3.0);
/// ```
pub fn decode<S: ChunkSource>(source: &S, config: &OverlayConfig) -> Vec<Segment> {
    decode_with_stats(source, config).0
}

/// Decode and return statistics along with the segments.
pub fn decode_with_stats<S: ChunkSource>(source: &S, config: &OverlayConfig) -> (Vec<Segment>, DecodeStats) {
    let (runs, stats) = stitch_source(source, source);
    let segments = project_runs(&runs, config);

    debug!(
        "decoded {} chunks: {} cable tiles, {} unit edges -> {} segments",
        stats.chunks_visited, stats.cable_tiles, stats.unit_edges, stats.segment_count
    );

    (segments, stats)
}

/// Decode into exact integer tile runs, skipping the world projection.
pub fn decode_tiles<S: ChunkSource>(source: &S) -> Vec<TileSegment> {
    stitch_source(source, source).0
}

/// Decode using a separate neighbour resolver.
///
/// Chunks are iterated from `source`, cross-border lookups go through
/// `resolver`. Lets callers restrict iteration to a subset of chunks while
/// still resolving borders against the full grid.
pub fn decode_tiles_with<S, R>(source: &S, resolver: &R) -> Vec<TileSegment>
where
    S: ChunkSource,
    R: NeighborResolver + ?Sized,
{
    stitch_source(source, resolver).0
}

/// Project tile runs into world-space segments.
pub fn project_runs(runs: &[TileSegment], config: &OverlayConfig) -> Vec<Segment> {
    debug_assert!(config.validate().is_ok(), "invalid overlay config: {config:?}");
    runs.iter()
        .map(|run| Segment {
            origin: config.project(run.start),
            terminus: config.project(run.end),
            layer: run.layer,
        })
        .collect()
}

/// Walk every cable tile and feed its east/north edges to a fresh stitcher.
fn stitch_source<S, R>(source: &S, resolver: &R) -> (Vec<TileSegment>, DecodeStats)
where
    S: ChunkSource,
    R: NeighborResolver + ?Sized,
{
    let chunk_size = source.chunk_size();
    let mut stitcher = EdgeStitcher::new();
    let mut stats = DecodeStats::default();

    for chunk in source.chunks() {
        assert_eq!(
            chunk.chunk_size(),
            chunk_size,
            "chunk {:?} does not match source chunk size",
            chunk.origin()
        );
        stats.chunks_visited += 1;

        for layer in CableLayer::ALL {
            let mask = chunk.layer(layer);
            debug_assert_eq!(mask.tiles(), (chunk_size * chunk_size) as usize);

            for index in mask.iter_ones() {
                let local = local_from_index(index, chunk_size);
                // Bits past the edge of i32 tile space have no world position.
                let Some(tile) = chunk.origin().tile_at(local, chunk_size) else {
                    continue;
                };
                stats.cable_tiles += 1;

                if let Some(east) = tile.x.checked_add(1) {
                    if resolver.neighbor_has_cable(chunk, layer, local, Direction::East) {
                        stitcher.push(layer, Axis::Horizontal, tile, IVec2::new(east, tile.y));
                    }
                }

                // North end first, so vertical runs read north to south.
                if let Some(north) = tile.y.checked_add(1) {
                    if resolver.neighbor_has_cable(chunk, layer, local, Direction::North) {
                        stitcher.push(layer, Axis::Vertical, IVec2::new(tile.x, north), tile);
                    }
                }
            }
        }
    }

    stats.unit_edges = stitcher.edge_count();
    let runs = stitcher.finish();
    stats.record_runs(&runs);
    (runs, stats)
}

/// Statistics about a decode pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeStats {
    /// Chunks iterated.
    pub chunks_visited: usize,
    /// Set bits across all layers.
    pub cable_tiles: usize,
    /// Unit edges fed to the stitcher.
    pub unit_edges: usize,
    /// Segments produced.
    pub segment_count: usize,
    /// Segments per layer.
    pub segments_per_layer: [usize; LAYER_COUNT],
    /// Unit edges per segment (1.0 = nothing merged).
    pub merge_ratio: f32,
}

impl DecodeStats {
    fn record_runs(&mut self, runs: &[TileSegment]) {
        self.segment_count = runs.len();
        self.segments_per_layer = [0; LAYER_COUNT];
        for run in runs {
            self.segments_per_layer[run.layer.index()] += 1;
        }
        self.merge_ratio = if runs.is_empty() {
            0.0
        } else {
            self.unit_edges as f32 / runs.len() as f32
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    use glam::{UVec2, Vec2};
    use rand::seq::SliceRandom;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::chunk::{Chunk, ChunkCoord, ChunkStore};

    fn raw() -> OverlayConfig {
        OverlayConfig::world_aligned(1.0)
    }

    fn tiles(segments: &[TileSegment]) -> HashSet<TileSegment> {
        segments.iter().copied().collect()
    }

    /// Every true adjacency on a layer, computed by brute force over tiles.
    fn brute_force_edges(store: &ChunkStore, layer: CableLayer) -> HashSet<(IVec2, IVec2)> {
        let size = store.chunk_size();
        let mut edges = HashSet::new();
        for (_, chunk) in store.iter_chunks() {
            for local in chunk.cable_tiles(layer) {
                let tile = chunk.origin().tile_at(local, size).unwrap();
                if store.has_cable(tile + IVec2::X, layer) {
                    edges.insert((tile, tile + IVec2::X));
                }
                if store.has_cable(tile + IVec2::Y, layer) {
                    edges.insert((tile + IVec2::Y, tile));
                }
            }
        }
        edges
    }

    /// Store with chunks yielded in a caller-chosen order.
    struct OrderedSource {
        chunk_size: u32,
        order: Vec<ChunkCoord>,
        chunks: HashMap<ChunkCoord, Chunk>,
    }

    impl ChunkSource for OrderedSource {
        fn chunk_size(&self) -> u32 {
            self.chunk_size
        }

        fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
            self.chunks.get(&coord)
        }

        fn chunks(&self) -> impl Iterator<Item = &Chunk> {
            self.order.iter().map(|c| &self.chunks[c])
        }
    }

    fn sample_network() -> ChunkStore {
        let mut store = ChunkStore::new(4);
        // A long HV trunk crossing three chunks.
        store.set_cables((-5..7).map(|x| IVec2::new(x, 1)), CableLayer::High);
        // A vertical MV riser crossing two chunks, with a gap.
        store.set_cables([0, 1, 2, 3, 4, 6, 7].map(|y| IVec2::new(2, y)), CableLayer::Medium);
        // An APC loop.
        for (x, y) in [(8, 8), (9, 8), (10, 8), (10, 9), (10, 10), (9, 10), (8, 10), (8, 9)] {
            store.set_cable(IVec2::new(x, y), CableLayer::Apc);
        }
        // Isolated tiles.
        store.set_cable(IVec2::new(-10, -10), CableLayer::Apc);
        store.set_cable(IVec2::new(20, 3), CableLayer::High);
        store
    }

    #[test]
    fn empty_store_decodes_to_nothing() {
        let store = ChunkStore::new(8);
        let (segments, stats) = decode_with_stats(&store, &OverlayConfig::default());
        assert!(segments.is_empty());
        assert_eq!(stats, DecodeStats::default());
    }

    #[test]
    fn concrete_single_row_scenario() {
        // 4x4 chunk, High bits 0..=3 (one full row), nothing else.
        let chunk = Chunk::from_words(ChunkCoord::ZERO, 4, &[0b1111, 0, 0]).unwrap();
        let mut store = ChunkStore::new(4);
        store.insert(chunk).unwrap();

        let tile_size = 2.0;
        let segments = decode(&store, &OverlayConfig::with_tile_size(tile_size));

        assert_eq!(segments.len(), 1);
        let seg = segments[0];
        assert_eq!(seg.layer, CableLayer::High);
        assert!(seg.is_horizontal());
        assert_eq!(seg.length(), 3.0 * tile_size);
        assert!(segments.iter().all(|s| s.layer == CableLayer::High));
    }

    #[test]
    fn straight_run_merges_to_one_segment() {
        for n in 2..=8 {
            let mut store = ChunkStore::new(8);
            store.set_cables((0..n).map(|x| IVec2::new(x, 5)), CableLayer::Medium);

            let segments = decode(&store, &raw());
            assert_eq!(segments.len(), 1, "run of {n}");
            assert_eq!(segments[0].origin, Vec2::new(0.0, 5.0));
            assert_eq!(segments[0].terminus, Vec2::new((n - 1) as f32, 5.0));
        }
    }

    #[test]
    fn vertical_run_reads_north_to_south() {
        let mut store = ChunkStore::new(8);
        store.set_cables((1..4).map(|y| IVec2::new(2, y)), CableLayer::High);

        let runs = decode_tiles(&store);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].axis, Axis::Vertical);
        assert_eq!(runs[0].start, IVec2::new(2, 3));
        assert_eq!(runs[0].end, IVec2::new(2, 1));
    }

    #[test]
    fn isolated_bit_produces_nothing() {
        let mut store = ChunkStore::new(8);
        store.set_cable(IVec2::new(3, 3), CableLayer::High);
        store.set_cable(IVec2::new(5, 5), CableLayer::High);

        let (segments, stats) = decode_with_stats(&store, &raw());
        assert!(segments.is_empty());
        assert_eq!(stats.cable_tiles, 2);
        assert_eq!(stats.unit_edges, 0);
    }

    #[test]
    fn diagonal_tiles_do_not_connect() {
        let mut store = ChunkStore::new(8);
        store.set_cable(IVec2::new(1, 1), CableLayer::Apc);
        store.set_cable(IVec2::new(2, 2), CableLayer::Apc);
        assert!(decode_tiles(&store).is_empty());
    }

    #[test]
    fn cross_chunk_continuity() {
        let mut store = ChunkStore::new(4);
        store.set_cable(IVec2::new(3, 0), CableLayer::High);
        store.set_cable(IVec2::new(4, 0), CableLayer::High);
        assert_eq!(store.chunk_count(), 2);

        let runs = decode_tiles(&store);
        assert_eq!(runs.len(), 1);
        assert_eq!((runs[0].start, runs[0].end), (IVec2::new(3, 0), IVec2::new(4, 0)));
    }

    #[test]
    fn long_run_spans_many_chunks_as_one_segment() {
        let mut store = ChunkStore::new(4);
        store.set_cables((-10..10).map(|y| IVec2::new(-3, y)), CableLayer::Apc);
        // Chunks -3 through 2 on the y axis.
        assert_eq!(store.chunk_count(), 6);

        let runs = decode_tiles(&store);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len_tiles(), 19);
    }

    #[test]
    fn layer_isolation() {
        let mut store = ChunkStore::new(8);
        store.set_cables((0..5).map(|x| IVec2::new(x, 0)), CableLayer::Medium);
        // Same tiles on another layer, but not adjacent to each other.
        store.set_cable(IVec2::new(0, 0), CableLayer::High);
        store.set_cable(IVec2::new(2, 0), CableLayer::High);

        let (segments, stats) = decode_with_stats(&store, &raw());
        assert!(segments.iter().all(|s| s.layer == CableLayer::Medium));
        assert_eq!(stats.segments_per_layer, [0, 1, 0]);
    }

    #[test]
    fn segments_re_expand_to_exact_adjacency() {
        let store = sample_network();
        let runs = decode_tiles(&store);

        for layer in CableLayer::ALL {
            let mut expanded = HashSet::new();
            for run in runs.iter().filter(|r| r.layer == layer) {
                for edge in run.unit_edges() {
                    // No unit edge may appear twice.
                    assert!(expanded.insert(edge), "duplicate edge {edge:?} on {layer}");
                }
            }
            assert_eq!(expanded, brute_force_edges(&store, layer), "layer {layer}");
        }
    }

    #[test]
    fn no_two_runs_touch_end_to_start() {
        let runs = decode_tiles(&sample_network());
        for a in &runs {
            for b in &runs {
                if a.layer == b.layer && a.axis == b.axis {
                    assert_ne!(a.end, b.start, "{a:?} and {b:?} should have merged");
                }
            }
        }
    }

    #[test]
    fn loop_decodes_to_four_sides() {
        let mut store = ChunkStore::new(8);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 2), (0, 2), (0, 1)] {
            store.set_cable(IVec2::new(x, y), CableLayer::Apc);
        }
        let runs = decode_tiles(&store);
        assert_eq!(runs.len(), 4);
        assert!(runs.iter().all(|r| r.len_tiles() == 2));
    }

    #[test]
    fn chunk_order_does_not_change_result() {
        let store = sample_network();
        let expected = tiles(&decode_tiles(&store));

        let chunks: HashMap<_, _> = store.iter_chunks().map(|(c, chunk)| (*c, chunk.clone())).collect();
        let mut order: Vec<_> = chunks.keys().copied().collect();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..16 {
            order.shuffle(&mut rng);
            let source = OrderedSource {
                chunk_size: store.chunk_size(),
                order: order.clone(),
                chunks: chunks.clone(),
            };
            assert_eq!(tiles(&decode_tiles(&source)), expected);
        }
    }

    #[test]
    fn decode_is_idempotent() {
        let store = sample_network();
        let config = OverlayConfig::default();
        let first = decode(&store, &config);
        let second = decode(&store, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn output_is_grouped_by_layer() {
        let segments = decode(&sample_network(), &OverlayConfig::default());
        let layers: Vec<_> = segments.iter().map(|s| s.layer.index()).collect();
        let mut sorted = layers.clone();
        sorted.sort();
        assert_eq!(layers, sorted);
    }

    #[test]
    fn centering_and_flip_preserve_topology() {
        let store = sample_network();
        let raw_segments = decode(&store, &raw());
        let screen = decode(&store, &OverlayConfig::with_tile_size(1.0));

        assert_eq!(raw_segments.len(), screen.len());
        for (r, s) in raw_segments.iter().zip(&screen) {
            assert_eq!(r.layer, s.layer);
            assert_eq!(r.length(), s.length());
            assert_eq!(s.origin, Vec2::new(r.origin.x + 0.5, -(r.origin.y + 0.5)));
        }
    }

    #[test]
    fn stats_count_edges_and_merges() {
        let mut store = ChunkStore::new(8);
        store.set_cables((0..5).map(|x| IVec2::new(x, 0)), CableLayer::High);

        let (_, stats) = decode_with_stats(&store, &raw());
        assert_eq!(stats.chunks_visited, 1);
        assert_eq!(stats.cable_tiles, 5);
        assert_eq!(stats.unit_edges, 4);
        assert_eq!(stats.segment_count, 1);
        assert_eq!(stats.merge_ratio, 4.0);
    }

    struct AlwaysConnected;

    impl NeighborResolver for AlwaysConnected {
        fn neighbor_has_cable(&self, _: &Chunk, _: CableLayer, _: UVec2, direction: Direction) -> bool {
            direction == Direction::East
        }
    }

    #[test]
    fn custom_resolver_drives_adjacency() {
        let mut store = ChunkStore::new(4);
        store.set_cable(IVec2::new(0, 0), CableLayer::High);
        store.set_cable(IVec2::new(2, 0), CableLayer::High);

        // The resolver claims every east neighbour exists, never a north one.
        let runs = decode_tiles_with(&store, &AlwaysConnected);
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|r| r.axis == Axis::Horizontal && r.len_tiles() == 1));
        assert_eq!(runs[0].start, IVec2::new(0, 0));
        assert_eq!(runs[1].start, IVec2::new(2, 0));
    }

    #[test]
    fn extreme_chunks_do_not_wrap_into_each_other() {
        let mut store = ChunkStore::new(1);
        for x in [i32::MAX, i32::MIN] {
            store.insert(Chunk::from_words(ChunkCoord::new(x, 0), 1, &[1, 0, 0]).unwrap()).unwrap();
        }
        for y in [i32::MAX, i32::MIN] {
            store.insert(Chunk::from_words(ChunkCoord::new(0, y), 1, &[1, 0, 0]).unwrap()).unwrap();
        }

        let (segments, stats) = decode_with_stats(&store, &raw());
        assert!(segments.is_empty());
        assert_eq!(stats.cable_tiles, 4);
        assert_eq!(stats.unit_edges, 0);
    }

    #[test]
    fn runs_reach_the_edge_of_tile_space() {
        let mut store = ChunkStore::new(8);
        store.set_cables([i32::MAX - 2, i32::MAX - 1, i32::MAX].map(|x| IVec2::new(x, 0)), CableLayer::High);
        store.set_cables([i32::MAX - 1, i32::MAX].map(|y| IVec2::new(0, y)), CableLayer::Medium);
        store.set_cable(IVec2::new(i32::MIN, 0), CableLayer::High);

        let runs = decode_tiles(&store);
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (IVec2::new(i32::MAX - 2, 0), IVec2::new(i32::MAX, 0)));
        assert_eq!((runs[1].start, runs[1].end), (IVec2::new(0, i32::MAX), IVec2::new(0, i32::MAX - 1)));
    }

    #[test]
    fn bits_beyond_tile_space_are_skipped() {
        // Size 3 does not divide 2^31: the last chunk's third column has no tile.
        let coord = ChunkCoord::from_tile(IVec2::new(i32::MAX, 0), 3);
        let mut store = ChunkStore::new(3);
        store.insert(Chunk::from_words(coord, 3, &[0b110, 0, 0]).unwrap()).unwrap();

        let (runs, stats) = stitch_source(&store, &store);
        assert!(runs.is_empty());
        assert_eq!(stats.cable_tiles, 1);
    }

    #[test]
    #[should_panic]
    fn mismatched_chunk_size_panics() {
        let mut chunks = HashMap::new();
        chunks.insert(ChunkCoord::ZERO, Chunk::new(ChunkCoord::ZERO, 4));
        let source = OrderedSource { chunk_size: 8, order: vec![ChunkCoord::ZERO], chunks };
        decode_tiles(&source);
    }
}
