//! WASM bindings for the cable overlay decoder.
//!
//! Chunk data crosses the boundary as two flat arrays: chunk coordinates as
//! `(x, y)` pairs and mask words with `LAYER_COUNT` layers per chunk.

use wasm_bindgen::prelude::*;
use cable_overlay::{
    decode_with_stats, words_per_layer,
    CableError, CableLayer, Chunk, ChunkCoord, ChunkStore, DecodeStats,
    LayerBatches, OverlayConfig, YAxis,
    LAYER_COUNT, MAX_CHUNK_SIZE,
};

/// Install the panic hook so Rust panics show up in the browser console.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Decoded overlay lines returned to JavaScript.
///
/// Each layer array holds `[x0, y0, x1, y1, ...]`, ready for a line-list
/// buffer.
#[wasm_bindgen]
pub struct OverlayResult {
    high_lines: Vec<f32>,
    medium_lines: Vec<f32>,
    apc_lines: Vec<f32>,
}

#[wasm_bindgen]
impl OverlayResult {
    /// High-voltage line endpoints.
    #[wasm_bindgen(getter)]
    pub fn high_lines(&self) -> Vec<f32> {
        self.high_lines.clone()
    }

    /// Medium-voltage line endpoints.
    #[wasm_bindgen(getter)]
    pub fn medium_lines(&self) -> Vec<f32> {
        self.medium_lines.clone()
    }

    /// APC line endpoints.
    #[wasm_bindgen(getter)]
    pub fn apc_lines(&self) -> Vec<f32> {
        self.apc_lines.clone()
    }

    /// Line endpoints for a layer by index (0 = high, 1 = medium, 2 = apc).
    pub fn lines(&self, layer: u8) -> Vec<f32> {
        match CableLayer::try_from(layer) {
            Ok(layer) => self.layer_lines(layer).to_vec(),
            Err(_) => Vec::new(),
        }
    }

    /// Number of segments in a layer.
    pub fn line_count(&self, layer: u8) -> usize {
        CableLayer::try_from(layer)
            .map(|layer| self.layer_lines(layer).len() / 4)
            .unwrap_or(0)
    }

    /// Total number of segments across all layers.
    #[wasm_bindgen(getter)]
    pub fn segment_count(&self) -> usize {
        (self.high_lines.len() + self.medium_lines.len() + self.apc_lines.len()) / 4
    }

    #[wasm_bindgen(getter)]
    pub fn is_empty(&self) -> bool {
        self.segment_count() == 0
    }
}

impl OverlayResult {
    fn layer_lines(&self, layer: CableLayer) -> &[f32] {
        match layer {
            CableLayer::High => &self.high_lines,
            CableLayer::Medium => &self.medium_lines,
            CableLayer::Apc => &self.apc_lines,
        }
    }
}

impl From<&LayerBatches> for OverlayResult {
    fn from(batches: &LayerBatches) -> Self {
        Self {
            high_lines: batches.line_positions(CableLayer::High),
            medium_lines: batches.line_positions(CableLayer::Medium),
            apc_lines: batches.line_positions(CableLayer::Apc),
        }
    }
}

/// Decode statistics for debugging.
#[wasm_bindgen]
pub struct OverlayStats {
    chunk_count: usize,
    cable_tiles: usize,
    unit_edge_count: usize,
    segment_count: usize,
    merge_ratio: f32,
}

#[wasm_bindgen]
impl OverlayStats {
    #[wasm_bindgen(getter)]
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    #[wasm_bindgen(getter)]
    pub fn cable_tiles(&self) -> usize {
        self.cable_tiles
    }

    #[wasm_bindgen(getter)]
    pub fn unit_edge_count(&self) -> usize {
        self.unit_edge_count
    }

    #[wasm_bindgen(getter)]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[wasm_bindgen(getter)]
    pub fn merge_ratio(&self) -> f32 {
        self.merge_ratio
    }
}

impl From<&DecodeStats> for OverlayStats {
    fn from(stats: &DecodeStats) -> Self {
        Self {
            chunk_count: stats.chunks_visited,
            cable_tiles: stats.cable_tiles,
            unit_edge_count: stats.unit_edges,
            segment_count: stats.segment_count,
            merge_ratio: stats.merge_ratio,
        }
    }
}

/// Decode raw chunk masks into per-layer overlay lines.
///
/// # Arguments
/// * `chunk_coords` - Flat `(x, y)` chunk coordinate pairs
/// * `masks` - Mask words, `LAYER_COUNT * words_per_layer(chunk_size)` per chunk,
///   in the same order as `chunk_coords`
/// * `chunk_size` - Tiles per chunk edge
/// * `tile_size` - World units per tile
/// * `flip_y` - Negate Y for screen-space renderers
///
/// # Example (JavaScript)
/// ```javascript
/// const coords = new Int32Array([0, 0]);
/// const masks = new BigUint64Array([0b1111n, 0n, 0n]);
/// const result = decode_cable_chunks(coords, masks, 8, 1.0, true);
/// const lines = result.high_lines; // [x0, y0, x1, y1]
/// ```
#[wasm_bindgen]
pub fn decode_cable_chunks(
    chunk_coords: &[i32],
    masks: &[u64],
    chunk_size: u32,
    tile_size: f32,
    flip_y: bool,
) -> Result<OverlayResult, JsValue> {
    let (result, _) = decode_raw(chunk_coords, masks, chunk_size, tile_size, flip_y).map_err(to_js)?;
    Ok(result)
}

/// Decode raw chunk masks and return `[OverlayResult, OverlayStats]`.
#[wasm_bindgen]
pub fn decode_cable_chunks_with_stats(
    chunk_coords: &[i32],
    masks: &[u64],
    chunk_size: u32,
    tile_size: f32,
    flip_y: bool,
) -> Result<js_sys::Array, JsValue> {
    let (result, stats) = decode_raw(chunk_coords, masks, chunk_size, tile_size, flip_y).map_err(to_js)?;

    let array = js_sys::Array::new();
    array.push(&JsValue::from(result));
    array.push(&JsValue::from(stats));
    Ok(array)
}

/// Number of `u64` words one chunk occupies in the `masks` array.
///
/// Returns 0 for unsupported chunk sizes.
#[wasm_bindgen]
pub fn chunk_word_count(chunk_size: u32) -> usize {
    if !(1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
        return 0;
    }
    words_per_layer(chunk_size) * LAYER_COUNT
}

fn to_js(err: CableError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn decode_raw(
    chunk_coords: &[i32],
    masks: &[u64],
    chunk_size: u32,
    tile_size: f32,
    flip_y: bool,
) -> Result<(OverlayResult, OverlayStats), CableError> {
    let config = OverlayConfig {
        tile_size,
        y_axis: if flip_y { YAxis::Down } else { YAxis::Up },
        center_on_tiles: true,
    };
    config.validate()?;

    let store = build_store(chunk_coords, masks, chunk_size)?;
    let (segments, stats) = decode_with_stats(&store, &config);

    log(&format!(
        "[wasm_cable_overlay] {} chunks -> {} segments ({:.2} edges/segment)",
        stats.chunks_visited, stats.segment_count, stats.merge_ratio
    ));

    let batches = LayerBatches::from_segments(&segments);
    Ok((OverlayResult::from(&batches), OverlayStats::from(&stats)))
}

/// Rebuild a chunk store from the flat coordinate and mask arrays.
fn build_store(chunk_coords: &[i32], masks: &[u64], chunk_size: u32) -> Result<ChunkStore, CableError> {
    if !(1..=MAX_CHUNK_SIZE).contains(&chunk_size) {
        return Err(CableError::InvalidChunkSize { got: chunk_size, max: MAX_CHUNK_SIZE });
    }

    let stride = chunk_word_count(chunk_size);
    if masks.len() % stride != 0 {
        return Err(CableError::RawLength { got: masks.len(), stride });
    }
    if chunk_coords.len() % 2 != 0 {
        return Err(CableError::RawLength { got: chunk_coords.len(), stride: 2 });
    }

    let chunks = masks.len() / stride;
    if chunk_coords.len() / 2 != chunks {
        return Err(CableError::ChunkCountMismatch { coords: chunk_coords.len() / 2, chunks });
    }

    let mut store = ChunkStore::new(chunk_size);
    for (xy, words) in chunk_coords.chunks_exact(2).zip(masks.chunks_exact(stride)) {
        let coord = ChunkCoord::new(xy[0], xy[1]);
        if store.insert(Chunk::from_words(coord, chunk_size, words)?)?.is_some() {
            log(&format!("[wasm_cable_overlay] duplicate chunk {coord:?}, keeping the last"));
        }
    }
    Ok(store)
}

// Logging support

thread_local! {
    static LOG_ENABLED: std::cell::Cell<bool> = std::cell::Cell::new(false);
}

/// Enable or disable console logging.
#[wasm_bindgen]
pub fn set_log_enabled(enabled: bool) {
    LOG_ENABLED.with(|flag| flag.set(enabled));
}

fn log(message: &str) {
    if LOG_ENABLED.with(|enabled| enabled.get()) {
        web_sys::console::log_1(&message.into());
    }
}

/// Get the version of the overlay library.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
