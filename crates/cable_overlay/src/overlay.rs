//! Cached decode result keyed on the store version.

use log::trace;

use crate::chunk::ChunkStore;
use crate::config::OverlayConfig;
use crate::core::{CableLayer, Segment};
use crate::decode::{decode_with_stats, DecodeStats};
use crate::error::CableError;
use crate::render::{LayerBatches, LayerVisibility, ViewRect};

/// Holds the segments last decoded from a [`ChunkStore`].
///
/// A refresh either reuses the previous output untouched or replaces it
/// wholesale; there is no incremental patching.
#[derive(Clone, Debug)]
pub struct CableOverlay {
    config: OverlayConfig,
    segments: Vec<Segment>,
    batches: LayerBatches,
    stats: DecodeStats,
    built_version: Option<u64>,
}

impl CableOverlay {
    pub fn new(config: OverlayConfig) -> Result<Self, CableError> {
        config.validate()?;
        Ok(Self {
            config,
            segments: Vec::new(),
            batches: LayerBatches::default(),
            stats: DecodeStats::default(),
            built_version: None,
        })
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Swap the projection settings. The next refresh always re-decodes.
    pub fn set_config(&mut self, config: OverlayConfig) -> Result<(), CableError> {
        config.validate()?;
        self.config = config;
        self.built_version = None;
        Ok(())
    }

    /// Re-decode if the store changed since the last refresh.
    ///
    /// Returns `true` when a decode ran.
    pub fn refresh(&mut self, store: &ChunkStore) -> bool {
        if self.built_version == Some(store.version()) {
            trace!("overlay up to date at store version {}", store.version());
            return false;
        }

        let (segments, stats) = decode_with_stats(store, &self.config);
        self.batches = LayerBatches::from_segments(&segments);
        self.segments = segments;
        self.stats = stats;
        self.built_version = Some(store.version());
        true
    }

    /// Store version the current output was built from.
    pub fn built_version(&self) -> Option<u64> {
        self.built_version
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn layer_segments(&self, layer: CableLayer) -> &[Segment] {
        self.batches.segments(layer)
    }

    pub fn batches(&self) -> &LayerBatches {
        &self.batches
    }

    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Batches restricted to a view and a set of visible layers.
    pub fn visible(&self, view: &ViewRect, visibility: &LayerVisibility) -> LayerBatches {
        LayerBatches::visible(&self.segments, view, visibility)
    }
}

impl Default for CableOverlay {
    fn default() -> Self {
        Self {
            config: OverlayConfig::default(),
            segments: Vec::new(),
            batches: LayerBatches::default(),
            stats: DecodeStats::default(),
            built_version: None,
        }
    }
}
