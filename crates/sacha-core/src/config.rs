// SPDX-License-Identifier: MIT
//
// Export engine configuration.

use serde::{Deserialize, Serialize};

use crate::types::{LayoutStrategy, PaperSize};

/// Engine settings, constructed once at process start and handed to the
/// orchestrator. Defaults reproduce the production web exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Paper size for page creation.
    pub paper_size: PaperSize,
    /// Layout strategy: native text placement or raster slicing.
    pub strategy: LayoutStrategy,
    /// Maximum number of memoized tokenizations held by the conversion
    /// cache before FIFO eviction kicks in.
    pub cache_capacity: usize,
    /// Raster strategy only: surface pixels per PDF point. 2.0 doubles the
    /// print resolution at roughly 4x the surface memory.
    pub raster_scale: f32,
    /// Raster strategy only: JPEG re-encode quality for page slices (1-100).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            strategy: LayoutStrategy::Vector,
            cache_capacity: 50,
            raster_scale: 2.0,
            jpeg_quality: 88,
        }
    }
}
