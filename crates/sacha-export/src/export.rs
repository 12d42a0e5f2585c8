// SPDX-License-Identifier: MIT
//
// Export orchestrator — owns the end-to-end call: resolve blocks through
// the conversion cache, paginate, decorate, encode, and return the binary
// with its suggested file name.
//
// The call is async relative to the caller but internally sequential; the
// only suspension point wraps the CPU-bound tail (pagination, rasterizing
// under the raster strategy, and PDF encoding). Transient render
// resources are scope-guarded, so they are released on every exit path
// before a failure propagates.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use sacha_core::error::{Result, SachaError};
use sacha_core::{ExportConfig, ExportOutput, ExportRequest, Language};

use crate::cache::ConversionCache;
use crate::decorate::decorate;
use crate::layout::geometry::PageGeometry;
use crate::layout::{paginate, PagePlan};
use crate::pdf::PdfEncoder;
use crate::tokenize::ContentBlock;

/// Prefix applied to derived output file names.
const FILE_NAME_LABEL: &str = "Summary for";

/// The document export engine's front door.
///
/// Holds the engine configuration and a handle to the shared conversion
/// cache. The cache is constructed once at process start and passed in —
/// the orchestrator never reaches for global state.
pub struct Exporter {
    config: ExportConfig,
    geometry: PageGeometry,
    cache: Arc<ConversionCache>,
    font_bytes: Option<Vec<u8>>,
}

impl Exporter {
    /// Engine over an externally owned cache. The cache keeps whatever
    /// capacity it was built with; `config.cache_capacity` only applies when
    /// the engine builds its own cache via [`Exporter::from_config`].
    pub fn new(config: ExportConfig, cache: Arc<ConversionCache>) -> Self {
        let geometry = PageGeometry::for_paper(config.paper_size);
        Self {
            config,
            geometry,
            cache,
            font_bytes: None,
        }
    }

    /// Engine with a private cache sized from `config.cache_capacity`.
    pub fn from_config(config: ExportConfig) -> Self {
        let cache = Arc::new(ConversionCache::new(config.cache_capacity));
        Self::new(config, cache)
    }

    /// Engine with default configuration and a private cache.
    pub fn with_defaults() -> Self {
        Self::from_config(ExportConfig::default())
    }

    /// Handle to the conversion cache backing this engine.
    pub fn cache(&self) -> &Arc<ConversionCache> {
        &self.cache
    }

    /// Embed the given TTF in produced documents instead of the built-in
    /// Helvetica faces. Required for Devanagari fidelity with the vector
    /// strategy.
    pub fn with_unicode_font(mut self, ttf_bytes: Vec<u8>) -> Self {
        self.font_bytes = Some(ttf_bytes);
        self
    }

    /// Derive the suggested output name: extension stripped, fixed label
    /// prefixed, `.pdf` suffixed. `policy.pdf` becomes
    /// `Summary for policy.pdf`.
    pub fn suggested_file_name(original_file_name: &str) -> String {
        format!("{FILE_NAME_LABEL} {}.pdf", strip_extension(original_file_name))
    }

    /// Run one export. The request is borrowed and never mutated; the
    /// binary either encodes fully or the call fails as a whole.
    #[instrument(
        skip(self, request),
        fields(
            language = request.language.code(),
            content_len = request.content.len(),
            strategy = ?self.config.strategy,
        )
    )]
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportOutput> {
        let title = format!(
            "{FILE_NAME_LABEL} {}",
            strip_extension(&request.original_file_name)
        );
        let file_name = format!("{title}.pdf");

        let blocks = self.cache.get_or_compute(&request.content);
        let geometry = self.geometry;
        let config = self.config.clone();
        let language = request.language;
        let generated_date = Local::now().date_naive();

        let mut encoder = PdfEncoder::new(geometry);
        encoder.set_title(&title);
        if let Some(bytes) = &self.font_bytes {
            encoder = encoder.with_font(bytes.clone());
        }

        // Pagination (which rasterizes and JPEG-encodes under the raster
        // strategy) and PDF encoding are both CPU-bound; hand the whole tail
        // to the blocking pool so the caller's task is not stalled.
        let bytes = tokio::task::spawn_blocking(move || {
            let pages = build_plans(&blocks, &geometry, &config, language, &title, generated_date)?;
            encoder.encode(&pages)
        })
        .await
        .map_err(|err| SachaError::TaskJoin(err.to_string()))??;

        info!(bytes = bytes.len(), file_name = %file_name, "export complete");
        Ok(ExportOutput { bytes, file_name })
    }

    /// External interface shape used by the host UI: raw strings in, binary
    /// and suggested name out.
    pub async fn generate(
        &self,
        content: &str,
        file_name: &str,
        language_code: &str,
    ) -> Result<ExportOutput> {
        let request = ExportRequest::new(content, file_name, Language::from_code(language_code));
        self.export(&request).await
    }

    /// Tokenize (through the cache), paginate, and decorate. Split out from
    /// [`Exporter::export`] so the deterministic part of the pipeline can be
    /// exercised without encoding.
    fn plan(
        &self,
        request: &ExportRequest,
        generated_date: NaiveDate,
        title: &str,
    ) -> Result<Vec<PagePlan>> {
        let blocks = self.cache.get_or_compute(&request.content);
        build_plans(
            &blocks,
            &self.geometry,
            &self.config,
            request.language,
            title,
            generated_date,
        )
    }
}

/// Paginate and decorate already-tokenized blocks. Free-standing so the
/// blocking-pool closure in [`Exporter::export`] can run it without
/// borrowing the engine.
fn build_plans(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    config: &ExportConfig,
    language: Language,
    title: &str,
    generated_date: NaiveDate,
) -> Result<Vec<PagePlan>> {
    let mut pages = paginate(blocks, geometry, config)?;
    decorate(&mut pages, language, title, generated_date, geometry);
    Ok(pages)
}

/// Strip the final extension from a file name, keeping hidden-file style
/// names intact.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}
