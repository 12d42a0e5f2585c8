// SPDX-License-Identifier: MIT
//
// Unified error types for the export engine.

use thiserror::Error;

/// Top-level error type for all export operations.
///
/// Malformed markup is never an error — the tokenizer recovers locally by
/// treating unmatched markers as literal text. Cache eviction is likewise
/// structural, not a failure. What remains are the encoding/rasterization
/// backends and the host filesystem.
#[derive(Debug, Error)]
pub enum SachaError {
    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("render surface error: {0}")]
    RenderError(String),

    #[error("font could not be parsed: {0}")]
    FontError(String),

    // -- Orchestration --
    #[error("export task failed: {0}")]
    TaskJoin(String),

    // -- Host I/O / serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SachaError>;
