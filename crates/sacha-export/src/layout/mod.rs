// SPDX-License-Identifier: MIT
//
// Layout planner — consumes the block sequence and page geometry, produces
// an ordered list of page plans made of positioned draw instructions.
//
// Two strategies satisfy the same contract and produce the same page counts
// for the same geometry: native text placement (`Vector`) and full-content
// rasterization with per-page slicing (`RasterSlice`).

pub mod geometry;
pub mod raster;
pub mod vector;

use sacha_core::error::Result;
use sacha_core::{ExportConfig, LayoutStrategy};

use crate::tokenize::ContentBlock;
use geometry::PageGeometry;

/// Typographic role of a text run; the encoder maps roles to font face and
/// color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Body text, dark slate.
    Regular,
    /// Bold body text.
    Bold,
    /// Bold text in the brand accent color (section headers, brand title).
    Accent,
    /// De-emphasized gray (subtitle, dates, footer).
    Muted,
}

/// Horizontal anchoring of a text run relative to its x coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One positioned primitive on a page. Coordinates are points, y measured
/// top-down from the page's top edge. Immutable once placed.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawInstruction {
    /// A single line of text. Never spans pages; a line is an atomic
    /// placement unit.
    Text {
        x: f32,
        y: f32,
        size: f32,
        style: TextStyle,
        align: TextAlign,
        text: String,
    },
    /// Bullet glyph at the left margin of a bullet item.
    Bullet { x: f32, y: f32, size: f32 },
    /// Horizontal rule line.
    Rule {
        x: f32,
        y: f32,
        width: f32,
        thickness: f32,
    },
    /// Diagonal low-opacity brand mark, rendered beneath all other
    /// instructions on its page.
    Watermark { x: f32, y: f32, text: String },
    /// A pre-rendered JPEG slice covering the content area (raster
    /// strategy).
    Image {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        px_width: u32,
        px_height: u32,
        jpeg: Vec<u8>,
    },
}

impl DrawInstruction {
    /// Top-down y position of the instruction.
    pub fn y(&self) -> f32 {
        match self {
            Self::Text { y, .. }
            | Self::Bullet { y, .. }
            | Self::Rule { y, .. }
            | Self::Watermark { y, .. }
            | Self::Image { y, .. } => *y,
        }
    }
}

/// One output page: an ordered instruction list plus bookkeeping the
/// decorator needs. Page numbers are contiguous and 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub number: usize,
    pub instructions: Vec<DrawInstruction>,
    /// Lowest y (top-down) reached by content on this page; the decorator
    /// uses it to decide whether the disclaimer still fits.
    pub content_bottom: f32,
}

impl PagePlan {
    pub fn new(number: usize, top_offset: f32) -> Self {
        Self {
            number,
            instructions: Vec::new(),
            content_bottom: top_offset,
        }
    }
}

/// Paginate blocks with the configured strategy.
///
/// Always yields at least one page, even for empty input.
pub fn paginate(
    blocks: &[ContentBlock],
    geometry: &PageGeometry,
    config: &ExportConfig,
) -> Result<Vec<PagePlan>> {
    match config.strategy {
        LayoutStrategy::Vector => Ok(vector::plan_pages(blocks, geometry)),
        LayoutStrategy::RasterSlice => {
            let pages = vector::plan_pages(blocks, geometry);
            raster::rasterize_pages(&pages, geometry, config)
        }
    }
}
