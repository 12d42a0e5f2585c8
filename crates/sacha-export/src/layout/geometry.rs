// SPDX-License-Identifier: MIT
//
// Page geometry — the physical page contract in PDF points.
//
// All vertical coordinates in the layout pipeline are top-down distances
// from the page's top edge; the PDF encoder flips them into PDF's bottom-up
// space at the last moment.

use sacha_core::PaperSize;

/// Points per millimetre (1 pt = 1/72 in, 25.4 mm = 1 in).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Body text size in points.
pub const BODY_SIZE: f32 = 11.0;
/// Section header text size in points.
pub const HEADER_SIZE: f32 = 16.0;
/// Footer text size in points.
pub const FOOTER_SIZE: f32 = 9.0;

/// Fixed page measurements. Process-wide constant once constructed, never
/// mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    /// Uniform page margin in points (20 mm on A4).
    pub margin: f32,
    /// Vertical space reserved at the bottom for the running footer.
    pub footer_reserve: f32,
    /// Extra space reserved at the top of page one for the branded header
    /// band.
    pub header_band: f32,
    /// Fixed advance per wrapped body line.
    pub line_height: f32,
    /// Advance for a section header line.
    pub header_line_height: f32,
    /// Spacing inserted above a section header.
    pub header_spacing_top: f32,
    /// Spacing inserted below a section header (above its rule).
    pub header_spacing_bottom: f32,
    /// Spacing between any two blocks (not incurred at the top of a page).
    pub block_spacing: f32,
    /// Horizontal offset from the left margin to bullet item text; wrapped
    /// continuation lines align to the same indent.
    pub bullet_indent: f32,
}

impl PageGeometry {
    /// Geometry for the given paper size with the production defaults.
    pub fn for_paper(paper: PaperSize) -> Self {
        let (w_mm, h_mm) = paper.dimensions_mm();
        Self {
            width: w_mm as f32 * PT_PER_MM,
            height: h_mm as f32 * PT_PER_MM,
            margin: 20.0 * PT_PER_MM,
            footer_reserve: 30.0,
            header_band: 110.0,
            line_height: 18.0,
            header_line_height: 22.0,
            header_spacing_top: 14.0,
            header_spacing_bottom: 8.0,
            block_spacing: 10.0,
            bullet_indent: 18.0,
        }
    }

    /// A4 geometry, the production default.
    pub fn a4() -> Self {
        Self::for_paper(PaperSize::A4)
    }

    /// Horizontal width available to content.
    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Vertical layout budget per page, measured from the top content
    /// offset: `height - 2*margin - footer_reserve`. No draw instruction may
    /// be placed below `margin + usable_height()` — breaching it triggers a
    /// page break instead.
    pub fn usable_height(&self) -> f32 {
        self.height - 2.0 * self.margin - self.footer_reserve
    }

    /// Top content offset for the given 1-based page number. Page one
    /// reserves room for the branded header band.
    pub fn top_offset(&self, page_number: usize) -> f32 {
        if page_number == 1 {
            self.margin + self.header_band
        } else {
            self.margin
        }
    }

    /// Lowest y (top-down) any content instruction may occupy.
    pub fn content_floor(&self) -> f32 {
        self.margin + self.usable_height()
    }

    /// Baseline y for the running footer.
    pub fn footer_y(&self) -> f32 {
        self.height - self.margin - self.footer_reserve / 2.0
    }

    /// Estimated advance width of a string at `size` points, using the
    /// average Helvetica glyph width (~0.5 em). Counts characters, not
    /// bytes, so multi-byte scripts are measured per glyph.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * 0.5 * size
    }

    /// Maximum characters that fit in `width` points at `size` points.
    pub fn chars_per_width(&self, width: f32, size: f32) -> usize {
        ((width / (0.5 * size)) as usize).max(1)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_dimensions_in_points() {
        let g = PageGeometry::a4();
        assert!((g.width - 595.27).abs() < 0.1);
        assert!((g.height - 841.88).abs() < 0.1);
    }

    #[test]
    fn usable_height_formula() {
        let g = PageGeometry::a4();
        assert!((g.usable_height() - (g.height - 2.0 * g.margin - g.footer_reserve)).abs() < f32::EPSILON);
    }

    #[test]
    fn first_page_reserves_header_band() {
        let g = PageGeometry::a4();
        assert!(g.top_offset(1) > g.top_offset(2));
        assert!((g.top_offset(2) - g.margin).abs() < f32::EPSILON);
    }
}
