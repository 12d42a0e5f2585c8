// SPDX-License-Identifier: MIT
//
// Raster-slice layout strategy.
//
// The full document is painted once onto a tall in-memory render surface at
// a fixed scale, then cut into page-height slices which are re-encoded as
// JPEG and placed one per page. Slicing converts physical page height to
// pixel rows through the width-based scale ratio:
//
//     pixels_per_page = page_height / (page_width / surface_pixel_width)
//
// The surface is painted in page-aligned bands driven by the same metric
// flow as the vector strategy, so both strategies produce identical page
// counts and no wrapped line can straddle a slice boundary.
//
// Text is painted with embedded-graphics monospace fonts. This strategy
// trades glyph fidelity (ASCII-centric fonts, no text selection in the
// output) for implementation simplicity; bilingual output requires the
// vector strategy.

use std::convert::Infallible;

use embedded_graphics::{
    mono_font::{
        ascii::{FONT_10X20, FONT_9X18},
        MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, Line, PrimitiveStyle},
    text::{Baseline, Text},
};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage};
use tracing::{debug, instrument};

use sacha_core::error::{Result, SachaError};
use sacha_core::ExportConfig;

use super::geometry::PageGeometry;
use super::{DrawInstruction, PagePlan, TextStyle};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Scoped render surface: a white RGB pixel buffer the document is painted
/// onto before slicing.
///
/// The buffer is owned by this guard and released when the guard goes out
/// of scope, on every exit path including mid-render failure.
pub(crate) struct RenderSurface {
    buffer: RgbImage,
}

impl RenderSurface {
    fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SachaError::RenderError(format!(
                "degenerate surface dimensions {width}x{height}"
            )));
        }
        debug!(width, height, "render surface acquired");
        Ok(Self {
            buffer: RgbImage::from_pixel(width, height, WHITE),
        })
    }
}

impl Drop for RenderSurface {
    fn drop(&mut self) {
        debug!(
            width = self.buffer.width(),
            height = self.buffer.height(),
            "render surface released"
        );
    }
}

// embedded-graphics draws through the DrawTarget seam; implementing it for
// the surface lets the mono-font text renderer and primitives paint straight
// into the image buffer.
impl DrawTarget for RenderSurface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = (self.buffer.width() as i32, self.buffer.height() as i32);
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.x < w && point.y >= 0 && point.y < h {
                self.buffer.put_pixel(
                    point.x as u32,
                    point.y as u32,
                    Rgb([color.r(), color.g(), color.b()]),
                );
            }
        }
        Ok(())
    }
}

impl OriginDimensions for RenderSurface {
    fn size(&self) -> Size {
        Size::new(self.buffer.width(), self.buffer.height())
    }
}

/// Render already-planned pages to JPEG slices, one `Image` instruction per
/// page. Page numbering and content bottoms carry over from the source
/// plans.
#[instrument(skip_all, fields(pages = pages.len()))]
pub(crate) fn rasterize_pages(
    pages: &[PagePlan],
    g: &PageGeometry,
    config: &ExportConfig,
) -> Result<Vec<PagePlan>> {
    let scale = config.raster_scale;
    let surface_width = (g.width * scale).round() as u32;

    // Width-based ratio from the pagination contract.
    let pixels_per_page = (g.height / (g.width / surface_width as f32)).round() as u32;
    let surface_height = pixels_per_page * pages.len() as u32;

    let mut surface = RenderSurface::new(surface_width, surface_height)?;

    for (index, page) in pages.iter().enumerate() {
        let band_top = index as u32 * pixels_per_page;
        for instruction in &page.instructions {
            paint(&mut surface, instruction, band_top, scale);
        }
    }

    // Pt spanned by one surface pixel.
    let width_ratio = g.width / surface_width as f32;

    let mut out = Vec::with_capacity(pages.len());
    for (index, page) in pages.iter().enumerate() {
        let start_y = index as u32 * pixels_per_page;
        let remaining = surface_height - start_y;
        let slice_height = pixels_per_page.min(remaining);

        let slice =
            image::imageops::crop_imm(&surface.buffer, 0, start_y, surface_width, slice_height)
                .to_image();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, config.jpeg_quality)
            .write_image(
                slice.as_raw(),
                surface_width,
                slice_height,
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|err| {
                SachaError::ImageError(format!("failed to encode page slice: {err}"))
            })?;

        let mut plan = PagePlan::new(page.number, g.top_offset(page.number));
        plan.content_bottom = page.content_bottom;
        plan.instructions.push(DrawInstruction::Image {
            x: 0.0,
            y: 0.0,
            width: g.width,
            height: slice_height as f32 * width_ratio,
            px_width: surface_width,
            px_height: slice_height,
            jpeg,
        });
        out.push(plan);
    }

    debug!(
        surface_width,
        surface_height,
        pixels_per_page,
        "raster slicing complete"
    );
    Ok(out)
}

/// Paint one positioned instruction into the surface at its page band.
fn paint(surface: &mut RenderSurface, instruction: &DrawInstruction, band_top: u32, scale: f32) {
    let to_px = |pt: f32| (pt * scale).round() as i32;
    let band = band_top as i32;

    match instruction {
        DrawInstruction::Text {
            x,
            y,
            size,
            style,
            text,
            ..
        } => {
            // Mono fonts come in fixed sizes; pick the closest weight class.
            let font = if *size >= 14.0 { &FONT_10X20 } else { &FONT_9X18 };
            let color = match style {
                TextStyle::Accent => Rgb888::new(0xe6, 0x39, 0x46),
                TextStyle::Muted => Rgb888::new(0x95, 0xa5, 0xa6),
                _ => Rgb888::new(0x2c, 0x3e, 0x50),
            };
            let char_style = MonoTextStyle::new(font, color);
            let _ = Text::with_baseline(
                text,
                Point::new(to_px(*x), band + to_px(*y)),
                char_style,
                Baseline::Top,
            )
            .draw(surface);
        }
        DrawInstruction::Bullet { x, y, size } => {
            let diameter = (0.35 * size * scale).round() as u32;
            let _ = Circle::new(
                Point::new(to_px(*x), band + to_px(*y + 0.3 * size)),
                diameter.max(2),
            )
            .into_styled(PrimitiveStyle::with_fill(Rgb888::new(0xe6, 0x39, 0x46)))
            .draw(surface);
        }
        DrawInstruction::Rule {
            x,
            y,
            width,
            thickness,
        } => {
            let stroke = (thickness * scale).round().max(1.0) as u32;
            let _ = Line::new(
                Point::new(to_px(*x), band + to_px(*y)),
                Point::new(to_px(*x + *width), band + to_px(*y)),
            )
            .into_styled(PrimitiveStyle::with_stroke(
                Rgb888::new(0xe6, 0x39, 0x46),
                stroke,
            ))
            .draw(surface);
        }
        // Watermark and image placement stay vector-side; the planner never
        // emits them into content plans.
        DrawInstruction::Watermark { .. } | DrawInstruction::Image { .. } => {}
    }
}
