// SPDX-License-Identifier: MIT
//
// PDF encoder — serializes decorated page plans into a compressed PDF
// binary using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised
// via `PdfDocument::save()`. Layout coordinates arrive top-down in points
// and are flipped into PDF's bottom-up space here.

use printpdf::{
    BuiltinFont, Color, FontId, Line, LinePoint, Mm, Op, ParsedFont, PdfDocument, PdfPage,
    PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage, RawImageData, RawImageFormat, Rgb, TextItem,
    TextMatrix, XObjectTransform,
};
use tracing::{debug, info, instrument};

use sacha_core::error::{Result, SachaError};

use crate::layout::geometry::{PageGeometry, PT_PER_MM};
use crate::layout::{DrawInstruction, PagePlan, TextAlign, TextStyle};

const WATERMARK_SIZE: f32 = 72.0;
const WATERMARK_ANGLE_DEG: f32 = 45.0;

// Brand palette.
const ACCENT: (f32, f32, f32) = (0.902, 0.224, 0.275); // #E63946
const BODY: (f32, f32, f32) = (0.173, 0.243, 0.314); // #2c3e50
const MUTED: (f32, f32, f32) = (0.584, 0.647, 0.651); // #95a5a6
// The brand mark is #e8e8e8 at 12% opacity. It is always the first op on a
// page, so its backdrop is the white page and the alpha blend is a constant:
// 0.12 * (0xe8/255) + 0.88 * 1.0.
const WATERMARK_OPACITY: f32 = 0.12;
const WATERMARK_GRAY: (f32, f32, f32) = (0.989, 0.989, 0.989);

/// Serializes decorated page plans into PDF bytes.
///
/// Text uses the built-in Helvetica faces by default. Built-in fonts are
/// WinAnsi-encoded and carry no Devanagari glyphs, so text outside that
/// repertoire is rejected with [`SachaError::FontError`] unless a Unicode
/// TTF is supplied via [`PdfEncoder::with_font`].
pub struct PdfEncoder {
    geometry: PageGeometry,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Optional TTF bytes for full Unicode text runs.
    font_bytes: Option<Vec<u8>>,
}

impl PdfEncoder {
    /// Create an encoder for the given geometry.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            title: None,
            font_bytes: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Use an embedded TTF for all text operations instead of the built-in
    /// Helvetica faces.
    pub fn with_font(mut self, ttf_bytes: Vec<u8>) -> Self {
        self.font_bytes = Some(ttf_bytes);
        self
    }

    /// Encode decorated page plans into a complete PDF binary.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn encode(&self, pages: &[PagePlan]) -> Result<Vec<u8>> {
        let g = &self.geometry;
        let title = self.title.as_deref().unwrap_or("Sacha Advisor Document");
        let (page_w, page_h) = (Mm(g.width / PT_PER_MM), Mm(g.height / PT_PER_MM));

        info!(title, "encoding PDF");

        let mut doc = PdfDocument::new(title);
        let mut warnings: Vec<PdfWarnMsg> = Vec::new();

        let embedded_font: Option<FontId> = match &self.font_bytes {
            Some(bytes) => {
                let parsed = ParsedFont::from_bytes(bytes, 0, &mut warnings).ok_or_else(|| {
                    SachaError::FontError("supplied TTF bytes could not be parsed".into())
                })?;
                Some(doc.add_font(&parsed))
            }
            None => None,
        };

        let mut pdf_pages: Vec<PdfPage> = Vec::with_capacity(pages.len().max(1));
        for page in pages {
            let mut ops: Vec<Op> = Vec::new();
            for instruction in &page.instructions {
                self.emit(&mut doc, &mut ops, instruction, embedded_font.as_ref())?;
            }
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
        }

        // A document must carry at least one page.
        if pdf_pages.is_empty() {
            pdf_pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pdf_pages);

        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(bytes = output.len(), warnings = warnings.len(), "PDF serialized");
        Ok(output)
    }

    fn emit(
        &self,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
        instruction: &DrawInstruction,
        font: Option<&FontId>,
    ) -> Result<()> {
        let g = &self.geometry;

        match instruction {
            DrawInstruction::Text {
                x,
                y,
                size,
                style,
                align,
                text,
            } => {
                let x = match align {
                    TextAlign::Left => *x,
                    TextAlign::Center => *x - g.text_width(text, *size) / 2.0,
                };
                // Top-down line top -> bottom-up baseline.
                let baseline = g.height - (y + size);
                self.text_ops(ops, x, baseline, *size, style_color(*style), *style, text, font)?;
            }
            DrawInstruction::Bullet { x, y, size } => {
                let baseline = g.height - (y + size);
                self.text_ops(
                    ops,
                    *x,
                    baseline,
                    *size,
                    color(ACCENT),
                    TextStyle::Bold,
                    "•",
                    font,
                )?;
            }
            DrawInstruction::Rule {
                x,
                y,
                width,
                thickness,
            } => {
                let y_pdf = g.height - y;
                ops.push(Op::SaveGraphicsState);
                ops.push(Op::SetOutlineColor { col: color(ACCENT) });
                ops.push(Op::SetOutlineThickness {
                    pt: Pt(*thickness),
                });
                ops.push(Op::DrawLine {
                    line: Line {
                        points: vec![
                            LinePoint {
                                p: Point {
                                    x: Pt(*x),
                                    y: Pt(y_pdf),
                                },
                                bezier: false,
                            },
                            LinePoint {
                                p: Point {
                                    x: Pt(*x + *width),
                                    y: Pt(y_pdf),
                                },
                                bezier: false,
                            },
                        ],
                        is_closed: false,
                    },
                });
                ops.push(Op::RestoreGraphicsState);
            }
            DrawInstruction::Watermark { x, y, text } => {
                // Centered 45-degree brand mark. The translation backs the
                // baseline origin down the rotated axis by half the text
                // width so the mark pivots around the page center.
                ensure_builtin_encodable(text)?;
                let half = g.text_width(text, WATERMARK_SIZE) / 2.0;
                let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
                let x0 = x - half * cos;
                let y0 = (g.height - y) - half * sin;

                ops.push(Op::SaveGraphicsState);
                ops.push(Op::StartTextSection);
                ops.push(Op::SetFillColor {
                    col: color(WATERMARK_GRAY),
                });
                ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::TranslateRotate(Pt(x0), Pt(y0), WATERMARK_ANGLE_DEG),
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(WATERMARK_SIZE),
                    font: BuiltinFont::HelveticaBold,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.clone())],
                    font: BuiltinFont::HelveticaBold,
                });
                ops.push(Op::EndTextSection);
                ops.push(Op::RestoreGraphicsState);
            }
            DrawInstruction::Image {
                x,
                y,
                width,
                height,
                px_width,
                px_height,
                jpeg,
            } => {
                // Decode the slice to raw RGB8 for printpdf.
                let dynamic = image::load_from_memory(jpeg).map_err(|err| {
                    SachaError::ImageError(format!("failed to decode page slice: {err}"))
                })?;
                let rgb = dynamic.to_rgb8();
                let raw = RawImage {
                    pixels: RawImageData::U8(rgb.into_raw()),
                    width: *px_width as usize,
                    height: *px_height as usize,
                    data_format: RawImageFormat::RGB8,
                    tag: Vec::new(),
                };
                let xobject_id = doc.add_image(&raw);

                // At dpi 72 one pixel maps to one point; scale to the
                // requested placement box.
                ops.push(Op::UseXobject {
                    id: xobject_id,
                    transform: XObjectTransform {
                        translate_x: Some(Pt(*x)),
                        translate_y: Some(Pt(g.height - y - height)),
                        scale_x: Some(width / *px_width as f32),
                        scale_y: Some(height / *px_height as f32),
                        dpi: Some(72.0),
                        rotate: None,
                    },
                });
            }
        }
        Ok(())
    }

    /// Emit one positioned text run, via the embedded font when present.
    #[allow(clippy::too_many_arguments)]
    fn text_ops(
        &self,
        ops: &mut Vec<Op>,
        x: f32,
        baseline: f32,
        size: f32,
        col: Color,
        style: TextStyle,
        text: &str,
        font: Option<&FontId>,
    ) -> Result<()> {
        if font.is_none() {
            ensure_builtin_encodable(text)?;
        }
        ops.push(Op::SaveGraphicsState);
        ops.push(Op::StartTextSection);
        ops.push(Op::SetFillColor { col });
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: Pt(baseline),
            },
        });
        match font {
            Some(id) => {
                ops.push(Op::SetFontSize {
                    size: Pt(size),
                    font: id.clone(),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font: id.clone(),
                });
            }
            None => {
                let face = builtin_face(style);
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(size),
                    font: face,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.to_string())],
                    font: face,
                });
            }
        }
        ops.push(Op::EndTextSection);
        ops.push(Op::RestoreGraphicsState);
        Ok(())
    }
}

/// The built-in faces are WinAnsi (Windows-1252) encoded. Refuse text they
/// cannot carry instead of letting the serializer substitute garbage bytes.
fn ensure_builtin_encodable(text: &str) -> Result<()> {
    if let Some(ch) = text.chars().find(|ch| !winansi_encodable(*ch)) {
        return Err(SachaError::FontError(format!(
            "'{ch}' (U+{:04X}) has no glyph in the built-in Helvetica faces; \
             embed a Unicode font via PdfEncoder::with_font",
            ch as u32
        )));
    }
    Ok(())
}

/// Windows-1252: printable ASCII, the Latin-1 upper range, and the 0x80-0x9F
/// extras.
fn winansi_encodable(ch: char) -> bool {
    matches!(ch,
        '\u{0020}'..='\u{007e}'
        | '\u{00a0}'..='\u{00ff}'
        | '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž'
        | '‘' | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ'
    )
}

fn builtin_face(style: TextStyle) -> BuiltinFont {
    match style {
        TextStyle::Regular | TextStyle::Muted => BuiltinFont::Helvetica,
        TextStyle::Bold | TextStyle::Accent => BuiltinFont::HelveticaBold,
    }
}

fn style_color(style: TextStyle) -> Color {
    match style {
        TextStyle::Regular | TextStyle::Bold => color(BODY),
        TextStyle::Accent => color(ACCENT),
        TextStyle::Muted => color(MUTED),
    }
}

fn color((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{TextAlign, TextStyle};

    fn text(y: f32, text: &str) -> DrawInstruction {
        DrawInstruction::Text {
            x: 56.0,
            y,
            size: 11.0,
            style: TextStyle::Regular,
            align: TextAlign::Left,
            text: text.into(),
        }
    }

    #[test]
    fn encodes_a_minimal_document() {
        let g = PageGeometry::a4();
        let mut page = PagePlan::new(1, g.top_offset(1));
        page.instructions.push(DrawInstruction::Watermark {
            x: g.width / 2.0,
            y: g.height / 2.0,
            text: "Sacha Advisor".into(),
        });
        page.instructions.push(text(200.0, "hello"));

        let mut encoder = PdfEncoder::new(g);
        encoder.set_title("Summary for policy");
        let bytes = encoder.encode(&[page]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_page_list_still_yields_a_valid_document() {
        let encoder = PdfEncoder::new(PageGeometry::a4());
        let bytes = encoder.encode(&[]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rejects_devanagari_without_embedded_font() {
        let g = PageGeometry::a4();
        let mut page = PagePlan::new(1, g.top_offset(1));
        page.instructions.push(text(200.0, "पॉलिसी सारांश"));

        let err = PdfEncoder::new(g).encode(&[page]).unwrap_err();
        match err {
            SachaError::FontError(msg) => assert!(msg.contains("with_font")),
            other => panic!("expected FontError, got {other:?}"),
        }
    }

    #[test]
    fn winansi_repertoire_is_accepted_by_builtin_faces() {
        // Latin-1 accents and the 0x80-0x9F extras all have builtin glyphs.
        let g = PageGeometry::a4();
        let mut page = PagePlan::new(1, g.top_offset(1));
        page.instructions
            .push(text(200.0, "résumé — “quotes”, bullets • and €42"));

        let bytes = PdfEncoder::new(g).encode(&[page]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn watermark_tint_is_the_brand_gray_at_twelve_percent() {
        // #e8e8e8 at 12% over the white page.
        let expected = WATERMARK_OPACITY * (0xe8 as f32 / 255.0) + (1.0 - WATERMARK_OPACITY);
        assert!((WATERMARK_GRAY.0 - expected).abs() < 0.005);
        assert_eq!(WATERMARK_GRAY.0, WATERMARK_GRAY.1);
        assert_eq!(WATERMARK_GRAY.1, WATERMARK_GRAY.2);
    }

    #[test]
    fn rejects_unparseable_font_bytes() {
        let g = PageGeometry::a4();
        let page = PagePlan::new(1, g.top_offset(1));
        let encoder = PdfEncoder::new(g).with_font(vec![0u8; 16]);
        assert!(matches!(
            encoder.encode(&[page]),
            Err(SachaError::FontError(_))
        ));
    }
}
