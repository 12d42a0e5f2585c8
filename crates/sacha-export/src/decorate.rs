// SPDX-License-Identifier: MIT
//
// Page decorator — watermark, branded header band, localized disclaimer,
// and the running footer.
//
// Decoration happens after pagination because the footer needs the final
// page count; the footer is therefore a second pass over finished plans.
// The disclaimer may still add one page (when the last content page has no
// room left), which is why it runs before the footer pass.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use sacha_core::Language;

use crate::layout::geometry::{PageGeometry, FOOTER_SIZE};
use crate::layout::{DrawInstruction, PagePlan, TextAlign, TextStyle};

pub const BRAND_NAME: &str = "Sacha Advisor";
pub const BRAND_TAGLINE: &str = "AI-Powered Insurance Document Summary";

const DISCLAIMER_TITLE_EN: &str = "IMPORTANT DISCLAIMER";
const DISCLAIMER_TITLE_HI: &str = "महत्वपूर्ण अस्वीकरण";

const DISCLAIMER_EN: &str = "This document is AI-generated and may contain errors. \
    Please verify all facts before making any financial decisions. This information \
    is for general guidance only and is not a substitute for professional financial \
    or legal advice.";

const DISCLAIMER_HI: &str = "यह दस्तावेज़ AI द्वारा उत्पन्न किया गया है और इसमें त्रुटियां हो सकती हैं। \
    कृपया कोई भी वित्तीय निर्णय लेने से पहले तथ्यों की पुष्टि करें। यह सूचना केवल सामान्य मार्गदर्शन के \
    लिए है और पेशेवर वित्तीय या कानूनी सलाह का विकल्प नहीं है।";

const DISCLAIMER_BODY_SIZE: f32 = 10.0;
const DISCLAIMER_LINE_HEIGHT: f32 = 14.0;
const DISCLAIMER_TITLE_HEIGHT: f32 = 18.0;
const DISCLAIMER_SPACING: f32 = 24.0;

/// Fixed disclaimer paragraph for a language. Selection only — translation
/// happens upstream.
pub fn disclaimer_text(language: Language) -> &'static str {
    match language {
        Language::En => DISCLAIMER_EN,
        Language::Hi => DISCLAIMER_HI,
    }
}

/// Localized disclaimer heading.
pub fn disclaimer_title(language: Language) -> &'static str {
    match language {
        Language::En => DISCLAIMER_TITLE_EN,
        Language::Hi => DISCLAIMER_TITLE_HI,
    }
}

/// Decorate paginated plans in place: watermark on every page, header band
/// on page one, disclaimer on (or after) the last content page, then the
/// footer numbering pass.
pub fn decorate(
    pages: &mut Vec<PagePlan>,
    language: Language,
    document_title: &str,
    generated_date: NaiveDate,
    g: &PageGeometry,
) {
    apply_watermarks(pages, g);
    apply_header_band(pages, language, document_title, generated_date, g);
    apply_disclaimer(pages, language, g);
    apply_footers(pages, generated_date.year(), g);
    debug!(pages = pages.len(), language = language.code(), "decoration complete");
}

/// Prepend one centered diagonal watermark to every page that lacks one, so
/// it sits beneath all content in z-order. Every page carries exactly one.
fn apply_watermarks(pages: &mut [PagePlan], g: &PageGeometry) {
    for page in pages.iter_mut() {
        let already = page
            .instructions
            .iter()
            .any(|i| matches!(i, DrawInstruction::Watermark { .. }));
        if !already {
            page.instructions.insert(
                0,
                DrawInstruction::Watermark {
                    x: g.width / 2.0,
                    y: g.height / 2.0,
                    text: BRAND_NAME.to_string(),
                },
            );
        }
    }
}

/// Header band on page one: brand title, subtitle, accent rule, source
/// document name, localized generation date. Fits inside the band the
/// planner reserved above the content flow.
fn apply_header_band(
    pages: &mut [PagePlan],
    language: Language,
    document_title: &str,
    generated_date: NaiveDate,
    g: &PageGeometry,
) {
    let Some(first) = pages.first_mut() else {
        return;
    };

    let date_text = generated_date
        .format_localized(language.date_format(), language.date_locale())
        .to_string();

    let mut y = g.margin;
    first.instructions.push(DrawInstruction::Text {
        x: g.margin,
        y,
        size: 28.0,
        style: TextStyle::Accent,
        align: TextAlign::Left,
        text: BRAND_NAME.to_string(),
    });
    y += 32.0;
    first.instructions.push(DrawInstruction::Text {
        x: g.margin,
        y,
        size: 12.0,
        style: TextStyle::Muted,
        align: TextAlign::Left,
        text: BRAND_TAGLINE.to_string(),
    });
    y += 18.0;
    first.instructions.push(DrawInstruction::Rule {
        x: g.margin,
        y,
        width: g.usable_width(),
        thickness: 2.0,
    });
    y += 10.0;
    first.instructions.push(DrawInstruction::Text {
        x: g.margin,
        y,
        size: 13.0,
        style: TextStyle::Bold,
        align: TextAlign::Left,
        text: document_title.to_string(),
    });
    y += 16.0;
    first.instructions.push(DrawInstruction::Text {
        x: g.margin,
        y,
        size: 10.0,
        style: TextStyle::Muted,
        align: TextAlign::Left,
        text: date_text,
    });
}

/// Disclaimer block on the final content page, or a fresh page when the
/// remaining room is insufficient.
fn apply_disclaimer(pages: &mut Vec<PagePlan>, language: Language, g: &PageGeometry) {
    let body = disclaimer_text(language);
    let max_chars = g.chars_per_width(g.usable_width(), DISCLAIMER_BODY_SIZE);
    let lines = crate::layout::vector::wrap_text(body, max_chars);

    let needed = DISCLAIMER_SPACING
        + DISCLAIMER_TITLE_HEIGHT
        + lines.len() as f32 * DISCLAIMER_LINE_HEIGHT;

    let fits_last = pages
        .last()
        .map(|p| p.content_bottom + needed <= g.content_floor())
        .unwrap_or(false);

    if !fits_last {
        let number = pages.len() + 1;
        pages.push(PagePlan::new(number, g.top_offset(number)));
        apply_watermarks(pages, g);
    }

    let page = pages.last_mut().expect("pages cannot be empty here");
    let mut y = page.content_bottom + DISCLAIMER_SPACING;

    page.instructions.push(DrawInstruction::Text {
        x: g.margin,
        y,
        size: 13.0,
        style: TextStyle::Accent,
        align: TextAlign::Left,
        text: disclaimer_title(language).to_string(),
    });
    y += DISCLAIMER_TITLE_HEIGHT;

    for line in lines {
        page.instructions.push(DrawInstruction::Text {
            x: g.margin,
            y,
            size: DISCLAIMER_BODY_SIZE,
            style: TextStyle::Regular,
            align: TextAlign::Left,
            text: line,
        });
        y += DISCLAIMER_LINE_HEIGHT;
    }
    page.content_bottom = y;
}

/// Second pass: stamp `Page {i} of {total} | © {year} {brand}` centered in
/// the footer reserve of every page. Any previously stamped footers are
/// replaced, so re-running the pass is idempotent.
pub fn apply_footers(pages: &mut [PagePlan], year: i32, g: &PageGeometry) {
    let total = pages.len();
    let footer_y = g.footer_y();

    for page in pages.iter_mut() {
        page.instructions.retain(
            |i| !matches!(i, DrawInstruction::Text { y, .. } if (*y - footer_y).abs() < f32::EPSILON),
        );
        page.instructions.push(DrawInstruction::Text {
            x: g.width / 2.0,
            y: footer_y,
            size: FOOTER_SIZE,
            style: TextStyle::Muted,
            align: TextAlign::Center,
            text: format!("Page {} of {} | © {} {}", page.number, total, year, BRAND_NAME),
        });
    }
}
