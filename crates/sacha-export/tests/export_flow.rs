// SPDX-License-Identifier: MIT
//
// End-to-end export flow tests covering the documented scenarios: pagination
// behavior at A4 geometry, bilingual decoration, strategy equivalence, and
// file delivery.

use std::sync::Arc;

use sacha_core::{ExportConfig, ExportRequest, Language, LayoutStrategy, SachaError};
use sacha_export::decorate::{apply_footers, decorate};
use sacha_export::layout::{paginate, DrawInstruction};
use sacha_export::{ConversionCache, Exporter, PageGeometry};

fn vector_config() -> ExportConfig {
    ExportConfig::default()
}

fn raster_config() -> ExportConfig {
    ExportConfig {
        strategy: LayoutStrategy::RasterSlice,
        ..ExportConfig::default()
    }
}

fn exporter(config: ExportConfig) -> Exporter {
    Exporter::new(config, Arc::new(ConversionCache::default()))
}

#[test]
fn three_short_paragraphs_export_to_one_page() {
    // Scenario A: under 400 characters total.
    let content = "The policy covers hospitalization costs.\n\n\
                   Premiums are payable annually in advance.\n\n\
                   Claims require the original discharge summary.";
    assert!(content.len() < 400);

    let g = PageGeometry::a4();
    let blocks = sacha_export::tokenize(content);
    let pages = paginate(&blocks, &g, &vector_config()).unwrap();
    assert_eq!(pages.len(), 1);
}

#[test]
fn overflowing_content_gets_numbered_continuation_pages() {
    // Scenario D: cumulative wrapped-line height exceeds one page.
    let g = PageGeometry::a4();
    let content = vec!["an insurance clause explained at length ".repeat(22); 12].join("\n\n");
    let blocks = sacha_export::tokenize(&content);
    let mut pages = paginate(&blocks, &g, &vector_config()).unwrap();
    assert!(pages.len() >= 2);

    decorate(
        &mut pages,
        Language::En,
        "Summary for policy",
        chrono::NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
        &g,
    );

    let total = pages.len();
    for page in &pages {
        let footer = page
            .instructions
            .iter()
            .find_map(|i| match i {
                DrawInstruction::Text { text, .. } if text.starts_with("Page ") => Some(text),
                _ => None,
            })
            .expect("every page carries a footer");
        assert_eq!(
            footer,
            &format!("Page {} of {} | © 2026 Sacha Advisor", page.number, total)
        );
    }
}

#[test]
fn vector_and_raster_strategies_agree_on_page_counts() {
    let g = PageGeometry::a4();
    for paragraphs in [1usize, 5, 12] {
        let content = vec!["strategy equivalence filler body ".repeat(20); paragraphs].join("\n\n");
        let blocks = sacha_export::tokenize(&content);
        let vector = paginate(&blocks, &g, &vector_config()).unwrap();
        let raster = paginate(&blocks, &g, &raster_config()).unwrap();
        assert_eq!(vector.len(), raster.len(), "{paragraphs} paragraphs");
    }
}

#[test]
fn footer_second_pass_survives_reapplication() {
    let g = PageGeometry::a4();
    let blocks = sacha_export::tokenize("stable body");
    let mut pages = paginate(&blocks, &g, &vector_config()).unwrap();
    decorate(
        &mut pages,
        Language::En,
        "Summary for doc",
        chrono::NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
        &g,
    );
    let snapshot = pages.clone();
    apply_footers(&mut pages, 2026, &g);
    assert_eq!(pages, snapshot);
}

#[tokio::test]
async fn hindi_export_requires_a_unicode_font() {
    // Hindi plan-level decoration (disclaimer, localized date) is covered by
    // the decorator's own tests. At the orchestrator level a default engine
    // carries only the WinAnsi builtin faces, so Devanagari must be refused
    // outright instead of serialized as garbled glyphs.
    let err = exporter(vector_config())
        .generate(
            "**बीमा सारांश**\n\nयह पॉलिसी अस्पताल खर्च को कवर करती है।\n\n- नकद रहित दावे",
            "policy.pdf",
            "hi",
        )
        .await
        .unwrap_err();
    match err {
        SachaError::FontError(msg) => assert!(msg.contains("with_font")),
        other => panic!("expected FontError, got {other:?}"),
    }
}

#[tokio::test]
async fn raster_export_round_trip() {
    let out = exporter(raster_config())
        .generate("**Summary**\n\nrasterized body text", "scan.jpeg", "en")
        .await
        .unwrap();
    assert!(out.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn output_binary_is_written_unmodified() {
    let out = exporter(vector_config())
        .generate("delivery body", "policy.pdf", "en")
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(&out.file_name);
    out.write_to_file(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), out.bytes);
}

#[tokio::test]
async fn repeated_requests_share_the_cache() {
    let cache = Arc::new(ConversionCache::new(8));
    let exporter = Exporter::new(vector_config(), Arc::clone(&cache));
    let request = ExportRequest::new("cached body text", "policy.pdf", Language::En);

    exporter.export(&request).await.unwrap();
    assert_eq!(cache.len(), 1);
    exporter.export(&request).await.unwrap();
    assert_eq!(cache.len(), 1);
}
