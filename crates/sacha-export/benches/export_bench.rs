// SPDX-License-Identifier: MIT
//
// Criterion benchmarks for the export engine hot path: tokenization plus
// vector pagination, and the full plan-to-PDF encode.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sacha_core::ExportConfig;
use sacha_export::layout::paginate;
use sacha_export::{tokenize, PageGeometry, PdfEncoder};

/// A mid-sized summary: headers, bullets, and paragraphs spanning a few
/// pages at A4 geometry.
fn sample_content() -> String {
    let mut content = String::new();
    for section in 0..6 {
        content.push_str(&format!("**Section {section}**\n\n"));
        content.push_str(&"The policy clause explained in moderate detail for benchmarking. ".repeat(12));
        content.push_str("\n\n- first obligation of the insured party\n- second obligation of the insured party\n\n");
    }
    content
}

fn bench_tokenize_and_paginate(c: &mut Criterion) {
    let content = sample_content();
    let geometry = PageGeometry::a4();
    let config = ExportConfig::default();

    c.bench_function("tokenize + paginate (6 sections)", |b| {
        b.iter(|| {
            let blocks = tokenize(black_box(&content));
            let pages = paginate(&blocks, &geometry, &config).unwrap();
            black_box(pages);
        });
    });
}

fn bench_encode(c: &mut Criterion) {
    let content = sample_content();
    let geometry = PageGeometry::a4();
    let config = ExportConfig::default();
    let blocks = tokenize(&content);
    let pages = paginate(&blocks, &geometry, &config).unwrap();
    let encoder = PdfEncoder::new(geometry);

    c.bench_function("encode planned pages to PDF", |b| {
        b.iter(|| {
            let bytes = encoder.encode(black_box(&pages)).unwrap();
            black_box(bytes);
        });
    });
}

criterion_group!(benches, bench_tokenize_and_paginate, bench_encode);
criterion_main!(benches);
