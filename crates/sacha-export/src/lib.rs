// SPDX-License-Identifier: MIT
//
// sacha-export — Document export engine for Sacha Advisor.
//
// Turns a block of AI-generated, lightly marked-up summary text into a
// multi-page, watermarked, bilingual, compressed PDF. The pipeline is
// tokenize -> cache -> paginate -> decorate -> encode, owned end to end by
// the `Exporter` orchestrator.

pub mod cache;
pub mod decorate;
pub mod export;
pub mod layout;
pub mod pdf;
pub mod tokenize;

// Re-export the primary types so callers can use `sacha_export::Exporter` etc.
pub use cache::ConversionCache;
pub use export::Exporter;
pub use layout::geometry::PageGeometry;
pub use layout::{DrawInstruction, PagePlan};
pub use pdf::PdfEncoder;
pub use tokenize::{tokenize, ContentBlock};
