// SPDX-License-Identifier: MIT
//
// Core domain types for the Sacha Advisor export engine.

use chrono::Locale;
use serde::{Deserialize, Serialize};

/// Output languages supported by the export engine.
///
/// Translation itself happens upstream; the engine only selects fixed
/// strings (disclaimer, headings) and date formatting by language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English ("en").
    En,
    /// Hindi ("hi").
    Hi,
}

impl Language {
    /// Parse a two-letter language code. Unknown codes fall back to English,
    /// matching the upstream UI's default.
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "hi" => Self::Hi,
            _ => Self::En,
        }
    }

    /// ISO code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Chrono locale used for date stamps in the page-one header band.
    pub fn date_locale(&self) -> Locale {
        match self {
            Self::En => Locale::en_US,
            Self::Hi => Locale::hi_IN,
        }
    }

    /// Long date format string for the header band, per locale convention
    /// ("January 5, 2026" vs "5 जनवरी 2026").
    pub fn date_format(&self) -> &'static str {
        match self {
            Self::En => "%B %-d, %Y",
            Self::Hi => "%-d %B %Y",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

/// Standard paper sizes the export engine can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    Letter,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4
    }
}

/// How the layout planner turns content blocks into page plans.
///
/// Both strategies satisfy the same pagination contract and produce the
/// same page counts for the same geometry. `Vector` places native text and
/// is required for bilingual glyph fidelity; `RasterSlice` renders the full
/// content once to an image surface and slices it per page, trading text
/// selectability for implementation simplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStrategy {
    Vector,
    RasterSlice,
}

impl Default for LayoutStrategy {
    fn default() -> Self {
        Self::Vector
    }
}

/// One export invocation: the summary text plus the metadata needed to
/// name and localize the output. Fully consumed within a single call; the
/// engine never mutates it and it carries no persisted identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// AI-generated summary text with light markup (bold section headers,
    /// `- ` bullet lines, blank-line separated paragraphs).
    pub content: String,
    /// Name of the file the summary was produced from, extension included.
    pub original_file_name: String,
    /// Target output language.
    pub language: Language,
}

impl ExportRequest {
    pub fn new(
        content: impl Into<String>,
        original_file_name: impl Into<String>,
        language: Language,
    ) -> Self {
        Self {
            content: content.into(),
            original_file_name: original_file_name.into(),
            language,
        }
    }
}

/// The result of an export: the finished document and the name the host
/// should suggest in its save dialog.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Complete PDF binary. Either fully valid or the export failed as a
    /// whole — no partial binary is ever returned.
    pub bytes: Vec<u8>,
    /// Suggested file name, e.g. `Summary for policy.pdf`.
    pub file_name: String,
}

impl ExportOutput {
    /// Hand the binary unmodified to the filesystem, the engine-side
    /// analogue of the browser save-as action.
    pub fn write_to_file(&self, path: impl AsRef<std::path::Path>) -> crate::error::Result<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_round_trip() {
        assert_eq!(Language::from_code("hi"), Language::Hi);
        assert_eq!(Language::from_code("HI"), Language::Hi);
        assert_eq!(Language::from_code("en"), Language::En);
        // Unknown codes fall back to English.
        assert_eq!(Language::from_code("fr"), Language::En);
    }

    #[test]
    fn a4_dimensions() {
        assert_eq!(PaperSize::A4.dimensions_mm(), (210, 297));
    }
}
