// SPDX-License-Identifier: MIT
//
// Markup tokenizer — parses raw summary text into an ordered sequence of
// typed content blocks.
//
// The input vocabulary is deliberately small: `**bold**` runs become section
// headers, lines starting with `- ` become bullet items, and everything else
// groups into paragraphs split on blank-line boundaries. No block type may
// span a blank line. An unmatched bold marker is not an error; it stays in
// the text as literal characters.

use tracing::trace;

/// One semantic unit of input text. Created by the tokenizer, consumed by
/// the layout planner, immutable in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Section header, bold markers stripped.
    Header(String),
    /// Plain paragraph run.
    Paragraph(String),
    /// Bullet line, `- ` marker stripped.
    BulletItem(String),
}

impl ContentBlock {
    /// The block's text payload.
    pub fn text(&self) -> &str {
        match self {
            Self::Header(t) | Self::Paragraph(t) | Self::BulletItem(t) => t,
        }
    }
}

const BOLD_MARKER: &str = "**";
const BULLET_MARKER: &str = "- ";

/// Tokenize raw content into blocks, strictly in source order.
///
/// Splitting and marker scanning operate on `&str` slices at character
/// boundaries only, so multi-byte scripts (Devanagari in particular) pass
/// through unharmed.
pub fn tokenize(content: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    for segment in split_on_blank_lines(content) {
        tokenize_segment(segment, &mut blocks);
    }

    trace!(blocks = blocks.len(), "tokenized content");
    blocks
}

/// Split content on blank-line boundaries. A line counts as blank when it
/// holds nothing but whitespace; runs of blank lines collapse.
fn split_on_blank_lines(content: &str) -> Vec<Vec<&str>> {
    let mut segments: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Tokenize one blank-line-delimited segment, line by line.
///
/// Bullet lines and header runs interrupt paragraph accumulation, so block
/// order always matches source order.
fn tokenize_segment(lines: Vec<&str>, blocks: &mut Vec<ContentBlock>) {
    let mut paragraph = String::new();

    let flush = |paragraph: &mut String, blocks: &mut Vec<ContentBlock>| {
        let text = paragraph.trim();
        if !text.is_empty() {
            blocks.push(ContentBlock::Paragraph(text.to_string()));
        }
        paragraph.clear();
    };

    for line in lines {
        let trimmed = line.trim();

        if let Some(item) = trimmed.strip_prefix(BULLET_MARKER) {
            flush(&mut paragraph, blocks);
            let item = item.trim();
            if !item.is_empty() {
                blocks.push(ContentBlock::BulletItem(item.to_string()));
            }
            continue;
        }

        if trimmed.contains(BOLD_MARKER) {
            flush(&mut paragraph, blocks);
            scan_bold_runs(trimmed, blocks, &mut paragraph);
            continue;
        }

        if !paragraph.is_empty() {
            paragraph.push(' ');
        }
        paragraph.push_str(trimmed);
    }

    flush(&mut paragraph, blocks);
}

/// Extract `**…**` delimited runs from a line as headers. Text outside the
/// markers resumes paragraph accumulation; an unmatched trailing marker is
/// recovered as literal text.
fn scan_bold_runs(line: &str, blocks: &mut Vec<ContentBlock>, paragraph: &mut String) {
    let mut rest = line;

    loop {
        match rest.find(BOLD_MARKER) {
            Some(open) => {
                let before = &rest[..open];
                let after_open = &rest[open + BOLD_MARKER.len()..];

                match after_open.find(BOLD_MARKER) {
                    Some(close) if close > 0 => {
                        // Balanced, non-empty run: emit surrounding text as
                        // paragraph content, the run itself as a header.
                        push_paragraph_text(paragraph, before);
                        if !paragraph.trim().is_empty() {
                            blocks.push(ContentBlock::Paragraph(paragraph.trim().to_string()));
                        }
                        paragraph.clear();
                        blocks.push(ContentBlock::Header(
                            after_open[..close].trim().to_string(),
                        ));
                        rest = &after_open[close + BOLD_MARKER.len()..];
                    }
                    _ => {
                        // Unmatched (or empty `****`) marker: keep the whole
                        // remainder as literal paragraph text.
                        push_paragraph_text(paragraph, rest);
                        return;
                    }
                }
            }
            None => {
                push_paragraph_text(paragraph, rest);
                return;
            }
        }
    }
}

fn push_paragraph_text(paragraph: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !paragraph.is_empty() {
        paragraph.push(' ');
    }
    paragraph.push_str(text);
}
