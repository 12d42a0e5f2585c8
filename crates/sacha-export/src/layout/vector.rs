// SPDX-License-Identifier: MIT
//
// Vector layout strategy — native text placement computed from estimated
// font metrics.
//
// A vertical cursor flows top-down through each page. Wrapped lines are
// atomic placement units: a page break may fall between two lines or two
// blocks, never inside a line.

use tracing::debug;

use crate::tokenize::ContentBlock;

use super::geometry::{PageGeometry, BODY_SIZE, HEADER_SIZE};
use super::{DrawInstruction, PagePlan, TextAlign, TextStyle};

/// Flow blocks into page plans. Always produces at least one page.
pub(crate) fn plan_pages(blocks: &[ContentBlock], g: &PageGeometry) -> Vec<PagePlan> {
    let mut pages = vec![PagePlan::new(1, g.top_offset(1))];
    let mut cursor = g.top_offset(1);
    let floor = g.content_floor();
    let mut at_page_top = true;

    for block in blocks {
        if !at_page_top {
            cursor += g.block_spacing;
        }

        match block {
            ContentBlock::Header(text) => {
                let reservation =
                    g.header_spacing_top + g.header_line_height + g.header_spacing_bottom;
                if cursor + reservation > floor {
                    cursor = break_page(&mut pages, g);
                }
                cursor += g.header_spacing_top;
                push(
                    &mut pages,
                    cursor,
                    DrawInstruction::Text {
                        x: g.margin,
                        y: cursor,
                        size: HEADER_SIZE,
                        style: TextStyle::Accent,
                        align: TextAlign::Left,
                        text: text.clone(),
                    },
                );
                cursor += g.header_line_height;
                push(
                    &mut pages,
                    cursor,
                    DrawInstruction::Rule {
                        x: g.margin,
                        y: cursor,
                        width: g.usable_width(),
                        thickness: 1.5,
                    },
                );
                cursor += g.header_spacing_bottom;
            }
            ContentBlock::Paragraph(text) => {
                let max_chars = g.chars_per_width(g.usable_width(), BODY_SIZE);
                for line in wrap_text(text, max_chars) {
                    if cursor + g.line_height > floor {
                        cursor = break_page(&mut pages, g);
                    }
                    push(
                        &mut pages,
                        cursor + g.line_height,
                        DrawInstruction::Text {
                            x: g.margin,
                            y: cursor,
                            size: BODY_SIZE,
                            style: TextStyle::Regular,
                            align: TextAlign::Left,
                            text: line,
                        },
                    );
                    cursor += g.line_height;
                }
            }
            ContentBlock::BulletItem(text) => {
                let max_chars = g.chars_per_width(g.usable_width() - g.bullet_indent, BODY_SIZE);
                for (i, line) in wrap_text(text, max_chars).into_iter().enumerate() {
                    if cursor + g.line_height > floor {
                        cursor = break_page(&mut pages, g);
                    }
                    if i == 0 {
                        push(
                            &mut pages,
                            cursor + g.line_height,
                            DrawInstruction::Bullet {
                                x: g.margin,
                                y: cursor,
                                size: BODY_SIZE,
                            },
                        );
                    }
                    // Continuation lines align to the same indent.
                    push(
                        &mut pages,
                        cursor + g.line_height,
                        DrawInstruction::Text {
                            x: g.margin + g.bullet_indent,
                            y: cursor,
                            size: BODY_SIZE,
                            style: TextStyle::Regular,
                            align: TextAlign::Left,
                            text: line,
                        },
                    );
                    cursor += g.line_height;
                }
            }
        }

        at_page_top = false;
    }

    debug!(pages = pages.len(), blocks = blocks.len(), "vector layout complete");
    pages
}

/// Close the current page and open the next; returns the new cursor.
fn break_page(pages: &mut Vec<PagePlan>, g: &PageGeometry) -> f32 {
    let number = pages.len() + 1;
    let top = g.top_offset(number);
    pages.push(PagePlan::new(number, top));
    top
}

/// Append an instruction to the current page and track its content bottom.
fn push(pages: &mut [PagePlan], bottom: f32, instruction: DrawInstruction) {
    let page = pages.last_mut().expect("at least one page exists");
    page.instructions.push(instruction);
    if bottom > page.content_bottom {
        page.content_bottom = bottom;
    }
}

/// Word-wrap `text` so no line exceeds `max_chars` characters.
///
/// Counts characters, never bytes, so multi-byte scripts wrap on glyph
/// boundaries. Words longer than `max_chars` are force-broken.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            // Force-break the oversized word at character boundaries.
            let mut chunk = String::with_capacity(max_chars * 4);
            let mut chunk_chars = 0usize;
            for ch in word.chars() {
                if chunk_chars == max_chars {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_chars = 0;
                }
                chunk.push(ch);
                chunk_chars += 1;
            }
            if !chunk.is_empty() {
                current = chunk;
                current_chars = chunk_chars;
            }
        } else if current.is_empty() {
            current = word.to_string();
            current_chars = word_chars;
        } else if current_chars + 1 + word_chars <= max_chars {
            current.push(' ');
            current.push_str(word);
            current_chars += 1 + word_chars;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            current_chars = word_chars;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn g() -> PageGeometry {
        PageGeometry::a4()
    }

    #[test]
    fn empty_content_yields_one_page() {
        let pages = plan_pages(&[], &g());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].number, 1);
        assert!(pages[0].instructions.is_empty());
    }

    #[test]
    fn three_short_paragraphs_fit_one_page() {
        // Scenario A: under 400 characters at default A4 geometry.
        let blocks = tokenize(
            "This policy covers hospital expenses.\n\n\
             The annual premium is due in March.\n\n\
             Claims are settled within thirty days.",
        );
        let pages = plan_pages(&blocks, &g());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn long_content_breaks_onto_second_page() {
        // Scenario D: enough wrapped lines to exceed one page's budget.
        let paragraph = "coverage details repeated for length ".repeat(20);
        let content = vec![paragraph; 12].join("\n\n");
        let pages = plan_pages(&tokenize(&content), &g());
        assert!(pages.len() >= 2, "expected a page break, got {}", pages.len());
        assert_eq!(pages[1].number, 2);
    }

    #[test]
    fn page_numbers_are_contiguous_from_one() {
        let content = vec!["filler paragraph text ".repeat(40); 20].join("\n\n");
        let pages = plan_pages(&tokenize(&content), &g());
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
        }
    }

    #[test]
    fn no_instruction_below_usable_bound() {
        let geometry = g();
        let content = vec!["wrapping filler words for the layout test ".repeat(30); 15].join("\n\n");
        let pages = plan_pages(&tokenize(&content), &geometry);
        for page in &pages {
            for instruction in &page.instructions {
                assert!(
                    instruction.y() <= geometry.content_floor(),
                    "instruction at y={} breaches floor {} on page {}",
                    instruction.y(),
                    geometry.content_floor(),
                    page.number
                );
            }
        }
    }

    #[test]
    fn bullets_share_a_consistent_indent() {
        // Scenario B: five bullet items, each wrapping to multiple lines.
        let item = "bullet item text that definitely wraps across more than a single layout line because it keeps going";
        let content = (0..5).map(|_| format!("- {item}")).collect::<Vec<_>>().join("\n");
        let blocks = tokenize(&content);
        let pages = plan_pages(&blocks, &g());

        let geometry = g();
        let mut bullet_count = 0;
        for page in &pages {
            for instruction in &page.instructions {
                match instruction {
                    DrawInstruction::Bullet { x, .. } => {
                        bullet_count += 1;
                        assert!((x - geometry.margin).abs() < f32::EPSILON);
                    }
                    DrawInstruction::Text { x, .. } => {
                        assert!(
                            (x - (geometry.margin + geometry.bullet_indent)).abs() < f32::EPSILON
                        );
                    }
                    _ => {}
                }
            }
        }
        assert_eq!(bullet_count, 5);
    }

    #[test]
    fn page_count_monotonic_in_content_length() {
        let geometry = g();
        let mut last = 0;
        for n in [1usize, 4, 8, 16, 32] {
            let content = vec!["steadily growing content body ".repeat(25); n].join("\n\n");
            let count = plan_pages(&tokenize(&content), &geometry).len();
            assert!(count >= last);
            last = count;
        }
    }

    #[test]
    fn wrap_counts_chars_not_bytes() {
        // Ten Devanagari codepoints fit on one line of width ten even though
        // the byte length is far larger.
        let lines = wrap_text("कखगघङचछजझञ", 10);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn wrap_force_breaks_oversized_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn header_reservation_moves_to_next_page_whole() {
        let geometry = g();
        // Fill most of the first page, then a header: the header text and
        // its rule must land on the same page.
        let filler = "line filler words ".repeat(30);
        let content = format!("{}\n\n{}\n\n**Late Section**", filler, filler.repeat(8));
        let pages = plan_pages(&tokenize(&content), &geometry);
        for page in &pages {
            let headers: Vec<_> = page
                .instructions
                .iter()
                .filter(|i| matches!(i, DrawInstruction::Text { size, .. } if *size == HEADER_SIZE))
                .collect();
            let rules = page
                .instructions
                .iter()
                .filter(|i| matches!(i, DrawInstruction::Rule { .. }))
                .count();
            assert_eq!(headers.len(), rules, "header and rule split across pages");
        }
    }
}
