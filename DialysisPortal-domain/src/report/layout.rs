//! Page layout primitives for generated reports
//!
//! Coordinates are millimetres on an A4 page with the origin at the top-left
//! corner and `y` growing downwards. Blocks are built with coordinates
//! relative to their own top edge and are positioned by [`LayoutState::place`],
//! the only place that decides page breaks.

use chrono::NaiveDateTime;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;

/// Space reserved at the bottom of every page for the footer
pub const FOOTER_HEIGHT_MM: f32 = 12.0;

pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

/// First usable `y` on a page
pub const CONTENT_TOP_MM: f32 = MARGIN_MM;

/// Last usable `y` on a page
pub const CONTENT_BOTTOM_MM: f32 = PAGE_HEIGHT_MM - MARGIN_MM - FOOTER_HEIGHT_MM;

const FOOTER_TEXT_SIZE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const GREY: Rgb = Rgb::new(107, 114, 128);
    pub const LIGHT_GREY: Rgb = Rgb::new(229, 231, 235);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A positioned drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text with its baseline at `y`
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        color: Rgb,
        text: String,
    },
    /// Rectangle whose top-left corner is at (`x`, `y`)
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Rgb,
        thickness: f32,
    },
}

impl DrawOp {
    fn shifted(self, dy: f32) -> Self {
        match self {
            DrawOp::Text { x, y, size, weight, color, text } => DrawOp::Text {
                x,
                y: y + dy,
                size,
                weight,
                color,
                text,
            },
            DrawOp::Rect { x, y, width, height, fill, stroke } => DrawOp::Rect {
                x,
                y: y + dy,
                width,
                height,
                fill,
                stroke,
            },
            DrawOp::Line { x1, y1, x2, y2, color, thickness } => DrawOp::Line {
                x1,
                y1: y1 + dy,
                x2,
                y2: y2 + dy,
                color,
                thickness,
            },
        }
    }
}

/// A unit of content with an estimated height, placed as a whole
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl Block {
    pub fn new(height: f32) -> Self {
        Self {
            height,
            ops: Vec::new(),
        }
    }

    pub fn text(mut self, x: f32, y: f32, size: f32, weight: FontWeight, color: Rgb, text: impl Into<String>) -> Self {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            weight,
            color,
            text: text.into(),
        });
        self
    }

    pub fn rect(mut self, x: f32, y: f32, width: f32, height: f32, fill: Option<Rgb>, stroke: Option<Rgb>) -> Self {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
        self
    }

    pub fn line(mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb, thickness: f32) -> Self {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            thickness,
        });
        self
    }
}

/// A page under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

/// Mutable layout cursor over the pages built so far
#[derive(Debug, Clone)]
pub struct LayoutState {
    pages: Vec<Page>,
    cursor: f32,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            cursor: CONTENT_TOP_MM,
        }
    }

    /// Vertical space left on the current page
    pub fn remaining(&self) -> f32 {
        CONTENT_BOTTOM_MM - self.cursor
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page_is_empty(&self) -> bool {
        self.pages.last().map_or(true, |page| page.ops.is_empty())
    }

    pub fn start_new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = CONTENT_TOP_MM;
    }

    /// Place a block at the cursor, breaking the page first when it does not fit
    ///
    /// A block taller than a whole page is still placed on a fresh page
    /// rather than looping on page breaks. Returns the 1-based page number
    /// the block landed on.
    pub fn place(&mut self, block: Block) -> usize {
        self.ensure_space(block.height);

        let dy = self.cursor;
        if let Some(page) = self.pages.last_mut() {
            page.ops.extend(block.ops.into_iter().map(|op| op.shifted(dy)));
        }
        self.cursor += block.height;
        self.pages.len()
    }

    /// Break the page unless `height` still fits below the cursor
    ///
    /// Used to keep a heading together with the first block that follows it.
    pub fn ensure_space(&mut self, height: f32) {
        if self.remaining() < height && !self.current_page_is_empty() {
            self.start_new_page();
        }
    }

    /// Add vertical spacing without drawing anything
    pub fn advance(&mut self, gap: f32) {
        self.cursor = (self.cursor + gap).min(CONTENT_BOTTOM_MM);
    }

    pub fn into_document(self) -> ReportDocument {
        ReportDocument { pages: self.pages }
    }
}

/// Laid-out report still missing its page footers
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub pages: Vec<Page>,
}

/// Footer stamped on a finished page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFooter {
    pub page_number: usize,
    pub total_pages: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinishedPage {
    pub ops: Vec<DrawOp>,
    pub footer: PageFooter,
}

/// Report with every page footer stamped; ready for a rendering backend
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedReport {
    pub title: String,
    pub pages: Vec<FinishedPage>,
}

impl FinishedReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// `Gerado em dd/mm/yyyy HH:MM - Página X de N`
pub fn footer_text(generated_at: NaiveDateTime, page_number: usize, total_pages: usize) -> String {
    format!(
        "Gerado em {} - Página {} de {}",
        generated_at.format("%d/%m/%Y %H:%M"),
        page_number,
        total_pages
    )
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Footer pass: the total page count is only known once every block is placed
    pub fn finalize(self, title: impl Into<String>, generated_at: NaiveDateTime) -> FinishedReport {
        let total_pages = self.pages.len();
        let footer_y = PAGE_HEIGHT_MM - MARGIN_MM;

        let pages = self
            .pages
            .into_iter()
            .enumerate()
            .map(|(index, page)| {
                let page_number = index + 1;
                let text = footer_text(generated_at, page_number, total_pages);

                let mut ops = page.ops;
                ops.push(DrawOp::Line {
                    x1: MARGIN_MM,
                    y1: footer_y - 5.0,
                    x2: PAGE_WIDTH_MM - MARGIN_MM,
                    y2: footer_y - 5.0,
                    color: Rgb::LIGHT_GREY,
                    thickness: 0.5,
                });
                ops.push(DrawOp::Text {
                    x: MARGIN_MM,
                    y: footer_y,
                    size: FOOTER_TEXT_SIZE,
                    weight: FontWeight::Regular,
                    color: Rgb::GREY,
                    text: text.clone(),
                });

                FinishedPage {
                    ops,
                    footer: PageFooter {
                        page_number,
                        total_pages,
                        text,
                    },
                }
            })
            .collect();

        FinishedReport {
            title: title.into(),
            pages,
        }
    }
}

/// Greedy word wrap at `max_chars` characters per line
///
/// Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let word: String = word.into_iter().collect();
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .and_then(|d| d.and_hms_opt(14, 30, 0))
            .unwrap()
    }

    fn filler(height: f32) -> Block {
        Block::new(height).text(0.0, 4.0, 10.0, FontWeight::Regular, Rgb::BLACK, "x")
    }

    #[test]
    fn test_place_breaks_page_when_block_does_not_fit() {
        let mut state = LayoutState::new();
        let usable = CONTENT_BOTTOM_MM - CONTENT_TOP_MM;

        assert_eq!(state.place(filler(usable - 10.0)), 1);
        assert_eq!(state.place(filler(10.0)), 1);
        assert_eq!(state.remaining(), 0.0);
        assert_eq!(state.place(filler(0.5)), 2);
        assert_eq!(state.cursor(), CONTENT_TOP_MM + 0.5);
    }

    #[test]
    fn test_blocks_are_shifted_to_cursor() {
        let mut state = LayoutState::new();
        state.place(filler(20.0));
        state.place(filler(5.0));

        let document = state.into_document();
        let ys: Vec<f32> = document.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                _ => None,
            })
            .collect();

        assert_eq!(ys, vec![CONTENT_TOP_MM + 4.0, CONTENT_TOP_MM + 24.0]);
    }

    #[test]
    fn test_ensure_space_breaks_only_when_needed() {
        let mut state = LayoutState::new();
        state.ensure_space(PAGE_HEIGHT_MM);
        assert_eq!(state.page_count(), 1);

        state.place(filler(200.0));
        state.ensure_space(state.remaining());
        assert_eq!(state.page_count(), 1);

        state.ensure_space(state.remaining() + 1.0);
        assert_eq!(state.page_count(), 2);
        assert_eq!(state.cursor(), CONTENT_TOP_MM);
    }

    #[test]
    fn test_oversized_block_on_fresh_page_does_not_loop() {
        let mut state = LayoutState::new();
        assert_eq!(state.place(filler(PAGE_HEIGHT_MM * 2.0)), 1);
        assert_eq!(state.place(filler(1.0)), 2);
        assert_eq!(state.page_count(), 2);
    }

    #[test]
    fn test_finalize_stamps_every_page() {
        let mut state = LayoutState::new();
        for _ in 0..30 {
            state.place(filler(24.0));
        }
        let report = state.into_document().finalize("Relatório", generated_at());
        let total = report.page_count();

        assert!(total > 1);
        for (index, page) in report.pages.iter().enumerate() {
            assert_eq!(page.footer.page_number, index + 1);
            assert_eq!(page.footer.total_pages, total);
        }
        assert_eq!(
            report.pages[0].footer.text,
            format!("Gerado em 10/03/2024 14:30 - Página 1 de {}", total)
        );
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("um dois tres", 7), vec!["um dois", "tres"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
