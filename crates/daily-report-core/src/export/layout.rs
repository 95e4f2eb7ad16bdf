//! Page layout for the report document.
//!
//! Pure geometry: turns a [`ReportDocument`] into positioned text and rules
//! on A4 pages. Renderers only paint what this module places, so pagination
//! can be tested without decoding a PDF.
//!
//! Coordinates are millimetres; `y` is measured from the top edge of the page
//! and refers to the text baseline.

use super::document::{Block, ReportDocument, Table};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

const PT: f32 = 0.3528;
const MARGIN: f32 = 30.0 * PT;
const CONTENT_WIDTH: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 24.0;
const SUBTITLE_SIZE: f32 = 12.0;
const SECTION_SIZE: f32 = 16.0;
const CELL_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 8.0;

const CELL_PADDING: f32 = 6.0 * PT;
const CELL_LINE_HEIGHT: f32 = 11.0 * PT;
const MIN_ROW_HEIGHT: f32 = 25.0 * PT;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;

/// Lowest baseline body content may use; the footer lives below it.
const CONTENT_BOTTOM: f32 = PAGE_HEIGHT_MM - MARGIN - (FOOTER_SIZE + 10.0) * PT;

pub const PRIMARY: [u8; 3] = [0x1e, 0x40, 0xaf];
pub const MUTED: [u8; 3] = [0x4b, 0x55, 0x63];
pub const FOOTER_GREY: [u8; 3] = [0x6b, 0x72, 0x80];
pub const RULE_GREY: [u8; 3] = [0xe5, 0xe7, 0xeb];
pub const BLACK: [u8; 3] = [0x11, 0x18, 0x27];

#[derive(Debug, Clone, PartialEq)]
pub enum Placed {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: [u8; 3],
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        color: [u8; 3],
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub items: Vec<Placed>,
}

impl LaidOutPage {
    /// All text on the page, in placement order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Placed::Text { text, .. } => Some(text.as_str()),
            Placed::Rule { .. } => None,
        })
    }
}

/// Lay the document out on as many pages as it needs.
pub fn layout_document(document: &ReportDocument) -> Vec<LaidOutPage> {
    let mut layout = Layout::new(&document.footer);

    layout.advance(TITLE_SIZE * PT);
    layout.centered(&document.title, TITLE_SIZE, true, PRIMARY);
    layout.advance(5.0 * PT);
    for subtitle in &document.subtitles {
        layout.advance(SUBTITLE_SIZE * PT);
        layout.centered(subtitle, SUBTITLE_SIZE, false, MUTED);
        layout.advance(3.0 * PT);
    }
    layout.advance(30.0 * PT);

    for block in &document.blocks {
        match block {
            Block::SectionTitle(title) => layout.section_title(title),
            Block::Table(table) => layout.table(table),
        }
    }

    layout.finish()
}

struct Layout<'a> {
    footer: &'a str,
    pages: Vec<LaidOutPage>,
    current: LaidOutPage,
    cursor: f32,
}

impl<'a> Layout<'a> {
    fn new(footer: &'a str) -> Self {
        Self {
            footer,
            pages: Vec::new(),
            current: LaidOutPage::default(),
            cursor: MARGIN,
        }
    }

    fn advance(&mut self, dy: f32) {
        self.cursor += dy;
    }

    fn remaining(&self) -> f32 {
        CONTENT_BOTTOM - self.cursor
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= MARGIN
    }

    /// Start a new page unless `height` still fits (or the page is empty).
    fn ensure_room(&mut self, height: f32) {
        if height > self.remaining() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        self.stamp_footer();
        let full = std::mem::take(&mut self.current);
        self.pages.push(full);
        self.cursor = MARGIN;
    }

    fn stamp_footer(&mut self) {
        let footer = self.footer.to_string();
        let x = centered_x(&footer, FOOTER_SIZE);
        self.current.items.push(Placed::Text {
            text: footer,
            x,
            y: PAGE_HEIGHT_MM - MARGIN,
            size: FOOTER_SIZE,
            bold: false,
            color: FOOTER_GREY,
        });
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.stamp_footer();
        self.pages.push(self.current);
        self.pages
    }

    fn text(&mut self, text: String, x: f32, size: f32, bold: bool, color: [u8; 3]) {
        self.current.items.push(Placed::Text {
            text,
            x,
            y: self.cursor,
            size,
            bold,
            color,
        });
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool, color: [u8; 3]) {
        self.text(text.to_string(), centered_x(text, size), size, bold, color);
    }

    fn rule(&mut self, y: f32) {
        self.current.items.push(Placed::Rule {
            x1: MARGIN,
            x2: PAGE_WIDTH_MM - MARGIN,
            y,
            color: RULE_GREY,
        });
    }

    fn section_title(&mut self, title: &str) {
        // Keep the heading with at least the table header and one row
        self.ensure_room((15.0 + SECTION_SIZE + 15.0) * PT + 2.0 * MIN_ROW_HEIGHT);
        if !self.at_page_top() {
            self.advance(15.0 * PT);
        }
        self.advance(SECTION_SIZE * PT);
        self.text(title.to_string(), MARGIN, SECTION_SIZE, true, PRIMARY);
        self.advance(15.0 * PT);
    }

    fn table(&mut self, table: &Table) {
        let columns = table.columns.len().max(1);
        let column_width = CONTENT_WIDTH / columns as f32;
        let chars = max_chars(column_width - 2.0 * CELL_PADDING, CELL_SIZE);

        let header = wrap_row(&table.columns, chars);
        self.ensure_room(row_height(&header) + MIN_ROW_HEIGHT);
        self.row(&header, column_width, true);

        for cells in &table.rows {
            let wrapped = wrap_row(cells, chars);
            let height = row_height(&wrapped);
            if height > self.remaining() && !self.at_page_top() {
                self.new_page();
                self.row(&header, column_width, true);
            }
            self.row(&wrapped, column_width, false);
        }

        self.advance(20.0 * PT);
    }

    fn row(&mut self, cells: &[Vec<String>], column_width: f32, header: bool) {
        let top = self.cursor;
        let height = row_height(cells);
        let (color, bold) = if header { (PRIMARY, true) } else { (BLACK, false) };

        for (i, lines) in cells.iter().enumerate() {
            let x = MARGIN + i as f32 * column_width + CELL_PADDING;
            for (n, line) in lines.iter().enumerate() {
                self.current.items.push(Placed::Text {
                    text: line.clone(),
                    x,
                    y: top + CELL_PADDING + CELL_SIZE * PT + n as f32 * CELL_LINE_HEIGHT,
                    size: CELL_SIZE,
                    bold,
                    color,
                });
            }
        }

        self.cursor = top + height;
        self.rule(self.cursor);
    }
}

fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * PT * AVG_GLYPH_EM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN)
}

fn max_chars(width_mm: f32, size: f32) -> usize {
    ((width_mm / (size * PT * AVG_GLYPH_EM)).floor() as usize).max(1)
}

fn wrap_row(cells: &[String], max_chars: usize) -> Vec<Vec<String>> {
    cells.iter().map(|c| wrap_text(c, max_chars)).collect()
}

fn row_height(cells: &[Vec<String>]) -> f32 {
    let lines = cells.iter().map(Vec::len).max().unwrap_or(1);
    let needed = 2.0 * CELL_PADDING + CELL_SIZE * PT + (lines.saturating_sub(1)) as f32 * CELL_LINE_HEIGHT;
    needed.max(MIN_ROW_HEIGHT)
}

/// Word-wrap for fixed-width cells. Words longer than a line are split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
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
        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.chars().count() > max_chars {
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
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
