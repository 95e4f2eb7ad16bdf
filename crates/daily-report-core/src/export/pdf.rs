//! PDF rendering via `printpdf`.

use std::io::BufWriter;

use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Rgb};

use super::document::ReportDocument;
use super::layout::{layout_document, Placed, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::{ExportError, ExportResult};

/// Turns a [`ReportDocument`] into file bytes.
pub trait DocumentRenderer: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    fn mime_type(&self) -> &'static str;

    fn render(&self, document: &ReportDocument) -> ExportResult<Vec<u8>>;
}

/// A4 portrait PDF with the built-in Helvetica fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl DocumentRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn mime_type(&self) -> &'static str {
        "application/pdf"
    }

    fn render(&self, document: &ReportDocument) -> ExportResult<Vec<u8>> {
        let pages = layout_document(document);

        let (doc, first_page, first_layer) =
            PdfDocument::new(&document.title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ExportError::Render(format!("PDF font error: {e}")))?;

        for (n, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if n == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Page {}", n + 1))
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);

            for item in &page.items {
                match item {
                    Placed::Text { text, x, y, size, bold: is_bold, color } => {
                        layer.set_fill_color(rgb(*color));
                        let face = if *is_bold { &bold } else { &font };
                        layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT_MM - *y), face);
                    }
                    Placed::Rule { x1, x2, y, color } => {
                        layer.set_outline_color(rgb(*color));
                        layer.set_outline_thickness(0.5);
                        let y = Mm(PAGE_HEIGHT_MM - *y);
                        layer.add_line(Line {
                            points: vec![
                                (Point::new(Mm(*x1), y), false),
                                (Point::new(Mm(*x2), y), false),
                            ],
                            is_closed: false,
                        });
                    }
                }
            }
        }

        let mut buf = BufWriter::new(Vec::new());
        doc.save(&mut buf)
            .map_err(|e| ExportError::Render(format!("PDF save error: {e}")))?;
        buf.into_inner()
            .map_err(|e| ExportError::Render(format!("PDF buffer error: {e}")))
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}
