use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::errors::RenderError;
use crate::domain::ports::InvoiceRenderer;
use crate::engine::context::InvoiceContext;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 25.0;
const LINE_STEP: f32 = 7.0;

const COL_DESCRIPTION: f32 = 20.0;
const COL_QUANTITY: f32 = 112.0;
const COL_UNIT_PRICE: f32 = 140.0;
const COL_TOTAL: f32 = 170.0;

/// Renders an invoice context into a plain tabular A4 PDF. Layout is
/// deliberately minimal; the context is the contract, not the look.
pub struct PdfInvoiceRenderer;

impl PdfInvoiceRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfInvoiceRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<printpdf::Error> for RenderError {
    fn from(e: printpdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}

struct Cursor {
    doc: printpdf::PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor {
    /// Move down one line, flowing onto a fresh page when the current one
    /// is full.
    fn advance(&mut self) {
        self.y -= LINE_STEP;
        if self.y < BOTTOM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }
}

impl InvoiceRenderer for PdfInvoiceRenderer {
    fn render(&self, context: &InvoiceContext, path: &Path) -> Result<(), RenderError> {
        let title = format!("Invoice {:04}", context.header.number);
        let (doc, page, layer) =
            PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "invoice");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut cursor = Cursor { doc, layer, y: TOP };

        cursor.text(&title, 18.0, COL_DESCRIPTION, &bold);
        cursor.advance();
        cursor.text(
            &context.header.timestamp.format("%Y-%m-%d").to_string(),
            11.0,
            COL_DESCRIPTION,
            &regular,
        );
        cursor.advance();
        cursor.advance();

        cursor.text("Description", 11.0, COL_DESCRIPTION, &bold);
        cursor.text("Qty", 11.0, COL_QUANTITY, &bold);
        cursor.text("Unit price", 11.0, COL_UNIT_PRICE, &bold);
        cursor.text("Total", 11.0, COL_TOTAL, &bold);
        cursor.advance();

        for line in &context.items {
            cursor.text(&line.description, 10.0, COL_DESCRIPTION, &regular);
            cursor.text(&line.quantity.to_string(), 10.0, COL_QUANTITY, &regular);
            cursor.text(&line.unit_price.to_string(), 10.0, COL_UNIT_PRICE, &regular);
            cursor.text(&line.total.to_string(), 10.0, COL_TOTAL, &regular);
            cursor.advance();
        }
        cursor.advance();

        if let Some(subtotal) = &context.subtotal {
            cursor.text("Subtotal", 11.0, COL_UNIT_PRICE, &bold);
            cursor.text(&subtotal.to_string(), 11.0, COL_TOTAL, &regular);
            cursor.advance();
        }
        if let Some(tax) = &context.tax {
            cursor.text(&format!("Tax ({})", tax.rate), 11.0, COL_UNIT_PRICE, &bold);
            cursor.text(&tax.amount.to_string(), 11.0, COL_TOTAL, &regular);
            cursor.advance();
        }
        if let Some(total) = &context.total {
            cursor.text("Total", 11.0, COL_UNIT_PRICE, &bold);
            cursor.text(&total.to_string(), 11.0, COL_TOTAL, &bold);
        }

        let file = File::create(path)?;
        cursor.doc.save(&mut BufWriter::new(file))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::engine::context::InvoicedItem;
    use crate::engine::rules::Rule;
    use crate::engine::InvoicingEngine;

    fn sample_context(items: usize) -> InvoiceContext {
        let items: Vec<InvoicedItem> = (0..items)
            .map(|i| InvoicedItem {
                description: format!("line item {i}"),
                quantity: BigDecimal::from(2),
                unit_price: BigDecimal::from_str("19.99").unwrap(),
            })
            .collect();
        InvoicingEngine::new(Rule::default_set()).process(
            12,
            Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap(),
            &items,
        )
    }

    #[test]
    fn writes_a_pdf_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.pdf");

        PdfInvoiceRenderer::new()
            .render(&sample_context(3), &path)
            .expect("render failed");

        let bytes = std::fs::read(&path).expect("file should exist");
        assert!(bytes.starts_with(b"%PDF"), "output is not a PDF");
    }

    #[test]
    fn long_item_lists_flow_onto_extra_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("long.pdf");

        PdfInvoiceRenderer::new()
            .render(&sample_context(80), &path)
            .expect("render failed");

        assert!(path.exists());
    }

    #[test]
    fn render_to_unwritable_path_fails_with_io_error() {
        let err = PdfInvoiceRenderer::new()
            .render(&sample_context(1), Path::new("/nonexistent/dir/out.pdf"))
            .expect_err("should fail");
        assert!(matches!(err, RenderError::Io(_)));
    }
}
