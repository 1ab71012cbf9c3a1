use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::{info, warn};
use printpdf::{
    Actions, BuiltinFont, Color, IndirectFontRef, Line, LinkAnnotation, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};

use crate::catalog::{BANNER_ADS, BRAND_NAME};
use crate::models::document::{Block, GeneratedDocument, HeadingLevel};

const PAGE_WIDTH_MM: f32 = 215.9;
const PAGE_HEIGHT_MM: f32 = 279.4;
const MARGIN_SIDE_MM: f32 = 19.05;
const MARGIN_TOP_MM: f32 = 12.7;
const MARGIN_BOTTOM_MM: f32 = 12.7;

const PT_TO_MM: f32 = 0.352_778;
// Rough average Helvetica glyph width relative to the font size, used for
// wrapping and centering without font metrics.
const AVG_GLYPH_EM: f32 = 0.5;

const BANNER_WIDTH_MM: f32 = 152.4;
const BANNER_HEIGHT_MM: f32 = 38.1;

#[derive(Debug)]
pub enum PdfError {
    Io(std::io::Error),
    Render(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::Io(err) => write!(f, "I/O error: {}", err),
            PdfError::Render(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::Io(err)
    }
}

fn brand_color() -> Color {
    // #004444
    Color::Rgb(Rgb::new(0.0, 0.267, 0.267, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

/// Strips the assembler's markup down to drawable text: bold spans are
/// rendered through font choice, not inline tags.
fn markup_to_plain(markup: &str) -> String {
    markup
        .replace("<b>", "")
        .replace("</b>", "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * AVG_GLYPH_EM * PT_TO_MM
}

/// Greedy word wrap against the usable column width.
fn wrap_text(text: &str, size_pt: f32, max_width_mm: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if text_width_mm(&candidate, size_pt) > max_width_mm && !current.is_empty() {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

struct Cursor {
    layer: PdfLayerReference,
    y: f32,
}

/// Renders an assembled document to a paginated letter PDF. A single block
/// that fails to draw is logged and skipped; only sink and font failures
/// abort the document.
pub struct PdfRenderer {
    regular_size: f32,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self { regular_size: 11.0 }
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, document: &GeneratedDocument, path: &Path) -> Result<(), PdfError> {
        let (doc, page_idx, layer_idx) = PdfDocument::new(
            BRAND_NAME,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| PdfError::Render(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| PdfError::Render(e.to_string()))?;

        let mut cursor = Cursor {
            layer: doc.get_page(page_idx).get_layer(layer_idx),
            y: PAGE_HEIGHT_MM - MARGIN_TOP_MM,
        };

        for block in &document.blocks {
            if let Err(e) = self.draw_block(&doc, &mut cursor, block, &regular, &bold) {
                warn!("Skipping block that failed to render: {}", e);
            }
        }

        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| PdfError::Render(e.to_string()))?;
        info!("PDF created: {}", path.display());
        Ok(())
    }

    fn draw_block(
        &self,
        doc: &PdfDocumentReference,
        cursor: &mut Cursor,
        block: &Block,
        regular: &IndirectFontRef,
        bold: &IndirectFontRef,
    ) -> Result<(), PdfError> {
        match block {
            Block::Heading { markup, level } => {
                let (size, centered) = match level {
                    HeadingLevel::Brand => (28.0, true),
                    HeadingLevel::Title => (20.0, true),
                    HeadingLevel::Section => (16.0, false),
                };
                self.draw_text(
                    doc,
                    cursor,
                    &markup_to_plain(markup),
                    size,
                    bold,
                    centered,
                    brand_color(),
                    None,
                )?;
                cursor.y -= 3.0;
            }
            Block::DayHeader { markup } => {
                cursor.y -= 2.0;
                self.draw_text(
                    doc,
                    cursor,
                    &markup_to_plain(markup),
                    16.0,
                    bold,
                    false,
                    brand_color(),
                    None,
                )?;
            }
            Block::OptionHeader { markup, link } => {
                cursor.y -= 2.0;
                self.draw_text(
                    doc,
                    cursor,
                    &markup_to_plain(markup),
                    16.0,
                    bold,
                    false,
                    brand_color(),
                    link.as_deref(),
                )?;
            }
            Block::CostLine { markup } => {
                self.draw_text(
                    doc,
                    cursor,
                    &markup_to_plain(markup),
                    self.regular_size,
                    bold,
                    false,
                    black(),
                    None,
                )?;
            }
            Block::BodyText { markup } => {
                self.draw_text(
                    doc,
                    cursor,
                    &markup_to_plain(markup),
                    self.regular_size,
                    regular,
                    false,
                    black(),
                    None,
                )?;
                cursor.y -= 1.0;
            }
            Block::BannerSlot { banner } => {
                let creative = BANNER_ADS
                    .get(*banner)
                    .ok_or_else(|| PdfError::Render(format!("no banner creative {}", banner)))?;
                self.draw_banner(doc, cursor, creative.alt, creative.link, regular)?;
            }
            Block::LinkLine { name, link } => {
                self.draw_text(
                    doc,
                    cursor,
                    &format!("{} - Book Now", name),
                    12.0,
                    bold,
                    false,
                    brand_color(),
                    Some(link),
                )?;
            }
        }
        Ok(())
    }

    fn ensure_space(&self, doc: &PdfDocumentReference, cursor: &mut Cursor, needed_mm: f32) {
        if cursor.y - needed_mm < MARGIN_BOTTOM_MM {
            let (page_idx, layer_idx) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            cursor.layer = doc.get_page(page_idx).get_layer(layer_idx);
            cursor.y = PAGE_HEIGHT_MM - MARGIN_TOP_MM;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &self,
        doc: &PdfDocumentReference,
        cursor: &mut Cursor,
        text: &str,
        size_pt: f32,
        font: &IndirectFontRef,
        centered: bool,
        color: Color,
        link: Option<&str>,
    ) -> Result<(), PdfError> {
        let usable = PAGE_WIDTH_MM - 2.0 * MARGIN_SIDE_MM;
        let line_height = size_pt * PT_TO_MM * 1.3;

        for line in wrap_text(text, size_pt, usable) {
            self.ensure_space(doc, cursor, line_height);
            cursor.y -= line_height;

            let width = text_width_mm(&line, size_pt);
            let x = if centered {
                (PAGE_WIDTH_MM - width).max(0.0) / 2.0
            } else {
                MARGIN_SIDE_MM
            };

            cursor.layer.set_fill_color(color.clone());
            cursor
                .layer
                .use_text(line.clone(), size_pt, Mm(x), Mm(cursor.y), font);

            if let Some(url) = link {
                cursor.layer.add_link_annotation(LinkAnnotation::new(
                    Rect::new(
                        Mm(x),
                        Mm(cursor.y - 1.0),
                        Mm(x + width),
                        Mm(cursor.y + size_pt * PT_TO_MM),
                    ),
                    None,
                    None,
                    Actions::uri(url.to_string()),
                    None,
                ));
            }
        }
        Ok(())
    }

    /// The creative image bytes are not bundled; the slot renders as a
    /// framed clickable caption with the creative's geometry.
    fn draw_banner(
        &self,
        doc: &PdfDocumentReference,
        cursor: &mut Cursor,
        alt: &str,
        link: &str,
        font: &IndirectFontRef,
    ) -> Result<(), PdfError> {
        self.ensure_space(doc, cursor, BANNER_HEIGHT_MM + 6.0);
        let top = cursor.y - 3.0;
        let bottom = top - BANNER_HEIGHT_MM;
        let left = (PAGE_WIDTH_MM - BANNER_WIDTH_MM) / 2.0;
        let right = left + BANNER_WIDTH_MM;

        cursor.layer.set_outline_color(brand_color());
        cursor.layer.set_outline_thickness(0.75);
        cursor.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(left), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(bottom)), false),
                (Point::new(Mm(right), Mm(top)), false),
                (Point::new(Mm(left), Mm(top)), false),
            ],
            is_closed: true,
        });

        let caption_y = bottom + BANNER_HEIGHT_MM / 2.0;
        let caption_x = (PAGE_WIDTH_MM - text_width_mm(alt, 10.0)).max(0.0) / 2.0;
        cursor.layer.set_fill_color(brand_color());
        cursor
            .layer
            .use_text(alt, 10.0, Mm(caption_x), Mm(caption_y), font);

        cursor.layer.add_link_annotation(LinkAnnotation::new(
            Rect::new(Mm(left), Mm(bottom), Mm(right), Mm(top)),
            None,
            None,
            Actions::uri(link.to_string()),
            None,
        ));

        cursor.y = bottom - 3.0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_round_trips_to_plain_text() {
        assert_eq!(markup_to_plain("<b>Day 1</b>: Go"), "Day 1: Go");
        assert_eq!(markup_to_plain("Fish &amp; Chips"), "Fish & Chips");
        assert_eq!(markup_to_plain("a &lt;tag&gt;"), "a <tag>");
    }

    #[test]
    fn wrapping_respects_column_width() {
        let lines = wrap_text(&"word ".repeat(60), 11.0, 100.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width_mm(line, 11.0) <= 100.0 + 1.0);
        }
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_text("Day 1: Arrive", 11.0, 170.0).len(), 1);
    }

    #[test]
    fn renders_a_document_to_disk() {
        let doc = GeneratedDocument {
            blocks: vec![
                Block::Heading {
                    markup: BRAND_NAME.to_string(),
                    level: HeadingLevel::Brand,
                },
                Block::DayHeader {
                    markup: "<b>Day 1: Arrive</b>".to_string(),
                },
                Block::BodyText {
                    markup: "Check into the eco-lodge".to_string(),
                },
                Block::BannerSlot { banner: 0 },
                Block::LinkLine {
                    name: "Bali".to_string(),
                    link: "https://example.test/bali".to_string(),
                },
            ],
        };
        let path = std::env::temp_dir().join("luxury-travel-api-render-test.pdf");
        PdfRenderer::new().render(&doc, &path).expect("render");
        let bytes = std::fs::read(&path).expect("read back");
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(&path);
    }
}
