use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb as PdfRgb,
};
use thiserror::Error;
use tracing::debug;

use super::layout::{DrawOp, FinishedReport, FontWeight, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

/// PDF rendering errors
#[derive(Debug, Error)]
pub enum ReportRenderError {
    /// The PDF library rejected the document
    #[error("PDF backend error: {0}")]
    Backend(String),

    /// Writing the serialized document failed
    #[error("Failed to write PDF: {0}")]
    Write(String),
}

impl From<printpdf::Error> for ReportRenderError {
    fn from(err: printpdf::Error) -> Self {
        ReportRenderError::Backend(err.to_string())
    }
}

/// Replace characters the built-in PDF fonts cannot encode
///
/// Accented Latin letters lose their accent; anything else outside ASCII
/// becomes `?`.
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            '–' | '—' => '-',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

fn pdf_color(color: Rgb) -> Color {
    Color::Rgb(PdfRgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// Layout `y` grows downwards from the top; PDF `y` grows upwards from the bottom
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text { x, y, size, weight, color, text } => {
            let font = match weight {
                FontWeight::Regular => &fonts.regular,
                FontWeight::Bold => &fonts.bold,
            };
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(fold_accents(text), *size, Mm(*x), flip(*y), font);
        }
        DrawOp::Rect { x, y, width, height, fill, stroke } => {
            let mode = match (fill, stroke) {
                (Some(_), Some(_)) => PaintMode::FillStroke,
                (Some(_), None) => PaintMode::Fill,
                (None, Some(_)) => PaintMode::Stroke,
                (None, None) => return,
            };
            if let Some(fill) = fill {
                layer.set_fill_color(pdf_color(*fill));
            }
            if let Some(stroke) = stroke {
                layer.set_outline_color(pdf_color(*stroke));
                layer.set_outline_thickness(0.5);
            }

            let corners = vec![
                (Point::new(Mm(*x), flip(*y)), false),
                (Point::new(Mm(*x + *width), flip(*y)), false),
                (Point::new(Mm(*x + *width), flip(*y + *height)), false),
                (Point::new(Mm(*x), flip(*y + *height)), false),
            ];
            layer.add_polygon(Polygon {
                rings: vec![corners],
                mode,
                winding_order: WindingOrder::NonZero,
            });
        }
        DrawOp::Line { x1, y1, x2, y2, color, thickness } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), flip(*y1)), false),
                    (Point::new(Mm(*x2), flip(*y2)), false),
                ],
                is_closed: false,
            });
        }
    }
}

/// Render a finished report to PDF bytes
pub fn render_pdf(report: &FinishedReport) -> Result<Vec<u8>, ReportRenderError> {
    let title = fold_accents(&report.title);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
    };

    for (index, page) in report.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), format!("Layer {}", index + 1));
            doc.get_page(page_index).get_layer(layer_index)
        };

        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportRenderError::Write(e.to_string()))?;

    debug!("Rendered {} page PDF ({} bytes)", report.page_count(), bytes.len());
    Ok(bytes)
}
