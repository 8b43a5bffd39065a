// src/certificate/pdf.rs

use std::io::Cursor;

use async_trait::async_trait;
use printpdf::{Color, Line, Mm, PdfDocument, Point, Rgb};

use super::{
    CertificateData, CertificateRenderer, collapse_whitespace,
    font::{CertificateFonts, PT_TO_MM},
};
use crate::error::AppError;

// A4 landscape.
const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const BORDER_INSET_MM: f32 = 12.0;
// Text stays this far inside the border.
const TEXT_MARGIN_MM: f32 = BORDER_INSET_MM + 4.0;
const MAX_TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * TEXT_MARGIN_MM;

const FIRST_BASELINE_MM: f32 = PAGE_HEIGHT_MM - 45.0;
const LINE_GAP_MM: f32 = 9.0;

/// A template line with its final size and position on the page.
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    size: f32,
    bold: bool,
    x: f32,
    y: f32,
}

/// Lays the certificate template out with embedded TrueType fonts.
#[derive(Debug, Clone)]
pub struct PdfCertificateRenderer {
    fonts: CertificateFonts,
}

impl PdfCertificateRenderer {
    /// Renderer using the bundled fonts.
    pub fn new() -> Result<Self, AppError> {
        Ok(Self::with_fonts(CertificateFonts::bundled()?))
    }

    pub fn with_fonts(fonts: CertificateFonts) -> Self {
        Self { fonts }
    }

    /// Centres each line, shrinking any that would not fit between the margins.
    fn layout(fonts: &CertificateFonts, data: &CertificateData) -> Result<Vec<PlacedLine>, AppError> {
        let mut placed = Vec::new();
        let mut y = FIRST_BASELINE_MM;

        for line in data.lines() {
            let text = collapse_whitespace(&line.text);
            let bold = line.style.is_bold();
            let face = fonts.face(bold);

            if !face.covers(&text) {
                return Err(AppError::InternalServerError(format!(
                    "Certificate font has no glyphs for '{text}'"
                )));
            }

            let mut size = line.style.font_size();
            let mut width = face.text_width_mm(&text, size);
            if width > MAX_TEXT_WIDTH_MM {
                size *= MAX_TEXT_WIDTH_MM / width;
                width = face.text_width_mm(&text, size);
            }
            let x = ((PAGE_WIDTH_MM - width) / 2.0).max(TEXT_MARGIN_MM);

            placed.push(PlacedLine { text, size, bold, x, y });
            y -= line.style.font_size() * PT_TO_MM + LINE_GAP_MM;
        }

        Ok(placed)
    }

    fn render_blocking(fonts: &CertificateFonts, data: &CertificateData) -> Result<Vec<u8>, AppError> {
        let lines = Self::layout(fonts, data)?;
        let pdf_err =
            |e: printpdf::Error| AppError::InternalServerError(format!("Failed to generate certificate: {e}"));

        let (doc, page, layer) = PdfDocument::new(
            "Certificate of Achievement",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "certificate",
        );
        let regular = doc
            .add_external_font(Cursor::new(fonts.regular.bytes()))
            .map_err(pdf_err)?;
        let bold = doc
            .add_external_font(Cursor::new(fonts.bold.bytes()))
            .map_err(pdf_err)?;
        let canvas = doc.get_page(page).get_layer(layer);

        let accent = Color::Rgb(Rgb::new(0.40, 0.49, 0.92, None));
        let ink = Color::Rgb(Rgb::new(0.2, 0.2, 0.2, None));

        canvas.set_outline_color(accent.clone());
        canvas.set_outline_thickness(3.0);
        let (lo_x, lo_y) = (BORDER_INSET_MM, BORDER_INSET_MM);
        let (hi_x, hi_y) = (PAGE_WIDTH_MM - BORDER_INSET_MM, PAGE_HEIGHT_MM - BORDER_INSET_MM);
        canvas.add_line(Line {
            points: vec![
                (Point::new(Mm(lo_x), Mm(lo_y)), false),
                (Point::new(Mm(hi_x), Mm(lo_y)), false),
                (Point::new(Mm(hi_x), Mm(hi_y)), false),
                (Point::new(Mm(lo_x), Mm(hi_y)), false),
            ],
            is_closed: true,
        });

        for line in lines {
            let font = if line.bold { &bold } else { &regular };
            canvas.set_fill_color(if line.bold { accent.clone() } else { ink.clone() });
            canvas.use_text(line.text, line.size, Mm(line.x), Mm(line.y), font);
        }

        doc.save_to_bytes().map_err(pdf_err)
    }
}

#[async_trait]
impl CertificateRenderer for PdfCertificateRenderer {
    async fn render(&self, data: &CertificateData) -> Result<Vec<u8>, AppError> {
        let fonts = self.fonts.clone();
        let data = data.clone();
        tokio::task::spawn_blocking(move || Self::render_blocking(&fonts, &data))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Certificate renderer crashed: {e}")))?
    }

    fn supports(&self, text: &str) -> bool {
        self.fonts.covers(&collapse_whitespace(text))
    }
}
