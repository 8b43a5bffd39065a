// src/certificate/mod.rs

pub mod font;
pub mod pdf;

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;

use crate::error::AppError;

pub use font::CertificateFonts;
pub use pdf::PdfCertificateRenderer;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Everything outside RFC 5987 `attr-char` is percent-encoded.
const EXT_VALUE_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// Values interpolated into the certificate template.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateData {
    pub name: String,
    pub quiz_title: String,
    pub score: i64,
    pub issued_on: NaiveDate,
}

/// Visual weight of a template line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Heading,
    Body,
    Name,
    Emphasis,
    Footnote,
}

impl LineStyle {
    /// Font size in points.
    pub fn font_size(self) -> f32 {
        match self {
            LineStyle::Heading => 36.0,
            LineStyle::Name => 32.0,
            LineStyle::Emphasis => 24.0,
            LineStyle::Body => 18.0,
            LineStyle::Footnote => 14.0,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, LineStyle::Name | LineStyle::Emphasis)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLine {
    pub text: String,
    pub style: LineStyle,
}

impl CertificateData {
    /// The fixed certificate template, top to bottom.
    pub fn lines(&self) -> Vec<TemplateLine> {
        let line = |text: String, style| TemplateLine { text, style };
        vec![
            line("Certificate of Achievement".into(), LineStyle::Heading),
            line("This certifies that".into(), LineStyle::Body),
            line(self.name.clone(), LineStyle::Name),
            line("has successfully completed the quiz".into(), LineStyle::Body),
            line(self.quiz_title.clone(), LineStyle::Emphasis),
            line(format!("with a score of {}%", self.score), LineStyle::Emphasis),
            line(
                format!("Date: {}", self.issued_on.format("%-m/%-d/%Y")),
                LineStyle::Footnote,
            ),
        ]
    }
}

/// Trims `text` and folds every whitespace run into one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Turns a display name into an ASCII certificate filename.
///
/// Whitespace runs become `-`. Characters that cannot appear inside a quoted
/// `Content-Disposition` filename are dropped.
pub fn certificate_filename(name: &str) -> String {
    let dashed = WHITESPACE_RUN.replace_all(name.trim(), "-");
    let safe: String = dashed
        .chars()
        .filter(|c| c.is_ascii_graphic() && *c != '"' && *c != '\\')
        .collect();

    if safe.is_empty() {
        "certificate.pdf".to_string()
    } else {
        format!("certificate-{safe}.pdf")
    }
}

/// `Content-Disposition` value for a certificate download.
///
/// The quoted `filename` is the ASCII fallback. When that loses characters of
/// the name, `filename*` carries the full UTF-8 name.
pub fn content_disposition(name: &str) -> String {
    let ascii = certificate_filename(name);
    let dashed = WHITESPACE_RUN.replace_all(name.trim(), "-");
    let full = format!("certificate-{dashed}.pdf");

    if dashed.is_empty() || full == ascii {
        return format!("attachment; filename=\"{ascii}\"");
    }

    format!(
        "attachment; filename=\"{ascii}\"; filename*=UTF-8''{}",
        utf8_percent_encode(&full, EXT_VALUE_ESCAPES)
    )
}

/// Renders certificate data into a PDF document.
#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    async fn render(&self, data: &CertificateData) -> Result<Vec<u8>, AppError>;

    /// Whether `text` can be printed without losing characters.
    fn supports(&self, _text: &str) -> bool {
        true
    }
}
