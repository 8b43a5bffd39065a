// src/certificate/font.rs

use std::{fs, sync::Arc};

use owned_ttf_parser::{AsFaceRef, OwnedFace};

use crate::error::AppError;

const BUNDLED_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const BUNDLED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

pub const PT_TO_MM: f32 = 0.3528;

/// A parsed TrueType face, shared between renders.
#[derive(Debug, Clone)]
pub struct Typeface {
    face: Arc<OwnedFace>,
}

impl Typeface {
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, AppError> {
        let face = OwnedFace::from_vec(bytes, 0).map_err(|e| {
            AppError::InternalServerError(format!("Invalid certificate font: {e}"))
        })?;
        Ok(Self { face: Arc::new(face) })
    }

    /// Raw font file, embedded into each generated document.
    pub fn bytes(&self) -> &[u8] {
        self.face.as_slice()
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face
            .as_face_ref()
            .glyph_index(c)
            .map(|id| id.0)
            .filter(|id| *id != 0)
    }

    /// True when every character of `text` has a glyph in this face.
    pub fn covers(&self, text: &str) -> bool {
        text.chars().all(|c| self.glyph_id(c).is_some())
    }

    /// Advance width of `text` set at `size_pt`, in millimetres.
    pub fn text_width_mm(&self, text: &str, size_pt: f32) -> f32 {
        let face = self.face.as_face_ref();
        let units_per_em = f32::from(face.units_per_em().max(1));
        let units: u32 = text
            .chars()
            .filter_map(|c| face.glyph_index(c))
            .filter_map(|id| face.glyph_hor_advance(id))
            .map(u32::from)
            .sum();

        units as f32 / units_per_em * size_pt * PT_TO_MM
    }
}

/// Regular and bold faces used on the certificate.
#[derive(Debug, Clone)]
pub struct CertificateFonts {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl CertificateFonts {
    /// DejaVu Sans, compiled into the binary.
    pub fn bundled() -> Result<Self, AppError> {
        Ok(Self {
            regular: Typeface::from_vec(BUNDLED_REGULAR.to_vec())?,
            bold: Typeface::from_vec(BUNDLED_BOLD.to_vec())?,
        })
    }

    /// Loads fonts from disk, falling back to the bundled faces.
    ///
    /// A custom regular font without a bold companion is used for both weights.
    pub fn load(regular: Option<&str>, bold: Option<&str>) -> Result<Self, AppError> {
        let read = |path: &str| {
            fs::read(path).map_err(|e| {
                AppError::InternalServerError(format!("Failed to read font '{path}': {e}"))
            })
        };

        let regular = match regular {
            Some(path) => Some(Typeface::from_vec(read(path)?)?),
            None => None,
        };
        let bold = match bold {
            Some(path) => Some(Typeface::from_vec(read(path)?)?),
            None => None,
        };

        match (regular, bold) {
            (None, None) => Self::bundled(),
            (Some(regular), None) => Ok(Self {
                bold: regular.clone(),
                regular,
            }),
            (None, Some(bold)) => Ok(Self {
                regular: Typeface::from_vec(BUNDLED_REGULAR.to_vec())?,
                bold,
            }),
            (Some(regular), Some(bold)) => Ok(Self { regular, bold }),
        }
    }

    pub fn face(&self, bold: bool) -> &Typeface {
        if bold { &self.bold } else { &self.regular }
    }

    /// True when both weights can draw every character of `text`.
    pub fn covers(&self, text: &str) -> bool {
        self.regular.covers(text) && self.bold.covers(text)
    }
}
