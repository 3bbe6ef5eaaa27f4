//! Text drawing with an embedded TrueType font.

use std::{fs, path::Path};

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};

use crate::error::{ConveyorError, Result};

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Horizontal placement of text relative to its anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub struct Typeface {
    font: Font<'static>,
}

impl Typeface {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let font = Font::try_from_vec(bytes).ok_or_else(|| ConveyorError::InvalidFont(path.to_path_buf()))?;
        Ok(Typeface { font })
    }

    /// The font compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let font = Font::try_from_bytes(FONT_DATA)
            .ok_or_else(|| ConveyorError::InvalidFont("DejaVuSans.ttf".into()))?;
        Ok(Typeface { font })
    }

    /// Loads `explicit` if given, failing if it is unusable; otherwise the
    /// embedded font.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                log::debug!("Using font {}", path.display());
                Self::load(path)
            }
            None => Self::embedded(),
        }
    }

    /// Width and height of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (i32, i32) {
        text_size(Scale::uniform(size), &self.font, text)
    }

    /// Draws `text` with its top edge at `y`.
    pub fn draw(&self, image: &mut RgbImage, text: &str, (x, y): (i32, i32), size: f32, align: Align, color: Rgb<u8>) {
        let (width, _) = self.measure(text, size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - width / 2,
            Align::Right => x - width,
        };
        draw_text_mut(image, color, x, y, Scale::uniform(size), &self.font, text);
    }
}

// -- Tests -------------------------------------------------------------------
