// filepath: src/font.rs
//! Fonts for text drawn on the canvas
//!
//! Two kinds are supported: the fixed-size mono fonts that ship with
//! embedded-graphics (the built-in default), and outline fonts loaded
//! from a TTF/OTF file and rasterised with fontdue.

use embedded_graphics::mono_font::{ascii, MonoFont};
use std::{fmt, fs, path::Path};

/// Glyph coverage at or above this value becomes a foreground pixel
pub const COVERAGE_THRESHOLD: u8 = 128;

/// A font usable by [`crate::draw::Canvas::draw_text`]
#[derive(Clone)]
pub enum Font {
    /// Bitmap font from embedded-graphics
    Mono(&'static MonoFont<'static>),
    /// Outline font rasterised at `px` pixels and thresholded to bi-level
    Outline { face: fontdue::Font, px: f32 },
}

impl Default for Font {
    fn default() -> Self {
        Font::Mono(&ascii::FONT_6X10)
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Font::Mono(font) => write!(
                f,
                "Mono({}x{})",
                font.character_size.width, font.character_size.height
            ),
            Font::Outline { px, .. } => write!(f, "Outline({}px)", px),
        }
    }
}

impl Font {
    /// Look up one of the built-in mono fonts by its `WxH` name
    pub fn builtin(name: &str) -> Option<Self> {
        let font = match name {
            "4x6" => &ascii::FONT_4X6,
            "5x7" => &ascii::FONT_5X7,
            "5x8" => &ascii::FONT_5X8,
            "6x10" => &ascii::FONT_6X10,
            "6x13" => &ascii::FONT_6X13,
            "7x13" => &ascii::FONT_7X13,
            _ => return None,
        };
        Some(Font::Mono(font))
    }

    /// Load an outline font file
    pub fn load(path: &Path, px: f32) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = fs::read(path)?;
        let face = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())?;
        Ok(Font::Outline { face, px })
    }

    /// Resolve a font setting: a built-in name, otherwise a path to a font file
    pub fn resolve(setting: &str, px: f32) -> Result<Self, Box<dyn std::error::Error>> {
        match Self::builtin(setting) {
            Some(font) => Ok(font),
            None => Self::load(Path::new(setting), px),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_resolve() {
        assert!(matches!(Font::builtin("5x8"), Some(Font::Mono(_))));
        assert!(Font::builtin("9x99").is_none());
        assert!(matches!(Font::default(), Font::Mono(f) if f.character_size.height == 10));
    }

    #[test]
    fn missing_font_file_is_an_error() {
        assert!(Font::resolve("/nonexistent/font.ttf", 12.0).is_err());
    }
}
